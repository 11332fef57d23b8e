//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Filesystem failure in a file-backed store.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Key is not usable as a storage key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A versioned record was written by an unsupported schema.
    #[error("Unsupported schema version for {key}: found {found}, expected {expected}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        expected: u32,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
