//! Versioned records.
//!
//! Durable state that outlives a process is wrapped in a [`Versioned`]
//! envelope so that readers can tell which schema wrote it.

use crate::{Cache, CacheError, KvBackend};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A record tagged with the schema version that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Schema version of `state`.
    pub version: u32,
    /// The stored state.
    pub state: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u32, state: T) -> Self {
        Self { version, state }
    }
}

/// Only the version tag, used to inspect a record before decoding its body.
#[derive(Deserialize)]
struct VersionTag {
    version: u32,
}

impl<B: KvBackend> Cache<B> {
    /// Read a versioned record written with `expected` schema version.
    ///
    /// Returns `Ok(None)` if the key is absent and
    /// [`CacheError::UnsupportedVersion`] if the record was written by another
    /// schema. The body is only decoded once the version matches.
    pub fn get_versioned<T: DeserializeOwned>(
        &self,
        key: &str,
        expected: u32,
    ) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.get::<serde_json::Value>(key)? else {
            return Ok(None);
        };

        let tag: VersionTag = serde_json::from_value(raw.clone())?;
        if tag.version != expected {
            return Err(CacheError::UnsupportedVersion {
                key: key.to_string(),
                found: tag.version,
                expected,
            });
        }

        let record: Versioned<T> = serde_json::from_value(raw)?;
        Ok(Some(record.state))
    }

    /// Write `state` under `key` tagged with `version`.
    pub fn set_versioned<T: Serialize>(
        &mut self,
        key: &str,
        version: u32,
        state: &T,
    ) -> Result<(), CacheError> {
        self.set(key, &Versioned::new(version, state))
    }
}
