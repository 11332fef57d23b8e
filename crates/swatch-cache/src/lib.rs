//! Type-safe durable key-value storage for Swatch.
//!
//! Provides a small, synchronous API for persisting client state with
//! automatic JSON serialization, over either a directory on disk or memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use swatch_cache::Cache;
//!
//! let mut cache = Cache::open_dir(".swatch")?;
//!
//! // Store a value
//! cache.set_versioned("cart-storage", 1, &cart_state)?;
//!
//! // Retrieve a value
//! let cart: Option<CartState> = cache.get_versioned("cart-storage", 1)?;
//!
//! // Delete a value
//! cache.delete("cart-storage")?;
//! ```

mod error;
mod kv;
mod record;

pub use error::CacheError;
pub use kv::{Cache, FileBackend, KvBackend, MemoryBackend};
pub use record::Versioned;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileBackend, KvBackend, MemoryBackend, Versioned};
}
