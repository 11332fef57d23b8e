//! Shopping cart module.
//!
//! Contains cart lines and the persistent store that aggregates them.

mod line;
mod store;

pub use line::CartLine;
pub use store::{CartState, CartStore, CART_SCHEMA_VERSION, CART_STORAGE_KEY};
