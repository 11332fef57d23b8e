//! Product catalog module.
//!
//! Contains products, their color × size combinations, and the pure
//! availability resolver over them.

mod product;
pub mod resolver;
mod variant;

pub use product::{PriceSource, Product, ProductDetail};
pub use resolver::{Availability, StockStatus};
pub use variant::{Color, Combination, Size, VariantCatalog};
