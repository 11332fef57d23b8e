//! Variant resolution and cart aggregation for Swatch storefronts.
//!
//! This crate holds the storefront logic between a product page and checkout:
//!
//! - **Catalog**: Products, color × size combinations, stock-aware availability
//! - **Selection**: The live (color, size, quantity) choice, kept consistent with stock
//! - **Cart**: Durable, all-or-nothing cart aggregation with frozen unit prices
//! - **Checkout**: Order payload assembly and submission
//!
//! # Example
//!
//! ```rust,ignore
//! use swatch_commerce::prelude::*;
//!
//! let mut controller = SelectionController::new();
//! let ticket = controller.begin_fetch(ProductId::new("tee"));
//! let response = ticket.run(&source).await;
//! controller.apply_fetch(response)?;
//!
//! controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("red")));
//! let mut cart = CartStore::open(Cache::open_dir("./data")?, Currency::USD)?;
//! controller.add_to_cart(&mut cart)?;
//!
//! println!("Total: {}", cart.total_price()?.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod selection;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Availability, Color, Combination, PriceSource, Product, ProductDetail, Size,
        StockStatus, VariantCatalog,
    };

    // Selection
    pub use crate::selection::{
        FetchOutcome, FetchTicket, ProductSource, Selection, SelectionController,
        SelectionEvent, SelectionView,
    };

    // Cart
    pub use crate::cart::{CartLine, CartStore};

    // Checkout
    pub use crate::checkout::{
        place_order, Address, CheckoutAssembler, OrderPayload, OrderSubmitter, PlacedOrder,
        ShippingMode, ShippingPolicy, TaxRate,
    };

    pub use swatch_cache::Cache;
}
