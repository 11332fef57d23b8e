//! Checkout module.
//!
//! Turns cart lines into an order payload and hands it to the submitter.

mod address;
mod assembler;
mod shipping;
mod submit;

pub use address::Address;
pub use assembler::{CheckoutAssembler, OrderItem, OrderPayload};
pub use shipping::{ShippingMode, ShippingPolicy, TaxRate};
pub use submit::{place_order, OrderSubmitter, PlacedOrder};
