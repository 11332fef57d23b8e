//! Order submission.

use crate::cart::CartStore;
use crate::checkout::{Address, CheckoutAssembler, OrderPayload, ShippingMode};
use crate::error::CommerceError;
use crate::ids::OrderId;
use async_trait::async_trait;
use serde::Serialize;
use swatch_cache::KvBackend;

/// Collaborator that accepts an order and returns its id.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderId, CommerceError>;
}

/// Result of a successful [`place_order`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub payload: OrderPayload,
    /// False if the order went through but the cart could not be emptied.
    pub cart_cleared: bool,
}

/// Assemble the cart into an order, submit it, then empty the cart.
///
/// Assembly and submission errors are returned unchanged and leave the cart
/// as it was. Once the submitter has accepted the order, a failure to clear
/// the cart is logged and reported through [`PlacedOrder::cart_cleared`].
pub async fn place_order<B, S>(
    cart: &mut CartStore<B>,
    assembler: &CheckoutAssembler,
    mode: ShippingMode,
    address: Option<&Address>,
    submitter: &S,
) -> Result<PlacedOrder, CommerceError>
where
    B: KvBackend,
    S: OrderSubmitter + ?Sized,
{
    let payload = assembler.assemble(cart.items(), mode, address)?;
    let order_id = submitter.submit(&payload).await?;

    let cart_cleared = match cart.clear_cart() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%order_id, error = %e, "order placed but cart could not be cleared");
            false
        }
    };

    tracing::info!(
        %order_id,
        mode = %payload.mode,
        items = payload.items.len(),
        total = %payload.total,
        "order placed"
    );
    Ok(PlacedOrder {
        order_id,
        payload,
        cart_cleared,
    })
}
