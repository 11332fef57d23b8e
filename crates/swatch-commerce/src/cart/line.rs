//! Cart line type.

use crate::catalog::{Combination, Product};
use crate::ids::{CombinationId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One aggregated row in the cart for a product + combination.
///
/// `unit_price` is frozen when the line is first created; later adds of the
/// same combination only change `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub combination_id: CombinationId,
    /// Product name (denormalized for display).
    pub product_name: String,
    /// Variant label, e.g. "Red / M" (denormalized for display).
    pub variant_label: String,
    /// Unit price at the time the line was created.
    pub unit_price: Money,
    /// Stored exactly as last set; see [`crate::cart::CartStore::update_quantity`].
    pub quantity: i64,
}

impl CartLine {
    pub(crate) fn new(
        product: &Product,
        combination: &Combination,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: product.id.clone(),
            combination_id: combination.id.clone(),
            product_name: product.name.clone(),
            variant_label: combination.label(),
            unit_price,
            quantity,
        }
    }

    /// Whether this line holds the given product + combination.
    pub fn is_for(&self, product_id: &ProductId, combination_id: &CombinationId) -> bool {
        &self.product_id == product_id && &self.combination_id == combination_id
    }

    /// `unit_price * quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.try_multiply(self.quantity)
    }
}
