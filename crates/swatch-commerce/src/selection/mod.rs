//! Variant selection module.
//!
//! Holds the live (color, size, quantity) choice for one product page and
//! keeps it consistent with the loaded catalog.

mod controller;
mod fetch;

pub use controller::SelectionController;
pub use fetch::{FetchOutcome, FetchResponse, FetchTicket, ProductSource, SelectionIdentity};

use crate::catalog::{Availability, Combination, ProductDetail, StockStatus};
use crate::ids::{ColorId, ProductId, SizeId};
use serde::{Deserialize, Serialize};

/// The user's current choice on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    /// Always at least 1.
    pub quantity: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            color_id: None,
            size_id: None,
            quantity: 1,
        }
    }
}

impl Selection {
    /// Both axes chosen.
    pub fn is_complete(&self) -> bool {
        self.color_id.is_some() && self.size_id.is_some()
    }
}

/// Inputs to [`SelectionController::dispatch`].
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    /// A product detail arrived (first load, re-fetch or product change).
    CatalogLoaded(ProductDetail),
    /// User picked a color swatch.
    ColorChosen(ColorId),
    /// User picked a size.
    SizeChosen(SizeId),
    /// Both axes requested at once, e.g. from a shared link. Applied verbatim.
    PairRequested { color: ColorId, size: SizeId },
    /// User typed a quantity.
    QuantityEdited(i64),
    /// User navigated away; catalog and selection are discarded.
    Cleared,
}

/// Derived state for rendering, recomputed after every event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SelectionView {
    pub product_id: Option<ProductId>,
    pub selection: Selection,
    pub availability: Availability,
}

impl SelectionView {
    pub fn resolved(&self) -> Option<&Combination> {
        self.availability.resolved.as_ref()
    }

    pub fn stock_status(&self) -> StockStatus {
        self.availability.status
    }
}
