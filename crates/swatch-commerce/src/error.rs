//! Commerce error types.

use thiserror::Error;

/// Broad category of a [`CommerceError`], for deciding how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad user input or incomplete data. Recoverable, shown to the user.
    Validation,
    /// The requested combination does not exist in the catalog.
    NotFound,
    /// Requested quantity exceeds the stock snapshot.
    InsufficientStock,
    /// Durable storage failed.
    Storage,
    /// A remote collaborator (product fetch, order submission) failed.
    Upstream,
    /// A fetch was superseded or cancelled before it completed.
    Cancelled,
    /// Arithmetic overflow in money or quantity calculations.
    Overflow,
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Combination not found.
    #[error("Combination not found: {0}")]
    CombinationNotFound(String),

    /// Both color and size must be chosen before adding to the cart.
    #[error("Selection incomplete: missing {0}")]
    SelectionIncomplete(String),

    /// No catalog has been loaded yet.
    #[error("No catalog loaded")]
    CatalogNotLoaded,

    /// Two combinations share the same color and size.
    #[error("Duplicate combination for color {color} and size {size}")]
    DuplicateCombination { color: String, size: String },

    /// A catalog was paired with a product it does not belong to.
    #[error("Catalog for product {catalog} does not belong to product {product}")]
    CatalogMismatch { product: String, catalog: String },

    /// Insufficient stock for the requested quantity.
    #[error("Insufficient stock for {combination_id}: requested {requested}, available {available}")]
    InsufficientStock {
        combination_id: String,
        requested: i64,
        available: u32,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A product fetch was superseded or cancelled.
    #[error("Fetch cancelled for product {0}")]
    FetchCancelled(String),

    /// A remote collaborator failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] swatch_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::CombinationNotFound(_) => ErrorKind::NotFound,
            CommerceError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CommerceError::SelectionIncomplete(_)
            | CommerceError::CatalogNotLoaded
            | CommerceError::DuplicateCombination { .. }
            | CommerceError::CatalogMismatch { .. }
            | CommerceError::InvalidQuantity(_)
            | CommerceError::EmptyCart
            | CommerceError::CheckoutIncomplete(_)
            | CommerceError::CurrencyMismatch { .. } => ErrorKind::Validation,
            CommerceError::Overflow => ErrorKind::Overflow,
            CommerceError::FetchCancelled(_) => ErrorKind::Cancelled,
            CommerceError::Upstream(_) => ErrorKind::Upstream,
            CommerceError::Storage(_) | CommerceError::SerializationError(_) => {
                ErrorKind::Storage
            }
        }
    }

    /// Whether the error should be shown to the user as a correctable problem.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::InsufficientStock
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
