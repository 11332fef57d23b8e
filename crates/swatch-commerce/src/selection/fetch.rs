//! Product fetches tagged with the selection they were issued for.

use crate::catalog::ProductDetail;
use crate::error::CommerceError;
use crate::ids::{ColorId, ProductId, SizeId};
use async_trait::async_trait;
use tokio::sync::watch;

/// Collaborator that loads a product and its variant catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductDetail, CommerceError>;
}

/// The selection a fetch was issued under.
///
/// A response is applied only if the controller still has the same identity
/// when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionIdentity {
    pub generation: u64,
    pub product_id: ProductId,
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
}

/// Handle for one in-flight fetch, issued by
/// [`SelectionController::begin_fetch`](super::SelectionController::begin_fetch).
#[derive(Debug)]
pub struct FetchTicket {
    identity: SelectionIdentity,
    cancelled: watch::Receiver<bool>,
}

impl FetchTicket {
    pub(crate) fn new(identity: SelectionIdentity, cancelled: watch::Receiver<bool>) -> Self {
        Self {
            identity,
            cancelled,
        }
    }

    pub fn identity(&self) -> &SelectionIdentity {
        &self.identity
    }

    pub fn product_id(&self) -> &ProductId {
        &self.identity.product_id
    }

    /// Whether a newer fetch or a navigation has superseded this one.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Run the fetch against `source`, stopping early if the ticket is cancelled.
    pub async fn run<S>(mut self, source: &S) -> FetchResponse
    where
        S: ProductSource + ?Sized,
    {
        let product_id = self.identity.product_id.clone();
        tracing::debug!(%product_id, generation = self.identity.generation, "fetching product");

        let result = tokio::select! {
            biased;
            _ = wait_cancelled(&mut self.cancelled) => {
                tracing::debug!(%product_id, "product fetch cancelled");
                Err(CommerceError::FetchCancelled(product_id.to_string()))
            }
            result = source.fetch_product(&product_id) => result,
        };

        FetchResponse {
            identity: self.identity,
            result,
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        // Sender dropped: the controller moved on or went away.
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// A completed fetch, ready for
/// [`SelectionController::apply_fetch`](super::SelectionController::apply_fetch).
#[derive(Debug)]
pub struct FetchResponse {
    pub identity: SelectionIdentity,
    pub result: Result<ProductDetail, CommerceError>,
}

/// What happened to a fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The catalog was loaded into the controller.
    Applied,
    /// The response belonged to an older selection and was dropped.
    Discarded,
}
