//! Selection state machine for one product page.

use super::fetch::{FetchOutcome, FetchResponse, FetchTicket, SelectionIdentity};
use super::{Selection, SelectionEvent, SelectionView};
use crate::cart::{CartLine, CartStore};
use crate::catalog::resolver::{self, available_colors, available_sizes};
use crate::catalog::{Combination, ProductDetail, StockStatus};
use crate::error::CommerceError;
use crate::ids::{ColorId, ProductId, SizeId};
use swatch_cache::KvBackend;
use tokio::sync::watch;

/// Owns the loaded product, the user's selection and the fetch generation.
///
/// All changes go through [`dispatch`](Self::dispatch) so that the derived
/// [`SelectionView`] is always recomputed from the catalog.
#[derive(Debug, Default)]
pub struct SelectionController {
    detail: Option<ProductDetail>,
    selection: Selection,
    view: SelectionView,
    generation: u64,
    requested: Option<ProductId>,
    pending: Option<watch::Sender<bool>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &SelectionView {
        &self.view
    }

    pub fn detail(&self) -> Option<&ProductDetail> {
        self.detail.as_ref()
    }

    /// The combination for the current pair, whatever its stock.
    pub fn resolved(&self) -> Option<&Combination> {
        let detail = self.detail.as_ref()?;
        resolver::resolve(
            detail.catalog(),
            self.selection.color_id.as_ref(),
            self.selection.size_id.as_ref(),
        )
    }

    pub fn stock_status(&self) -> StockStatus {
        self.view.stock_status()
    }

    /// Apply one event and return the refreshed view.
    pub fn dispatch(&mut self, event: SelectionEvent) -> &SelectionView {
        match event {
            SelectionEvent::CatalogLoaded(detail) => self.load_catalog(detail),
            SelectionEvent::ColorChosen(color) => self.choose_color(color),
            SelectionEvent::SizeChosen(size) => self.choose_size(size),
            SelectionEvent::PairRequested { color, size } => self.request_pair(color, size),
            SelectionEvent::QuantityEdited(quantity) => self.set_quantity(quantity),
            SelectionEvent::Cleared => self.clear(),
        }
        self.refresh_view();
        &self.view
    }

    fn load_catalog(&mut self, detail: ProductDetail) {
        let same_product = self
            .detail
            .as_ref()
            .is_some_and(|current| current.product().id == detail.product().id);
        if !same_product {
            self.selection = Selection::default();
        }

        let catalog = detail.catalog();
        let colors = available_colors(catalog, None);
        let keep_color = self
            .selection
            .color_id
            .as_ref()
            .is_some_and(|id| colors.iter().any(|c| &c.id == id));
        if !keep_color {
            self.selection.color_id = colors.first().map(|c| c.id.clone());
        }

        tracing::debug!(
            product_id = %detail.product().id,
            combinations = catalog.combinations().len(),
            same_product,
            "catalog loaded"
        );
        self.detail = Some(detail);
        self.repair_size();
    }

    fn choose_color(&mut self, color: ColorId) {
        if self.detail.is_none() {
            tracing::debug!(%color, "color chosen before catalog loaded; ignoring");
            return;
        }
        self.selection.color_id = Some(color);
        self.selection.quantity = 1;
        self.repair_size();
    }

    fn choose_size(&mut self, size: SizeId) {
        if self.detail.is_none() {
            tracing::debug!(%size, "size chosen before catalog loaded; ignoring");
            return;
        }
        self.selection.size_id = Some(size);
        self.selection.quantity = 1;
        self.repair_color();
    }

    fn request_pair(&mut self, color: ColorId, size: SizeId) {
        if self.detail.is_none() {
            tracing::debug!(%color, %size, "pair requested before catalog loaded; ignoring");
            return;
        }
        self.selection.color_id = Some(color);
        self.selection.size_id = Some(size);
        self.selection.quantity = 1;
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.selection.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
    }

    fn clear(&mut self) {
        self.cancel_pending();
        self.detail = None;
        self.requested = None;
        self.selection = Selection::default();
    }

    /// Keep the size if the current color still offers it, else fall back to
    /// the first size that does.
    fn repair_size(&mut self) {
        let Some(detail) = self.detail.as_ref() else {
            return;
        };
        let sizes = available_sizes(detail.catalog(), self.selection.color_id.as_ref());
        let still_valid = self
            .selection
            .size_id
            .as_ref()
            .is_some_and(|id| sizes.iter().any(|s| &s.id == id));
        if !still_valid {
            let replacement = sizes.first().map(|s| s.id.clone());
            tracing::trace!(from = ?self.selection.size_id, to = ?replacement, "size repaired");
            self.selection.size_id = replacement;
        }
    }

    /// Mirror of [`repair_size`](Self::repair_size) for the color axis.
    fn repair_color(&mut self) {
        let Some(detail) = self.detail.as_ref() else {
            return;
        };
        let colors = available_colors(detail.catalog(), self.selection.size_id.as_ref());
        let still_valid = self
            .selection
            .color_id
            .as_ref()
            .is_some_and(|id| colors.iter().any(|c| &c.id == id));
        if !still_valid {
            let replacement = colors.first().map(|c| c.id.clone());
            tracing::trace!(from = ?self.selection.color_id, to = ?replacement, "color repaired");
            self.selection.color_id = replacement;
        }
    }

    fn refresh_view(&mut self) {
        self.view = match self.detail.as_ref() {
            Some(detail) => SelectionView {
                product_id: Some(detail.product().id.clone()),
                selection: self.selection.clone(),
                availability: resolver::availability(
                    detail.catalog(),
                    self.selection.color_id.as_ref(),
                    self.selection.size_id.as_ref(),
                ),
            },
            None => SelectionView {
                selection: self.selection.clone(),
                ..SelectionView::default()
            },
        };
    }

    /// Add the resolved combination to `cart` at the selected quantity.
    pub fn add_to_cart<B: KvBackend>(
        &self,
        cart: &mut CartStore<B>,
    ) -> Result<CartLine, CommerceError> {
        let detail = self.detail.as_ref().ok_or(CommerceError::CatalogNotLoaded)?;
        let (color, size) = match (&self.selection.color_id, &self.selection.size_id) {
            (Some(color), Some(size)) => (color, size),
            (None, _) => return Err(CommerceError::SelectionIncomplete("color".into())),
            (_, None) => return Err(CommerceError::SelectionIncomplete("size".into())),
        };
        let combination = resolver::resolve(detail.catalog(), Some(color), Some(size))
            .ok_or_else(|| CommerceError::CombinationNotFound(format!("{color}/{size}")))?;

        cart.add_to_cart(
            detail.product(),
            combination,
            i64::from(self.selection.quantity),
        )
        .cloned()
    }

    /// Start a fetch for `product_id`, cancelling any fetch still in flight.
    pub fn begin_fetch(&mut self, product_id: ProductId) -> FetchTicket {
        self.cancel_pending();
        self.generation += 1;
        self.requested = Some(product_id.clone());

        let (tx, rx) = watch::channel(false);
        self.pending = Some(tx);
        FetchTicket::new(self.identity_for(product_id), rx)
    }

    /// Signal the in-flight fetch, if any, to stop.
    pub fn cancel_pending(&mut self) {
        if let Some(tx) = self.pending.take() {
            // No receiver left means the fetch already finished.
            let _ = tx.send(true);
        }
    }

    /// Apply a fetch response if it still matches the current selection.
    ///
    /// Stale responses are discarded whatever their result. A current
    /// response carrying an error returns that error unchanged, and one
    /// holding a product other than the requested one is an upstream error.
    pub fn apply_fetch(&mut self, response: FetchResponse) -> Result<FetchOutcome, CommerceError> {
        let FetchResponse { identity, result } = response;
        if !self.is_current(&identity) {
            tracing::debug!(
                product_id = %identity.product_id,
                generation = identity.generation,
                current = self.generation,
                "discarding stale product fetch"
            );
            return Ok(FetchOutcome::Discarded);
        }

        self.pending = None;
        let detail = result?;
        if detail.product().id != identity.product_id {
            tracing::warn!(
                requested = %identity.product_id,
                received = %detail.product().id,
                "product source returned a different product"
            );
            return Err(CommerceError::Upstream(format!(
                "requested {}, received {}",
                identity.product_id,
                detail.product().id
            )));
        }
        self.dispatch(SelectionEvent::CatalogLoaded(detail));
        Ok(FetchOutcome::Applied)
    }

    fn identity_for(&self, product_id: ProductId) -> SelectionIdentity {
        SelectionIdentity {
            generation: self.generation,
            product_id,
            color_id: self.selection.color_id.clone(),
            size_id: self.selection.size_id.clone(),
        }
    }

    fn is_current(&self, identity: &SelectionIdentity) -> bool {
        identity.generation == self.generation
            && self.requested.as_ref() == Some(&identity.product_id)
            && identity.color_id == self.selection.color_id
            && identity.size_id == self.selection.size_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Color, Product, Size};
    use crate::money::{Currency, Money};
    use crate::selection::ProductSource;
    use async_trait::async_trait;

    fn combo(id: &str, color: &str, size: &str, stock: u32) -> Combination {
        Combination::new(id, Color::new(color, color), Size::new(size, size), stock)
    }

    fn tee() -> ProductDetail {
        ProductDetail::from_combinations(
            Product::new("tee", "Tee", Money::new(2000, Currency::USD)),
            vec![
                combo("red-s", "red", "S", 0),
                combo("red-m", "red", "M", 5),
                combo("blue-m", "blue", "M", 3),
                combo("blue-l", "blue", "L", 2),
            ],
        )
        .unwrap()
    }

    fn loaded() -> SelectionController {
        let mut controller = SelectionController::new();
        controller.dispatch(SelectionEvent::CatalogLoaded(tee()));
        controller
    }

    fn pair(controller: &SelectionController) -> (Option<&str>, Option<&str>) {
        let selection = controller.selection();
        (
            selection.color_id.as_ref().map(|c| c.as_str()),
            selection.size_id.as_ref().map(|s| s.as_str()),
        )
    }

    #[test]
    fn test_catalog_load_picks_first_available_pair() {
        let controller = loaded();
        assert_eq!(pair(&controller), (Some("red"), Some("M")));
        assert_eq!(controller.stock_status(), StockStatus::InStock);
        assert_eq!(controller.selection().quantity, 1);
    }

    #[test]
    fn test_color_change_repairs_size_and_resets_quantity() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("L")));
        controller.dispatch(SelectionEvent::QuantityEdited(2));

        let view = controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("red")));
        assert_eq!(view.selection.size_id, Some(SizeId::new("M")));
        assert_eq!(view.selection.quantity, 1);
    }

    #[test]
    fn test_color_change_keeps_valid_size() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));
        assert_eq!(pair(&controller), (Some("blue"), Some("M")));
    }

    #[test]
    fn test_size_change_repairs_color() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("L")));
        assert_eq!(pair(&controller), (Some("blue"), Some("L")));
    }

    #[test]
    fn test_size_with_no_stock_clears_color() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("S")));
        assert_eq!(pair(&controller), (None, Some("S")));
        assert_eq!(controller.stock_status(), StockStatus::Unselected);
    }

    #[test]
    fn test_quantity_is_clamped() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::QuantityEdited(0));
        assert_eq!(controller.selection().quantity, 1);
        controller.dispatch(SelectionEvent::QuantityEdited(-4));
        assert_eq!(controller.selection().quantity, 1);
        controller.dispatch(SelectionEvent::QuantityEdited(i64::MAX));
        assert_eq!(controller.selection().quantity, u32::MAX);
    }

    #[test]
    fn test_pair_request_is_verbatim() {
        let mut controller = loaded();
        let view = controller.dispatch(SelectionEvent::PairRequested {
            color: ColorId::new("red"),
            size: SizeId::new("S"),
        });
        assert_eq!(view.stock_status(), StockStatus::OutOfStock);
        assert_eq!(view.resolved().map(|c| c.stock), Some(0));

        let view = controller.dispatch(SelectionEvent::PairRequested {
            color: ColorId::new("blue"),
            size: SizeId::new("S"),
        });
        assert_eq!(view.stock_status(), StockStatus::NotFound);
        assert!(view.resolved().is_none());
    }

    #[test]
    fn test_events_before_catalog_are_ignored() {
        let mut controller = SelectionController::new();
        let view = controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("red")));
        assert!(view.selection.color_id.is_none());
        assert!(view.product_id.is_none());
    }

    #[test]
    fn test_reload_same_product_keeps_choice() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("L")));
        controller.dispatch(SelectionEvent::QuantityEdited(2));

        controller.dispatch(SelectionEvent::CatalogLoaded(tee()));
        assert_eq!(pair(&controller), (Some("blue"), Some("L")));
        assert_eq!(controller.selection().quantity, 2);
    }

    #[test]
    fn test_reload_repairs_sold_out_choice() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("L")));

        let restocked = ProductDetail::from_combinations(
            Product::new("tee", "Tee", Money::new(2000, Currency::USD)),
            vec![combo("blue-m", "blue", "M", 3), combo("blue-l", "blue", "L", 0)],
        )
        .unwrap();
        controller.dispatch(SelectionEvent::CatalogLoaded(restocked));
        assert_eq!(pair(&controller), (Some("blue"), Some("M")));
    }

    #[test]
    fn test_new_product_resets_selection() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::QuantityEdited(3));

        let socks = ProductDetail::from_combinations(
            Product::new("socks", "Socks", Money::new(500, Currency::USD)),
            vec![combo("g-one", "green", "One", 9)],
        )
        .unwrap();
        let view = controller.dispatch(SelectionEvent::CatalogLoaded(socks));
        assert_eq!(view.product_id, Some(ProductId::new("socks")));
        assert_eq!(pair(&controller), (Some("green"), Some("One")));
        assert_eq!(controller.selection().quantity, 1);
    }

    #[test]
    fn test_cleared_discards_everything() {
        let mut controller = loaded();
        let view = controller.dispatch(SelectionEvent::Cleared);
        assert!(view.product_id.is_none());
        assert!(controller.detail().is_none());
        assert_eq!(controller.selection(), &Selection::default());
    }

    #[test]
    fn test_add_to_cart_uses_selection() {
        let mut controller = loaded();
        controller.dispatch(SelectionEvent::QuantityEdited(2));
        let mut cart = CartStore::in_memory(Currency::USD);

        let line = controller.add_to_cart(&mut cart).unwrap();
        assert_eq!(line.combination_id.as_str(), "red-m");
        assert_eq!(line.quantity, 2);
        assert_eq!(cart.total_items().unwrap(), 2);
    }

    #[test]
    fn test_add_to_cart_errors() {
        let mut cart = CartStore::in_memory(Currency::USD);

        let empty = SelectionController::new();
        assert!(matches!(
            empty.add_to_cart(&mut cart),
            Err(CommerceError::CatalogNotLoaded)
        ));

        let mut controller = loaded();
        controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("S")));
        assert!(matches!(
            controller.add_to_cart(&mut cart),
            Err(CommerceError::SelectionIncomplete(axis)) if axis == "color"
        ));

        controller.dispatch(SelectionEvent::PairRequested {
            color: ColorId::new("blue"),
            size: SizeId::new("S"),
        });
        assert!(matches!(
            controller.add_to_cart(&mut cart),
            Err(CommerceError::CombinationNotFound(_))
        ));

        controller.dispatch(SelectionEvent::PairRequested {
            color: ColorId::new("red"),
            size: SizeId::new("S"),
        });
        assert!(matches!(
            controller.add_to_cart(&mut cart),
            Err(CommerceError::InsufficientStock { available: 0, .. })
        ));
        assert!(cart.is_empty());
    }

    struct StaticSource(ProductDetail);

    #[async_trait]
    impl ProductSource for StaticSource {
        async fn fetch_product(&self, _: &ProductId) -> Result<ProductDetail, CommerceError> {
            Ok(self.0.clone())
        }
    }

    struct NeverSource;

    #[async_trait]
    impl ProductSource for NeverSource {
        async fn fetch_product(&self, _: &ProductId) -> Result<ProductDetail, CommerceError> {
            std::future::pending().await
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProductSource for FailingSource {
        async fn fetch_product(&self, id: &ProductId) -> Result<ProductDetail, CommerceError> {
            Err(CommerceError::Upstream(format!("{id}: 503")))
        }
    }

    #[tokio::test]
    async fn test_fetch_applies_when_current() {
        let mut controller = SelectionController::new();
        let ticket = controller.begin_fetch(ProductId::new("tee"));
        let response = ticket.run(&StaticSource(tee())).await;

        assert_eq!(controller.apply_fetch(response).unwrap(), FetchOutcome::Applied);
        assert_eq!(pair(&controller), (Some("red"), Some("M")));
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let mut controller = SelectionController::new();
        let first = controller.begin_fetch(ProductId::new("tee"));
        let second = controller.begin_fetch(ProductId::new("tee"));

        let stale = first.run(&StaticSource(tee())).await;
        assert!(matches!(stale.result, Err(CommerceError::FetchCancelled(_))));
        assert_eq!(controller.apply_fetch(stale).unwrap(), FetchOutcome::Discarded);
        assert!(controller.detail().is_none());

        let fresh = second.run(&StaticSource(tee())).await;
        assert_eq!(controller.apply_fetch(fresh).unwrap(), FetchOutcome::Applied);
    }

    #[tokio::test]
    async fn test_selection_change_makes_fetch_stale() {
        let mut controller = loaded();
        let ticket = controller.begin_fetch(ProductId::new("tee"));
        controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));

        let response = ticket.run(&StaticSource(tee())).await;
        assert_eq!(controller.apply_fetch(response).unwrap(), FetchOutcome::Discarded);
        assert_eq!(pair(&controller), (Some("blue"), Some("M")));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_fetch() {
        let mut controller = SelectionController::new();
        let ticket = controller.begin_fetch(ProductId::new("tee"));
        let handle = tokio::spawn(async move { ticket.run(&NeverSource).await });

        controller.dispatch(SelectionEvent::Cleared);
        let response = handle.await.unwrap();
        assert!(matches!(response.result, Err(CommerceError::FetchCancelled(_))));
        assert_eq!(controller.apply_fetch(response).unwrap(), FetchOutcome::Discarded);
    }

    #[tokio::test]
    async fn test_current_fetch_error_is_propagated() {
        let mut controller = SelectionController::new();
        let ticket = controller.begin_fetch(ProductId::new("tee"));
        let response = ticket.run(&FailingSource).await;

        let err = controller.apply_fetch(response).unwrap_err();
        assert!(matches!(err, CommerceError::Upstream(_)));
        assert!(controller.detail().is_none());
    }

    #[tokio::test]
    async fn test_fetch_for_other_product_is_rejected() {
        let mut controller = SelectionController::new();
        let ticket = controller.begin_fetch(ProductId::new("hoodie"));
        let response = ticket.run(&StaticSource(tee())).await;

        let err = controller.apply_fetch(response).unwrap_err();
        assert!(matches!(err, CommerceError::Upstream(_)));
        assert!(controller.detail().is_none());
        assert_eq!(controller.view().product_id, None);
    }

    #[test]
    fn test_ticket_reports_cancellation() {
        let mut controller = SelectionController::new();
        let first = controller.begin_fetch(ProductId::new("tee"));
        assert!(!first.is_cancelled());
        let _second = controller.begin_fetch(ProductId::new("tee"));
        assert!(first.is_cancelled());
    }
}
