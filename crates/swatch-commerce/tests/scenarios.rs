//! End-to-end storefront scenarios: product page to cart to order.

use async_trait::async_trait;
use std::sync::Mutex;
use swatch_commerce::cart::{CartState, CART_STORAGE_KEY};
use swatch_commerce::catalog::resolver;
use swatch_commerce::prelude::*;

fn combo(id: &str, color: &str, size: &str, stock: u32) -> Combination {
    Combination::new(id, Color::new(color, color), Size::new(size, size), stock)
}

/// [{red,S,0},{red,M,5},{blue,M,3}]
fn tee() -> ProductDetail {
    ProductDetail::from_combinations(
        Product::new("tee", "Tee", Money::new(2000, Currency::USD)),
        vec![
            combo("red-s", "red", "S", 0),
            combo("red-m", "red", "M", 5),
            combo("blue-m", "blue", "M", 3),
        ],
    )
    .unwrap()
}

struct CatalogSource(ProductDetail);

#[async_trait]
impl ProductSource for CatalogSource {
    async fn fetch_product(&self, id: &ProductId) -> Result<ProductDetail, CommerceError> {
        if &self.0.product().id == id {
            Ok(self.0.clone())
        } else {
            Err(CommerceError::Upstream(format!("no product {id}")))
        }
    }
}

#[derive(Default)]
struct CountingSubmitter {
    orders: Mutex<Vec<OrderPayload>>,
}

#[async_trait]
impl OrderSubmitter for CountingSubmitter {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderId, CommerceError> {
        let mut orders = self.orders.lock().unwrap();
        orders.push(payload.clone());
        Ok(OrderId::new(format!("ord-{}", orders.len())))
    }
}

#[test]
fn scenario_a_color_narrows_sizes() {
    let mut controller = SelectionController::new();
    controller.dispatch(SelectionEvent::CatalogLoaded(tee()));

    let view = controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("red")));
    let sizes: Vec<_> = view.availability.sizes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(sizes, vec!["M"]);

    let view = controller.dispatch(SelectionEvent::SizeChosen(SizeId::new("M")));
    let resolved = view.resolved().unwrap();
    assert_eq!(resolved.id.as_str(), "red-m");
    assert_eq!(resolved.stock, 5);
    assert_eq!(view.stock_status(), StockStatus::InStock);
}

#[test]
fn scenario_b_unknown_pair_is_not_found() {
    let detail = tee();
    let blue = ColorId::new("blue");
    let s = SizeId::new("S");
    assert!(resolver::resolve(detail.catalog(), Some(&blue), Some(&s)).is_none());

    let mut controller = SelectionController::new();
    controller.dispatch(SelectionEvent::CatalogLoaded(detail));
    let view = controller.dispatch(SelectionEvent::PairRequested { color: blue, size: s });
    assert_eq!(view.stock_status(), StockStatus::NotFound);

    let mut cart = CartStore::in_memory(Currency::USD);
    let err = controller.add_to_cart(&mut cart).unwrap_err();
    assert!(matches!(err, CommerceError::CombinationNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn scenario_c_stock_checked_per_request() {
    let detail = tee();
    let red_m = detail.combination(&CombinationId::new("red-m")).unwrap();
    let mut cart = CartStore::in_memory(Currency::USD);

    cart.add_to_cart(detail.product(), red_m, 3).unwrap();
    cart.add_to_cart(detail.product(), red_m, 4).unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 7);

    let err = cart.add_to_cart(detail.product(), red_m, 10).unwrap_err();
    assert!(matches!(
        err,
        CommerceError::InsufficientStock { requested: 10, available: 5, .. }
    ));
    assert_eq!(cart.items()[0].quantity, 7);
}

#[test]
fn scenario_d_totals() {
    let a = Product::new("a", "A", Money::new(1000, Currency::USD));
    let b = Product::new("b", "B", Money::new(1500, Currency::USD));
    let mut cart = CartStore::in_memory(Currency::USD);

    cart.add_to_cart(&a, &combo("a-1", "black", "M", 10), 2).unwrap();
    cart.add_to_cart(&b, &combo("b-1", "white", "L", 10), 1).unwrap();

    assert_eq!(cart.total_items().unwrap(), 3);
    assert_eq!(cart.total_price().unwrap(), Money::new(3500, Currency::USD));
}

#[test]
fn repeated_add_aggregates_into_one_line() {
    let detail = tee();
    let blue_m = detail.combination(&CombinationId::new("blue-m")).unwrap();
    let mut cart = CartStore::in_memory(Currency::USD);

    cart.add_to_cart(detail.product(), blue_m, 2).unwrap();
    cart.add_to_cart(detail.product(), blue_m, 2).unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.total_items().unwrap(), 4);
}

#[test]
fn update_to_zero_keeps_line() {
    let detail = tee();
    let red_m = detail.combination(&CombinationId::new("red-m")).unwrap();
    let mut cart = CartStore::in_memory(Currency::USD);
    cart.add_to_cart(detail.product(), red_m, 2).unwrap();

    assert!(cart.update_quantity(&detail.product().id, &red_m.id, 0).unwrap());
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 0);
    assert_eq!(cart.total_items().unwrap(), 0);
    assert!(cart.total_price().unwrap().is_zero());
}

#[test]
fn cart_survives_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let detail = tee();
    let red_m = detail.combination(&CombinationId::new("red-m")).unwrap();

    let expected = {
        let mut cart = CartStore::open(Cache::open_dir(dir.path()).unwrap(), Currency::USD).unwrap();
        cart.add_to_cart(detail.product(), red_m, 2).unwrap();
        cart.items().to_vec()
    };

    let reopened = CartStore::open(Cache::open_dir(dir.path()).unwrap(), Currency::USD).unwrap();
    assert_eq!(reopened.items(), expected.as_slice());

    let raw: Option<CartState> = reopened
        .storage()
        .get_versioned(CART_STORAGE_KEY, 1)
        .unwrap();
    assert_eq!(raw.map(|state| state.items), Some(expected));
}

#[tokio::test]
async fn page_to_order_flow() {
    let dir = tempfile::tempdir().unwrap();
    let source = CatalogSource(tee());
    let submitter = CountingSubmitter::default();

    let mut controller = SelectionController::new();
    let ticket = controller.begin_fetch(ProductId::new("tee"));
    let response = ticket.run(&source).await;
    assert_eq!(controller.apply_fetch(response).unwrap(), FetchOutcome::Applied);

    controller.dispatch(SelectionEvent::ColorChosen(ColorId::new("blue")));
    controller.dispatch(SelectionEvent::QuantityEdited(2));

    let mut cart = CartStore::open(Cache::open_dir(dir.path()).unwrap(), Currency::USD).unwrap();
    controller.add_to_cart(&mut cart).unwrap();

    let assembler = CheckoutAssembler::new(ShippingPolicy::new(
        Money::new(500, Currency::USD),
        TaxRate::from_basis_points(825),
    ));
    let address = Address::new("Ada Park", "12 Elm St", "Portland", "97201", "US");
    let placed = place_order(
        &mut cart,
        &assembler,
        ShippingMode::Delivery,
        Some(&address),
        &submitter,
    )
    .await
    .unwrap();

    // 2 x 20.00 = 40.00; tax 8.25% = 3.30; delivery 5.00
    assert_eq!(placed.payload.subtotal.amount_cents, 4000);
    assert_eq!(placed.payload.tax.amount_cents, 330);
    assert_eq!(placed.payload.total.amount_cents, 4830);
    assert_eq!(placed.payload.items[0].combination_id.as_str(), "blue-m");
    assert!(placed.cart_cleared);

    let reopened = CartStore::open(Cache::open_dir(dir.path()).unwrap(), Currency::USD).unwrap();
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn superseded_fetch_never_applies() {
    let source = CatalogSource(tee());
    let mut controller = SelectionController::new();

    let old = controller.begin_fetch(ProductId::new("tee"));
    let current = controller.begin_fetch(ProductId::new("tee"));

    let fresh = current.run(&source).await;
    assert_eq!(controller.apply_fetch(fresh).unwrap(), FetchOutcome::Applied);

    let stale = old.run(&source).await;
    assert_eq!(controller.apply_fetch(stale).unwrap(), FetchOutcome::Discarded);
    assert_eq!(controller.selection().color_id, Some(ColorId::new("red")));
}
