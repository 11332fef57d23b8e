//! Cart commands.

use anyhow::{Context as _, Result};
use serde_json::json;
use swatch_cache::KvBackend;
use swatch_commerce::cart::CartStore;
use swatch_commerce::selection::SelectionEvent;
use swatch_commerce::{ColorId, CombinationId, ProductId, SizeId};

use super::{load_product, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Add {
            product_id,
            color,
            size,
            qty,
        } => add_item(&product_id, color, size, qty, ctx).await,
        CartCommand::List => list_cart(ctx),
        CartCommand::Update {
            product_id,
            combination_id,
            quantity,
        } => update_item(&product_id, &combination_id, quantity, ctx),
        CartCommand::Remove {
            product_id,
            combination_id,
        } => remove_item(&product_id, &combination_id, ctx),
        CartCommand::Clear => clear_cart(ctx),
    }
}

async fn add_item(
    product_id: &str,
    color: String,
    size: String,
    qty: i64,
    ctx: &Context,
) -> Result<()> {
    let mut controller = load_product(ctx, product_id).await?;
    controller.dispatch(SelectionEvent::PairRequested {
        color: ColorId::new(color),
        size: SizeId::new(size),
    });
    controller.dispatch(SelectionEvent::QuantityEdited(qty));

    let mut cart = ctx.open_cart()?;
    let line = controller
        .add_to_cart(&mut cart)
        .context("Could not add to cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&line);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Added {} x {} ({}), now {} in cart",
        qty, line.product_name, line.variant_label, line.quantity
    ));
    Ok(())
}

fn list_cart(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    print_cart(&cart, ctx)
}

fn update_item(
    product_id: &str,
    combination_id: &str,
    quantity: i64,
    ctx: &Context,
) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let product = ProductId::new(product_id);
    let id = CombinationId::new(combination_id);

    if !cart.update_quantity(&product, &id, quantity)? {
        ctx.output
            .warn(&format!("No cart line for {product_id} {combination_id}"));
        return Ok(());
    }
    if quantity <= 0 {
        ctx.output.warn(&format!(
            "Quantity {quantity} kept for {combination_id}; use `swatch cart remove` to drop the line"
        ));
    } else {
        ctx.output
            .success(&format!("Set {combination_id} to {quantity}"));
    }
    print_cart(&cart, ctx)
}

fn remove_item(product_id: &str, combination_id: &str, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let product = ProductId::new(product_id);
    if cart.remove_from_cart(&product, &CombinationId::new(combination_id))? {
        ctx.output
            .success(&format!("Removed {combination_id} from {product_id}"));
    } else {
        ctx.output
            .info(&format!("No cart line for {product_id} {combination_id}"));
    }
    print_cart(&cart, ctx)
}

fn clear_cart(ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    cart.clear_cart()?;
    ctx.output.success("Cart cleared");
    Ok(())
}

fn print_cart<B: KvBackend>(cart: &CartStore<B>, ctx: &Context) -> Result<()> {
    let total_items = cart.total_items()?;
    let total_price = cart.total_price()?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "items": cart.items(),
            "totalItems": total_items,
            "totalPrice": total_price,
        }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let widths = [12, 16, 24, 12, 5, 12];
    ctx.output.table_row(
        &["PRODUCT", "ID", "ITEM", "UNIT", "QTY", "TOTAL"],
        &widths,
    );
    for line in cart.items() {
        let line_total = line
            .line_total()
            .map_or_else(|| "overflow".to_string(), |m| m.display());
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                line.combination_id.as_str(),
                &format!("{} ({})", line.product_name, line.variant_label),
                &line.unit_price.display(),
                &line.quantity.to_string(),
                &line_total,
            ],
            &widths,
        );
    }
    ctx.output.kv("items", &total_items.to_string());
    ctx.output.money("total", &total_price, true);
    Ok(())
}
