//! Checkout command.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use swatch_commerce::checkout::{place_order, Address, CheckoutAssembler, ShippingMode};

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let (mode, address) = if args.delivery {
        let Some(path) = args.address.as_deref() else {
            bail!("--delivery requires --address <file>");
        };
        (ShippingMode::Delivery, Some(read_address(&ctx.resolve_path(path))?))
    } else {
        (ShippingMode::Pickup, None)
    };

    let assembler = CheckoutAssembler::new(ctx.config.shipping_policy()?);
    let sink = ctx.order_sink()?;
    let mut cart = ctx.open_cart()?;

    let placed = place_order(&mut cart, &assembler, mode, address.as_ref(), &sink)
        .await
        .context("Checkout failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&placed);
        return Ok(());
    }

    let payload = &placed.payload;
    ctx.output.header(&format!("Order {}", placed.order_id));
    if let Some(receipt) = sink.receipt(&placed.order_id)? {
        ctx.output.kv("placed at", &receipt.placed_at.to_rfc3339());
    }
    ctx.output.kv("mode", mode.as_str());
    if let Some(ref address) = payload.address {
        ctx.output.kv("ship to", &address.one_line());
    }
    ctx.output.kv("tax rate", &assembler.policy().tax_rate.to_string());
    ctx.output.money("subtotal", &payload.subtotal, false);
    ctx.output.money("shipping", &payload.shipping, false);
    ctx.output.money("tax", &payload.tax, false);
    ctx.output.money("total", &payload.total, true);

    if placed.cart_cleared {
        ctx.output.success("Order placed");
    } else {
        ctx.output
            .warn("Order placed, but the cart could not be cleared; run `swatch cart clear`");
    }
    Ok(())
}

/// Read a delivery address from a TOML or JSON file.
fn read_address(path: &Path) -> Result<Address> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read address file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON address: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML address: {}", path.display()))
    }
}
