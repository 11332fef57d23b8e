//! Catalog browsing commands.

use anyhow::Result;
use serde_json::json;
use swatch_commerce::selection::{SelectionEvent, SelectionView};
use swatch_commerce::{ColorId, SizeId};

use super::{detail, load_product, CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Show {
            product_id,
            color,
            size,
        } => show_product(&product_id, color, size, ctx).await,
    }
}

async fn show_product(
    product_id: &str,
    color: Option<String>,
    size: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let mut controller = load_product(ctx, product_id).await?;

    let event = match (color, size) {
        (Some(color), Some(size)) => Some(SelectionEvent::PairRequested {
            color: ColorId::new(color),
            size: SizeId::new(size),
        }),
        (Some(color), None) => Some(SelectionEvent::ColorChosen(ColorId::new(color))),
        (None, Some(size)) => Some(SelectionEvent::SizeChosen(SizeId::new(size))),
        (None, None) => None,
    };
    if let Some(event) = event {
        controller.dispatch(event);
    }

    let view = controller.view().clone();
    let detail = detail(&controller)?;
    let product = detail.product();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product": product,
            "view": view,
        }));
        return Ok(());
    }

    let (price, _) = product.effective_unit_price();
    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("price", &price.display());
    if product.is_on_sale() {
        if let Some(base) = product.base_price {
            ctx.output.kv("was", &base.display());
        }
    }

    print_selection(&view, ctx);

    if ctx.output.is_verbose() {
        ctx.output.header("All combinations");
        let widths = [16, 20, 6];
        ctx.output.table_row(&["ID", "VARIANT", "STOCK"], &widths);
        for combination in detail.catalog().combinations() {
            ctx.output.table_row(
                &[
                    combination.id.as_str(),
                    &combination.label(),
                    &combination.stock.to_string(),
                ],
                &widths,
            );
        }
    }

    Ok(())
}

fn print_selection(view: &SelectionView, ctx: &Context) {
    let availability = &view.availability;
    let colors: Vec<&str> = availability.colors.iter().map(|c| c.name.as_str()).collect();
    let sizes: Vec<&str> = availability.sizes.iter().map(|s| s.name.as_str()).collect();

    ctx.output.kv("colors", &list_or_none(&colors));
    ctx.output.kv("sizes", &list_or_none(&sizes));
    ctx.output.kv(
        "selected",
        &format!(
            "{} / {}",
            view.selection.color_id.as_ref().map_or("-", |c| c.as_str()),
            view.selection.size_id.as_ref().map_or("-", |s| s.as_str()),
        ),
    );
    ctx.output.kv("status", &stock_badge(view.stock_status()));

    if let Some(combination) = view.resolved() {
        ctx.output.kv(
            "combination",
            &format!("{} ({} left)", combination.id, combination.stock),
        );
    }
}

fn list_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none in stock".to_string()
    } else {
        items.join(", ")
    }
}
