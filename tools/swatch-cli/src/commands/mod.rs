//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{ArgGroup, Args, Subcommand};
use swatch_commerce::catalog::ProductDetail;
use swatch_commerce::selection::{FetchOutcome, SelectionController};
use swatch_commerce::ProductId;

use crate::context::Context;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Show availability for a product, optionally for a color and size.
    Show {
        /// Product ID.
        product_id: String,

        /// Color ID.
        #[arg(long)]
        color: Option<String>,

        /// Size ID.
        #[arg(long)]
        size: Option<String>,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a variant to the cart.
    Add {
        /// Product ID.
        product_id: String,

        /// Color ID.
        #[arg(long)]
        color: String,

        /// Size ID.
        #[arg(long)]
        size: String,

        /// Quantity to add.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        qty: i64,
    },
    /// List cart lines and totals.
    List,
    /// Set a line's quantity.
    Update {
        /// Product the line belongs to.
        product_id: String,

        /// Combination ID of the line.
        combination_id: String,

        /// New quantity. Zero or below keeps the line.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Product the line belongs to.
        product_id: String,

        /// Combination ID of the line.
        combination_id: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the checkout command.
#[derive(Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["pickup", "delivery"])))]
pub struct CheckoutArgs {
    /// Collect in store.
    #[arg(long)]
    pub pickup: bool,

    /// Deliver to an address.
    #[arg(long, requires = "address")]
    pub delivery: bool,

    /// Delivery address file (TOML or JSON).
    #[arg(long)]
    pub address: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Fetch a product through the selection controller so the catalog is loaded
/// and the default selection applied.
pub(crate) async fn load_product(ctx: &Context, product_id: &str) -> Result<SelectionController> {
    let source = ctx.product_source();
    let mut controller = SelectionController::new();

    let ticket = controller.begin_fetch(ProductId::new(product_id));
    let response = ticket.run(&source).await;
    match controller
        .apply_fetch(response)
        .with_context(|| format!("Failed to load product {product_id}"))?
    {
        FetchOutcome::Applied => Ok(controller),
        FetchOutcome::Discarded => bail!("Product fetch for {product_id} was superseded"),
    }
}

/// The loaded product detail of a controller returned by [`load_product`].
pub(crate) fn detail(controller: &SelectionController) -> Result<&ProductDetail> {
    controller
        .detail()
        .context("Product catalog was not loaded")
}
