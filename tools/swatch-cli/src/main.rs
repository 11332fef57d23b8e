//! Swatch CLI - Command line storefront over the swatch-commerce engine.
//!
//! Commands:
//! - `swatch catalog show` - Show variant availability for a product
//! - `swatch cart` - Add, list, update, remove and clear cart lines
//! - `swatch checkout` - Place an order for the cart contents
//! - `swatch config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod sources;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs};

/// Swatch CLI - Pick variants, fill a cart and check out from the terminal
#[derive(Parser)]
#[command(name = "swatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse product variants
    Catalog(CatalogArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Place an order for the cart contents
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Install the tracing subscriber. `RUST_LOG` wins; otherwise `-v` selects debug.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "warn,swatch_commerce=debug,swatch_cache=debug,swatch=debug"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
