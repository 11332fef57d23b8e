//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults, no config file found)"),
    }

    let store = &ctx.config.store;
    ctx.output.info("[store]");
    ctx.output.kv("currency", &store.currency);
    ctx.output.kv("tax_rate", &format!("{}%", store.tax_rate));
    ctx.output
        .kv("delivery_fee_cents", &store.delivery_fee_cents.to_string());

    ctx.output.info("[paths]");
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output
        .kv("catalog_dir", &ctx.catalog_dir().display().to_string());

    if let Err(e) = ctx.config.shipping_policy() {
        ctx.output.warn(&format!("{e:#}"));
    }
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("swatch.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}
