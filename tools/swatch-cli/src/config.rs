//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use swatch_commerce::checkout::{ShippingPolicy, TaxRate};
use swatch_commerce::{Currency, Money};

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["swatch.toml", ".swatch.toml", "swatch.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Pricing and checkout settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Where data lives.
    #[serde(default)]
    pub paths: PathsConfig,
}

impl CliConfig {
    /// Load config from a file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// The configured currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.store.currency)
            .ok_or_else(|| anyhow!("Unknown currency in config: {}", self.store.currency))
    }

    /// Delivery fee and tax rate as the checkout assembler expects them.
    pub fn shipping_policy(&self) -> Result<ShippingPolicy> {
        let currency = self.currency()?;
        let tax_rate = TaxRate::from_percent(self.store.tax_rate)
            .with_context(|| format!("Invalid store.tax_rate: {}", self.store.tax_rate))?;
        Ok(ShippingPolicy::new(
            Money::new(self.store.delivery_fee_cents, currency),
            tax_rate,
        ))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Pricing and checkout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// ISO currency code for new carts.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Tax rate in percent, e.g. 8.25.
    #[serde(default)]
    pub tax_rate: f64,

    /// Flat delivery fee in minor units.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee_cents: i64,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_delivery_fee() -> i64 {
    500
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            tax_rate: 0.0,
            delivery_fee_cents: default_delivery_fee(),
        }
    }
}

/// Data locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Cart record and order receipts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Product detail files, one `<product-id>.json` each.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".swatch")
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("catalog")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_dir: default_catalog_dir(),
        }
    }
}

/// Generate a default swatch.toml config file.
pub fn generate_default_config() -> String {
    r#"# Swatch storefront configuration

[store]
currency = "USD"
# Percent, applied to the subtotal only
tax_rate = 0.0
# Flat fee for delivery orders, in minor units (cents)
delivery_fee_cents = 500

[paths]
data_dir = ".swatch"
catalog_dir = "catalog"
"#
    .to_string()
}
