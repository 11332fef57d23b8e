//! Products and their pricing.

use crate::catalog::{Combination, VariantCatalog};
use crate::error::CommerceError;
use crate::ids::{CombinationId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product as returned by the product-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Regular price.
    #[serde(default)]
    pub base_price: Option<Money>,
    /// Sale price; overrides `base_price` when present.
    #[serde(default)]
    pub promotional_price: Option<Money>,
    /// Currency used when the product carries no price at all.
    #[serde(default)]
    pub currency: Currency,
}

/// Where an effective unit price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Promotional,
    Base,
    /// Neither price was present; the unit price is zero.
    Missing,
}

impl Product {
    /// Create a product with a regular price.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price: Some(base_price),
            promotional_price: None,
            currency: base_price.currency,
        }
    }

    /// Set a promotional price.
    pub fn with_promotional_price(mut self, price: Money) -> Self {
        self.promotional_price = Some(price);
        self
    }

    /// Price a new cart line is frozen at: the promotional price if present,
    /// otherwise the base price, otherwise zero.
    pub fn effective_unit_price(&self) -> (Money, PriceSource) {
        match (self.promotional_price, self.base_price) {
            (Some(promo), _) => (promo, PriceSource::Promotional),
            (None, Some(base)) => (base, PriceSource::Base),
            (None, None) => (Money::zero(self.currency), PriceSource::Missing),
        }
    }

    /// Check if the product is currently discounted.
    pub fn is_on_sale(&self) -> bool {
        match (self.promotional_price, self.base_price) {
            (Some(promo), Some(base)) => promo.amount_cents < base.amount_cents,
            _ => false,
        }
    }
}

/// A product together with its variant catalog, as one fetch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProductDetail")]
pub struct ProductDetail {
    product: Product,
    catalog: VariantCatalog,
}

#[derive(Deserialize)]
struct RawProductDetail {
    product: Product,
    catalog: VariantCatalog,
}

impl TryFrom<RawProductDetail> for ProductDetail {
    type Error = CommerceError;

    fn try_from(raw: RawProductDetail) -> Result<Self, Self::Error> {
        ProductDetail::new(raw.product, raw.catalog)
    }
}

impl ProductDetail {
    /// Pair a product with its catalog. The catalog must belong to the product.
    pub fn new(product: Product, catalog: VariantCatalog) -> Result<Self, CommerceError> {
        if catalog.product_id() != &product.id {
            return Err(CommerceError::CatalogMismatch {
                product: product.id.to_string(),
                catalog: catalog.product_id().to_string(),
            });
        }
        Ok(Self { product, catalog })
    }

    /// Build from a raw combination list.
    pub fn from_combinations(
        product: Product,
        combinations: Vec<Combination>,
    ) -> Result<Self, CommerceError> {
        let catalog = VariantCatalog::new(product.id.clone(), combinations)?;
        Ok(Self { product, catalog })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    pub fn combination(&self, id: &CombinationId) -> Option<&Combination> {
        self.catalog.get(id)
    }
}
