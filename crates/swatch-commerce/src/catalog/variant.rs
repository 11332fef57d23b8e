//! Color × size combinations and the per-product variant catalog.

use crate::error::CommerceError;
use crate::ids::{ColorId, CombinationId, ProductId, SizeId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A color option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    /// Name shown on the swatch.
    pub name: String,
}

impl Color {
    pub fn new(id: impl Into<ColorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A size option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub id: SizeId,
    /// Label shown on the size picker.
    pub name: String,
}

impl Size {
    pub fn new(id: impl Into<SizeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One concrete (color, size) stock-keeping unit of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    /// Unique combination identifier.
    pub id: CombinationId,
    pub color: Color,
    pub size: Size,
    /// Units in stock at fetch time.
    pub stock: u32,
    /// Cost price for this combination, if the API exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Money>,
}

impl Combination {
    pub fn new(id: impl Into<CombinationId>, color: Color, size: Size, stock: u32) -> Self {
        Self {
            id: id.into(),
            color,
            size,
            stock,
            unit_cost: None,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether this combination is the (color, size) pair given.
    pub fn matches(&self, color: &ColorId, size: &SizeId) -> bool {
        &self.color.id == color && &self.size.id == size
    }

    /// Human label, e.g. "Red / M".
    pub fn label(&self) -> String {
        format!("{} / {}", self.color.name, self.size.name)
    }
}

/// Immutable snapshot of every combination of one product, in API order.
///
/// No two combinations share a (color, size) pair. A catalog is never mutated
/// in place; a re-fetch produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct VariantCatalog {
    product_id: ProductId,
    combinations: Vec<Combination>,
}

#[derive(Deserialize)]
struct RawCatalog {
    product_id: ProductId,
    combinations: Vec<Combination>,
}

impl TryFrom<RawCatalog> for VariantCatalog {
    type Error = CommerceError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        VariantCatalog::new(raw.product_id, raw.combinations)
    }
}

impl VariantCatalog {
    /// Build a catalog, rejecting duplicate (color, size) pairs.
    pub fn new(
        product_id: ProductId,
        combinations: Vec<Combination>,
    ) -> Result<Self, CommerceError> {
        let mut seen = HashSet::with_capacity(combinations.len());
        for combination in &combinations {
            if !seen.insert((&combination.color.id, &combination.size.id)) {
                return Err(CommerceError::DuplicateCombination {
                    color: combination.color.id.to_string(),
                    size: combination.size.id.to_string(),
                });
            }
        }
        Ok(Self {
            product_id,
            combinations,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Distinct colors in first-seen order, regardless of stock.
    pub fn colors(&self) -> Vec<Color> {
        distinct_by_id(self.combinations.iter().map(|c| &c.color), |c| &c.id)
    }

    /// Distinct sizes in first-seen order, regardless of stock.
    pub fn sizes(&self) -> Vec<Size> {
        distinct_by_id(self.combinations.iter().map(|c| &c.size), |s| &s.id)
    }

    /// The combination for an exact (color, size) pair.
    pub fn find(&self, color: &ColorId, size: &SizeId) -> Option<&Combination> {
        self.combinations.iter().find(|c| c.matches(color, size))
    }

    /// Look up a combination by its own id.
    pub fn get(&self, id: &CombinationId) -> Option<&Combination> {
        self.combinations.iter().find(|c| &c.id == id)
    }
}

/// Keep the first occurrence of each id, preserving order.
pub(crate) fn distinct_by_id<'a, T, K, I, F>(items: I, key: F) -> Vec<T>
where
    T: Clone + 'a,
    K: Eq + std::hash::Hash + 'a,
    I: Iterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a K,
{
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(key(*item)))
        .cloned()
        .collect()
}
