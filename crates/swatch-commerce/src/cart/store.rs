//! Persistent cart store.

use crate::cart::CartLine;
use crate::catalog::{Combination, PriceSource, Product};
use crate::error::CommerceError;
use crate::ids::{CombinationId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use swatch_cache::{Cache, CacheError, KvBackend, MemoryBackend};

/// Name of the durable record holding the cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Schema version written with every cart record.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Body of the `cart-storage` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLine>,
}

#[derive(Serialize)]
struct CartStateRef<'a> {
    items: &'a [CartLine],
}

/// Durable collection of cart lines, unique by (product, combination).
///
/// Every mutation writes the full line collection to storage before the
/// in-memory copy changes; if the write fails, the store is left exactly as
/// it was.
#[derive(Debug)]
pub struct CartStore<B: KvBackend = MemoryBackend> {
    items: Vec<CartLine>,
    currency: Currency,
    storage: Cache<B>,
}

impl CartStore<MemoryBackend> {
    /// A cart with no durable backing, for previews and tests.
    pub fn in_memory(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            storage: Cache::in_memory(),
        }
    }
}

impl<B: KvBackend> CartStore<B> {
    /// Load the cart from `storage`, or start empty if there is no record.
    ///
    /// A record written by an unknown schema, or one that cannot be decoded,
    /// is discarded with a warning: the cart is a client-side convenience and
    /// the server re-validates everything at checkout.
    pub fn open(storage: Cache<B>, default_currency: Currency) -> Result<Self, CommerceError> {
        let items = match storage.get_versioned::<CartState>(CART_STORAGE_KEY, CART_SCHEMA_VERSION)
        {
            Ok(Some(state)) => state.items,
            Ok(None) => Vec::new(),
            Err(e @ (CacheError::UnsupportedVersion { .. } | CacheError::SerializeError(_))) => {
                tracing::warn!(error = %e, "discarding unreadable cart record");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let currency = items
            .first()
            .map(|line| line.unit_price.currency)
            .unwrap_or(default_currency);

        tracing::debug!(lines = items.len(), %currency, "cart opened");
        Ok(Self {
            items,
            currency,
            storage,
        })
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for a product's combination, if present.
    pub fn line(&self, product_id: &ProductId, combination_id: &CombinationId) -> Option<&CartLine> {
        self.items
            .iter()
            .find(|line| line.is_for(product_id, combination_id))
    }

    /// Add `quantity` units of `combination` to the cart.
    ///
    /// Fails without touching the cart if `quantity` is not positive, if it
    /// exceeds the combination's stock, or if the product is priced in a
    /// different currency than the cart. Stock is checked against this
    /// request only, not against what is already in the cart.
    ///
    /// Repeated adds of the same combination sum into one line and keep the
    /// price that line was created with.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        combination: &Combination,
        quantity: i64,
    ) -> Result<&CartLine, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > i64::from(combination.stock) {
            return Err(CommerceError::InsufficientStock {
                combination_id: combination.id.to_string(),
                requested: quantity,
                available: combination.stock,
            });
        }

        let mut next = self.items.clone();
        let existing = next
            .iter()
            .position(|line| line.is_for(&product.id, &combination.id));
        let position = match existing {
            Some(index) => {
                let line = &mut next[index];
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CommerceError::Overflow)?;
                index
            }
            None => {
                let (unit_price, source) = product.effective_unit_price();
                if source == PriceSource::Missing {
                    tracing::warn!(
                        product_id = %product.id,
                        "product has no base or promotional price; adding at zero"
                    );
                }
                if !self.items.is_empty() && unit_price.currency != self.currency {
                    return Err(CommerceError::CurrencyMismatch {
                        expected: self.currency.code().to_string(),
                        got: unit_price.currency.code().to_string(),
                    });
                }
                next.push(CartLine::new(product, combination, unit_price, quantity));
                next.len() - 1
            }
        };

        let currency = next[position].unit_price.currency;
        self.commit(next)?;
        self.currency = currency;

        let line = &self.items[position];
        tracing::debug!(
            product_id = %line.product_id,
            combination_id = %line.combination_id,
            added = quantity,
            quantity = line.quantity,
            "cart line added"
        );
        Ok(line)
    }

    /// Set a line's quantity exactly as given.
    ///
    /// Returns `Ok(false)` without writing if no line holds the product's
    /// combination. A quantity of zero or below is stored as-is; the line
    /// stays in the cart until [`remove_from_cart`](Self::remove_from_cart)
    /// is called.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        combination_id: &CombinationId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        let Some(index) = self
            .items
            .iter()
            .position(|line| line.is_for(product_id, combination_id))
        else {
            return Ok(false);
        };

        let mut next = self.items.clone();
        next[index].quantity = quantity;
        self.commit(next)?;

        if quantity <= 0 {
            tracing::debug!(
                %product_id,
                %combination_id,
                quantity,
                "cart line kept with non-positive quantity"
            );
        }
        Ok(true)
    }

    /// Remove the line for a product's combination. Returns whether a line
    /// was removed.
    pub fn remove_from_cart(
        &mut self,
        product_id: &ProductId,
        combination_id: &CombinationId,
    ) -> Result<bool, CommerceError> {
        let next: Vec<CartLine> = self
            .items
            .iter()
            .filter(|line| !line.is_for(product_id, combination_id))
            .cloned()
            .collect();
        let removed = next.len() < self.items.len();
        self.commit(next)?;
        tracing::debug!(%product_id, %combination_id, removed, "cart line removed");
        Ok(removed)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Result<(), CommerceError> {
        self.commit(Vec::new())?;
        tracing::debug!("cart cleared");
        Ok(())
    }

    /// Sum of quantities across lines.
    pub fn total_items(&self) -> Result<i64, CommerceError> {
        self.items
            .iter()
            .try_fold(0i64, |total, line| total.checked_add(line.quantity))
            .ok_or(CommerceError::Overflow)
    }

    /// Sum of `unit_price * quantity` using each line's frozen price.
    pub fn total_price(&self) -> Result<Money, CommerceError> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |total, line| {
                line.line_total()
                    .and_then(|line_total| total.try_add(&line_total))
            })
            .ok_or(CommerceError::Overflow)
    }

    /// Borrow the backing storage.
    pub fn storage(&self) -> &Cache<B> {
        &self.storage
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> Cache<B> {
        self.storage
    }

    /// Persist `next`, then adopt it as the in-memory state.
    fn commit(&mut self, next: Vec<CartLine>) -> Result<(), CommerceError> {
        self.storage.set_versioned(
            CART_STORAGE_KEY,
            CART_SCHEMA_VERSION,
            &CartStateRef { items: &next },
        )?;
        self.items = next;
        Ok(())
    }
}
