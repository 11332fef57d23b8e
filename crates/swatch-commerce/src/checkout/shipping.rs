//! Shipping modes, delivery fee and tax rate.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMode {
    /// Customer collects in store. No fee, no address.
    Pickup,
    /// Shipped to an address for a flat fee.
    Delivery,
}

impl ShippingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMode::Pickup => "pickup",
            ShippingMode::Delivery => "delivery",
        }
    }

    pub fn requires_address(&self) -> bool {
        matches!(self, ShippingMode::Delivery)
    }
}

impl fmt::Display for ShippingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tax rate in basis points (1 bp = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);

    pub fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    /// Parse a percentage such as `8.25`. At most two decimals are kept exactly.
    pub fn from_percent(percent: f64) -> Result<Self, CommerceError> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(CommerceError::CheckoutIncomplete(format!(
                "valid tax rate (got {percent})"
            )));
        }
        let bps = (percent * 100.0).round();
        if bps > f64::from(u32::MAX) {
            return Err(CommerceError::Overflow);
        }
        Ok(Self(bps as u32))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// Tax on `amount`, rounded half-up to minor units.
    pub fn apply(&self, amount: &Money) -> Result<Money, CommerceError> {
        amount
            .apply_basis_points(self.0)
            .ok_or(CommerceError::Overflow)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Store-wide shipping and tax settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Flat fee charged for delivery.
    pub delivery_fee: Money,
    pub tax_rate: TaxRate,
}

impl ShippingPolicy {
    pub fn new(delivery_fee: Money, tax_rate: TaxRate) -> Self {
        Self {
            delivery_fee,
            tax_rate,
        }
    }

    /// No delivery fee and no tax.
    pub fn free(currency: Currency) -> Self {
        Self::new(Money::zero(currency), TaxRate::ZERO)
    }

    /// Shipping charge for `mode`. Pickup is zero in the order's `currency`;
    /// delivery is the configured fee in whatever currency it was set in.
    pub fn shipping_for(&self, mode: ShippingMode, currency: Currency) -> Money {
        match mode {
            ShippingMode::Pickup => Money::zero(currency),
            ShippingMode::Delivery => self.delivery_fee,
        }
    }
}
