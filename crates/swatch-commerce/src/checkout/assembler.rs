//! Order payload assembly.

use crate::cart::CartLine;
use crate::checkout::{Address, ShippingMode, ShippingPolicy};
use crate::error::CommerceError;
use crate::ids::CombinationId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One entry of the submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub combination_id: CombinationId,
    pub quantity: i64,
}

/// Everything the order-submission collaborator receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub mode: ShippingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Builds an [`OrderPayload`] from cart lines under a [`ShippingPolicy`].
#[derive(Debug, Clone)]
pub struct CheckoutAssembler {
    policy: ShippingPolicy,
}

impl CheckoutAssembler {
    pub fn new(policy: ShippingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// Assemble a payload.
    ///
    /// Lines are forwarded exactly as stored, including any with a zero or
    /// negative quantity. Tax applies to the subtotal only. Delivery needs an
    /// address with every required field; pickup drops any address given.
    pub fn assemble(
        &self,
        lines: &[CartLine],
        mode: ShippingMode,
        address: Option<&Address>,
    ) -> Result<OrderPayload, CommerceError> {
        let first = lines.first().ok_or(CommerceError::EmptyCart)?;
        let currency = first.unit_price.currency;

        let address = match mode {
            ShippingMode::Pickup => None,
            ShippingMode::Delivery => {
                let address = address
                    .ok_or_else(|| CommerceError::CheckoutIncomplete("address".into()))?;
                let missing = address.missing_fields();
                if !missing.is_empty() {
                    return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
                }
                Some(address.clone())
            }
        };

        let subtotal = lines.iter().try_fold(Money::zero(currency), |total, line| {
            if line.unit_price.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: line.unit_price.currency.code().to_string(),
                });
            }
            line.line_total()
                .and_then(|line_total| total.try_add(&line_total))
                .ok_or(CommerceError::Overflow)
        })?;

        let shipping = self.policy.shipping_for(mode, currency);
        if shipping.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: shipping.currency.code().to_string(),
            });
        }
        let tax = self.policy.tax_rate.apply(&subtotal)?;
        let total = Money::try_sum([subtotal, shipping, tax].iter(), currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(OrderPayload {
            items: lines
                .iter()
                .map(|line| OrderItem {
                    combination_id: line.combination_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            subtotal,
            shipping,
            tax,
            total,
            mode,
            address,
        })
    }
}
