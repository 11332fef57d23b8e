//! Delivery address.

use serde::{Deserialize, Serialize};

/// A postal address for delivery orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    /// Recipient name.
    pub full_name: String,
    /// Street address.
    pub line1: String,
    /// Apartment, suite, etc.
    pub line2: Option<String>,
    pub city: String,
    /// State or province.
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO country code (e.g., "US").
    pub country_code: String,
    pub phone: Option<String>,
}

impl Address {
    /// Create an address with every required field.
    pub fn new(
        full_name: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            line1: line1.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country_code: country_code.into(),
            ..Self::default()
        }
    }

    /// Names of required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("countryCode", &self.country_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.as_str()];
        if let Some(ref line2) = self.line2 {
            parts.push(line2);
        }
        parts.push(&self.city);
        if let Some(ref region) = self.region {
            parts.push(region);
        }
        parts.push(&self.postal_code);
        parts.push(&self.country_code);
        parts.join(", ")
    }
}
