//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A monetary amount in integer minor units (cents) plus a 3-letter currency code.
///
/// Amounts are never floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: String,
}

impl ValueObject for Money {}

impl Money {
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Build a positive amount. The currency code is upper-cased.
    pub fn new(amount_minor: i64, currency: &str) -> DomainResult<Self> {
        if amount_minor <= 0 {
            return Err(DomainError::validation("amount must be a positive integer"));
        }
        let currency = currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation("currency must be a 3-letter code"));
        }
        Ok(Self {
            amount_minor,
            currency: currency.to_ascii_uppercase(),
        })
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_normalized_to_upper_case() {
        let m = Money::new(1250, "eur").unwrap();
        assert_eq!(m.currency(), "EUR");
        assert_eq!(m.amount_minor(), 1250);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(Money::new(0, "USD").is_err());
        assert!(Money::new(-5, "USD").is_err());
    }

    #[test]
    fn rejects_malformed_currency() {
        assert!(Money::new(10, "US").is_err());
        assert!(Money::new(10, "USDT").is_err());
        assert!(Money::new(10, "U$D").is_err());
    }
}
