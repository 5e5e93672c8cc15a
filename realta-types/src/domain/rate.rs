//! Exchange rates as persisted by the refresh job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Decimal places kept when a refreshed rate is written.
pub const STORED_RATE_DECIMALS: i32 = 8;

/// Checks that `code` is a three-letter upper-case currency code.
pub fn validate_currency_code(code: &str) -> Result<(), DomainError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(DomainError::InvalidCurrencyCode(code.to_string()))
    }
}

/// One row of the `currency_rates` table.
///
/// Keyed by `(base_currency, target_currency)`; `rate` is units of the target
/// per unit of the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredRate {
    #[schema(example = "USD")]
    pub base_currency: String,
    #[schema(example = "GTQ")]
    pub target_currency: String,
    #[schema(example = 7.81234567)]
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl StoredRate {
    /// Creates a validated rate.
    pub fn new(
        base_currency: impl Into<String>,
        target_currency: impl Into<String>,
        rate: f64,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let base_currency = base_currency.into();
        let target_currency = target_currency.into();
        validate_currency_code(&base_currency)?;
        validate_currency_code(&target_currency)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DomainError::InvalidRate {
                currency: target_currency,
                rate,
            });
        }
        Ok(Self {
            base_currency,
            target_currency,
            rate,
            last_updated,
        })
    }

    /// Creates a rate rounded to [`STORED_RATE_DECIMALS`] places.
    pub fn rounded(
        base_currency: impl Into<String>,
        target_currency: impl Into<String>,
        rate: f64,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let scale = 10f64.powi(STORED_RATE_DECIMALS);
        Self::new(
            base_currency,
            target_currency,
            (rate * scale).round() / scale,
            last_updated,
        )
    }

    /// The rate rendered with [`STORED_RATE_DECIMALS`] places.
    pub fn rate_display(&self) -> String {
        format!("{:.*}", STORED_RATE_DECIMALS as usize, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rate() {
        let rate = StoredRate::new("USD", "GTQ", 7.8, Utc::now()).unwrap();
        assert_eq!(rate.base_currency, "USD");
        assert_eq!(rate.target_currency, "GTQ");
    }

    #[test]
    fn test_rejects_bad_codes() {
        for code in ["usd", "US", "USDT", "U1D", ""] {
            let result = StoredRate::new("USD", code, 1.0, Utc::now());
            assert!(
                matches!(result, Err(DomainError::InvalidCurrencyCode(_))),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_rates() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = StoredRate::new("USD", "GTQ", rate, Utc::now());
            assert!(matches!(result, Err(DomainError::InvalidRate { .. })));
        }
    }

    #[test]
    fn test_rounded_keeps_eight_decimals() {
        let rate = StoredRate::rounded("USD", "MXN", 17.123456789123, Utc::now()).unwrap();
        assert!((rate.rate - 17.12345679).abs() < 1e-12);
        assert_eq!(rate.rate_display(), "17.12345679");
    }
}
