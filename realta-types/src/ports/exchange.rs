//! Exchange rate source port.
//!
//! This trait defines the interface for upstream rate feeds.
//! Implementations can be HTTP clients, simulators, fixed test tables, etc.

use serde::{Deserialize, Serialize};

/// Error type for rate source operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Unsupported base currency: {0}")]
    UnsupportedBase(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A rate quoted by a source: units of `currency` per unit of the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedRate {
    pub currency: String,
    pub rate: f64,
}

impl QuotedRate {
    pub fn new(currency: impl Into<String>, rate: f64) -> Self {
        Self {
            currency: currency.into(),
            rate,
        }
    }
}

/// Port trait for upstream exchange rate feeds.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetches current rates quoted against `base`.
    /// The base currency itself may be omitted from the result.
    async fn fetch_rates(&self, base: &str) -> Result<Vec<QuotedRate>, ExchangeError>;
}
