//! Upstream exchange rate feeds implementing the `RateSource` port.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, instrument};

use realta_types::{ExchangeError, QuotedRate, RateSource};

// ─────────────────────────────────────────────────────────────────────────────
// Simulated source
// ─────────────────────────────────────────────────────────────────────────────

/// Centre rate and maximum deviation (either side) per currency, USD base.
const SIMULATED_QUOTES: &[(&str, f64, f64)] = &[
    ("MXN", 17.25, 0.25),
    ("ARS", 350.5, 5.0),
    ("COP", 4100.0, 50.0),
    ("CLP", 850.0, 10.0),
    ("PEN", 3.75, 0.05),
    ("BRL", 5.2, 0.1),
    ("UYU", 39.5, 0.5),
    ("BOB", 6.9, 0.05),
    ("PYG", 7300.0, 50.0),
    ("CRC", 520.0, 5.0),
    ("GTQ", 7.8, 0.1),
    ("HNL", 24.7, 0.25),
    ("NIO", 36.8, 0.5),
    ("PAB", 1.0, 0.0),
    ("DOP", 56.5, 1.0),
    ("EUR", 0.92, 0.01),
    ("CAD", 1.35, 0.025),
];

/// Produces plausible USD-based rates by jittering fixed centre values.
///
/// Stands in for a paid rates feed in development and demos. PAB stays
/// pegged at 1.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRateSource;

impl SimulatedRateSource {
    pub fn new() -> Self {
        Self
    }

    fn sample() -> Vec<QuotedRate> {
        let mut rng = rand::rng();
        SIMULATED_QUOTES
            .iter()
            .map(|&(code, centre, spread)| {
                let jitter = if spread > 0.0 {
                    rng.random_range(-spread..=spread)
                } else {
                    0.0
                };
                QuotedRate::new(code, centre + jitter)
            })
            .collect()
    }
}

#[async_trait]
impl RateSource for SimulatedRateSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch_rates(&self, base: &str) -> Result<Vec<QuotedRate>, ExchangeError> {
        if base != "USD" {
            return Err(ExchangeError::UnsupportedBase(base.to_string()));
        }
        Ok(Self::sample())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP source
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a "latest rates" response.
///
/// Accepts both `base` (Open Exchange Rates) and `base_code` (ExchangeRate-API).
#[derive(Debug, Deserialize)]
struct LatestRatesPayload {
    #[serde(alias = "base_code")]
    base: String,
    rates: BTreeMap<String, f64>,
}

/// Fetches rates from a JSON endpoint shaped like `{"base": "USD", "rates": {...}}`.
///
/// The requested base is passed as the `base` query parameter.
pub struct HttpRateSource {
    url: String,
    http: reqwest::Client,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            url: url.into(),
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Validates a payload against the requested base and flattens it to quotes.
fn parse_payload(payload: LatestRatesPayload, base: &str) -> Result<Vec<QuotedRate>, ExchangeError> {
    if !payload.base.eq_ignore_ascii_case(base) {
        return Err(ExchangeError::InvalidResponse(format!(
            "expected base {}, got {}",
            base, payload.base
        )));
    }

    let mut quotes = Vec::with_capacity(payload.rates.len());
    for (code, rate) in payload.rates {
        if code.eq_ignore_ascii_case(base) {
            continue;
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ExchangeError::InvalidResponse(format!(
                "rate for {} is not positive: {}",
                code, rate
            )));
        }
        quotes.push(QuotedRate::new(code.to_ascii_uppercase(), rate));
    }
    Ok(quotes)
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_rates(&self, base: &str) -> Result<Vec<QuotedRate>, ExchangeError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("base", base)])
            .send()
            .await
            .map_err(|e| ExchangeError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExchangeError::ServiceUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: LatestRatesPayload = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        let quotes = parse_payload(payload, base)?;
        debug!("Fetched {} rates", quotes.len());
        Ok(quotes)
    }
}
