//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use realta_currency::{BASE_CURRENCY, ConversionResult, SupportedCurrency};

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query for a single price conversion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    /// Amount in minor units (cents)
    #[schema(example = 10000)]
    pub amount: i64,
    /// Source currency code
    #[serde(default = "default_currency")]
    #[schema(example = "USD")]
    pub from: String,
    /// Target currency code (`currency` is accepted as an alias)
    #[serde(default = "default_currency", alias = "currency")]
    #[schema(example = "GTQ")]
    pub to: String,
    /// BCP-47 locale used for display strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "es-GT")]
    pub locale: Option<String>,
}

/// The price of one listing, as stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingPrice {
    /// Listing identifier, echoed back in the response
    #[schema(example = "prop-42")]
    pub id: String,
    /// Price in minor units (cents)
    #[schema(example = 85000)]
    pub amount: i64,
    /// Currency the price is stored in
    #[schema(example = "USD")]
    pub currency: String,
}

/// Request to display a page of listings in the viewer's currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingPricesRequest {
    /// Viewer currency
    #[serde(default = "default_currency")]
    #[schema(example = "GTQ")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "es-GT")]
    pub locale: Option<String>,
    pub listings: Vec<ListingPrice>,
}

/// One listing price converted for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingPriceView {
    pub id: String,
    pub price: ConversionResult,
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency & rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A currency offered in the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyInfo {
    #[schema(example = "GTQ")]
    pub code: String,
    #[schema(example = "Quetzal Guatemalteco")]
    pub name: String,
    #[schema(example = "Q")]
    pub symbol: String,
}

impl From<&SupportedCurrency> for CurrencyInfo {
    fn from(currency: &SupportedCurrency) -> Self {
        Self {
            code: currency.code.to_string(),
            name: currency.name.to_string(),
            symbol: currency.symbol.to_string(),
        }
    }
}

/// The rate table currently used for conversions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    #[schema(example = "USD")]
    pub base: String,
    /// Units of each currency per unit of `base`, sorted by code
    #[schema(example = json!({"GTQ": 7.8, "USD": 1.0}))]
    pub rates: BTreeMap<String, f64>,
}

/// A rate written by the refresh job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RefreshedRate {
    #[schema(example = "GTQ")]
    pub currency: String,
    /// Rate rendered with eight decimals
    #[schema(example = "7.81234567")]
    pub rate: String,
}

/// Summary of a refresh run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub success: bool,
    /// Number of rates written
    #[schema(example = 17)]
    pub updated: usize,
    pub rates: Vec<RefreshedRate>,
    pub timestamp: DateTime<Utc>,
}
