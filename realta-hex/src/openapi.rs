//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use realta_types::{
    ConversionResult, ConvertQuery, CurrencyInfo, ListingPrice, ListingPriceView,
    ListingPricesRequest, RatesResponse, RefreshResponse, RefreshedRate,
};
use serde::Serialize;
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

/// Error body returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Amount cannot be negative")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
}

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Currencies offered in the selector
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "currencies",
    responses(
        (status = 200, description = "Supported currencies, in display order", body = Vec<CurrencyInfo>)
    )
)]
async fn list_currencies() {}

/// Convert one price
///
/// `amount` is in minor units (cents). The response amounts are in major units
/// and the formatted strings are rounded to whole units.
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "currencies",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Converted price", body = ConversionResult),
        (status = 400, description = "Missing or negative amount", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse)
    )
)]
async fn convert() {}

/// Convert listing prices into the viewer's currency
#[utoipa::path(
    post,
    path = "/api/prices",
    tag = "currencies",
    request_body = ListingPricesRequest,
    responses(
        (status = 200, description = "One converted price per listing, in request order", body = Vec<ListingPriceView>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse)
    )
)]
async fn listing_prices() {}

/// Active exchange rate table
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Rates relative to USD", body = RatesResponse)
    )
)]
async fn rates() {}

/// Refresh exchange rates (scheduler only)
#[utoipa::path(
    get,
    path = "/api/cron/update-rates",
    tag = "rates",
    security(("cron_secret" = [])),
    responses(
        (status = 200, description = "Rates refreshed", body = RefreshResponse),
        (status = 401, description = "Missing or wrong secret", body = ErrorResponse),
        (status = 502, description = "Rate source failed", body = ErrorResponse)
    )
)]
async fn update_rates() {}

/// OpenAPI documentation for the Realta currency API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Realta Currency API",
        version = "1.0.0",
        description = "Price conversion and localized formatting for Realta listings.\n\n## Units\n\nRequest amounts are integer minor units (cents). Conversions route through USD.\n\n## Scheduler\n\n`/api/cron/update-rates` requires the scheduler secret:\n\n```\nAuthorization: Bearer <CRON_SECRET>\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        convert,
        listing_prices,
        rates,
        update_rates,
    ),
    components(
        schemas(
            ConversionResult,
            CurrencyInfo,
            ListingPrice,
            ListingPricesRequest,
            ListingPriceView,
            RatesResponse,
            RefreshedRate,
            RefreshResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currencies", description = "Currency catalogue and price conversion"),
        (name = "rates", description = "Exchange rate table and refresh job"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the scheduler's bearer secret.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cron_secret",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in [
            "/health",
            "/api/currencies",
            "/api/convert",
            "/api/prices",
            "/api/rates",
            "/api/cron/update-rates",
        ] {
            assert!(paths.contains(&path), "missing {}", path);
        }
    }
}
