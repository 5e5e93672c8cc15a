//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use realta_types::{AppError, ConvertQuery, ListingPricesRequest, RateRepository};

use crate::CurrencyService;

/// Application state shared across handlers.
pub struct AppState<R: RateRepository> {
    pub service: Arc<CurrencyService<R>>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List the currencies offered in the selector.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> impl IntoResponse {
    Json(state.service.supported_currencies())
}

/// Convert one amount.
#[tracing::instrument(skip(state))]
pub async fn convert<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let result = state.service.convert(query).await?;
    Ok(Json(result))
}

/// Convert a page of listing prices into the viewer's currency.
#[tracing::instrument(skip(state, req), fields(currency = %req.currency, listings = req.listings.len()))]
pub async fn listing_prices<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<ListingPricesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let views = state.service.convert_listing_prices(req).await?;
    Ok(Json(views))
}

/// Show the active rate table.
#[tracing::instrument(skip(state))]
pub async fn rates<R: RateRepository>(State(state): State<Arc<AppState<R>>>) -> impl IntoResponse {
    Json(state.service.current_rates().await)
}

/// Run the rate refresh job. Guarded by the cron secret.
#[tracing::instrument(skip(state))]
pub async fn update_rates<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.service.refresh_rates().await.map_err(|e| {
        tracing::error!("Error updating currency rates: {}", e);
        e
    })?;
    Ok(Json(report))
}
