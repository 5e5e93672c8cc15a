//! # Realta Client SDK
//!
//! A typed Rust client for the Realta currency API.

use realta_types::{
    ConversionResult, CurrencyInfo, ListingPrice, ListingPriceView, ListingPricesRequest,
    RatesResponse, RefreshResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Realta currency API client.
pub struct RealtaClient {
    base_url: String,
    cron_secret: Option<String>,
    http: Client,
}

impl RealtaClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cron_secret: None,
            http: Client::new(),
        }
    }

    /// Sets the secret sent to the cron endpoints.
    pub fn with_cron_secret(mut self, secret: impl Into<String>) -> Self {
        self.cron_secret = Some(secret.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Lists the currencies offered in the selector.
    pub async fn currencies(&self) -> Result<Vec<CurrencyInfo>, ClientError> {
        self.get("/api/currencies", &[]).await
    }

    /// Converts `amount` minor units from one currency to another.
    pub async fn convert(
        &self,
        amount: i64,
        from: &str,
        to: &str,
        locale: Option<&str>,
    ) -> Result<ConversionResult, ClientError> {
        let amount = amount.to_string();
        let mut query = vec![("amount", amount.as_str()), ("from", from), ("to", to)];
        if let Some(locale) = locale {
            query.push(("locale", locale));
        }
        self.get("/api/convert", &query).await
    }

    /// Converts a batch of listing prices into `currency`.
    pub async fn listing_prices(
        &self,
        currency: &str,
        locale: Option<&str>,
        listings: Vec<ListingPrice>,
    ) -> Result<Vec<ListingPriceView>, ClientError> {
        let req = ListingPricesRequest {
            currency: currency.to_string(),
            locale: locale.map(String::from),
            listings,
        };
        self.post("/api/prices", &req).await
    }

    /// Gets the rate table the server converts with.
    pub async fn rates(&self) -> Result<RatesResponse, ClientError> {
        self.get("/api/rates", &[]).await
    }

    /// Triggers the rate refresh job. Needs the cron secret.
    pub async fn refresh_rates(&self) -> Result<RefreshResponse, ClientError> {
        let mut req = self
            .http
            .get(format!("{}/api/cron/update-rates", self.base_url));
        if let Some(secret) = &self.cron_secret {
            req = req.bearer_auth(secret);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RealtaClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = RealtaClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_cron_secret() {
        let client = RealtaClient::new("http://localhost:3000").with_cron_secret("s3cret");
        assert_eq!(client.cron_secret, Some("s3cret".to_string()));
    }
}
