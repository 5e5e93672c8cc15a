//! # Realta Hex
//!
//! Application service layer and HTTP adapter for the currency service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (conversions over the active rate snapshot)
//! - `worker/` - Periodic reload of persisted rates
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served at `/swagger-ui`
//!
//! The service is generic over `R: RateRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;
pub mod worker;

#[cfg(test)]
mod service_tests;

pub use service::CurrencyService;
pub use worker::{DEFAULT_RELOAD_INTERVAL, RateReloadWorker};
