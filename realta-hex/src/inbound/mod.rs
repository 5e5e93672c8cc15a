//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

pub(crate) mod auth;
pub(crate) mod handlers;
pub(crate) mod rate_limit;
mod server;

pub use rate_limit::DEFAULT_REQUESTS_PER_MINUTE;
pub use server::HttpServer;
