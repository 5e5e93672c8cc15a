//! Domain models for the currency service.

pub mod rate;

pub use rate::{StoredRate, validate_currency_code};
