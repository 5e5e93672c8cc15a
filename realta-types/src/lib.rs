//! # Realta Types
//!
//! Domain types and port traits for the Realta currency service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Persisted exchange rates
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{StoredRate, validate_currency_code};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{ExchangeError, QuotedRate, RateRepository, RateSource};

pub use realta_currency::{ConversionResult, CurrencyConverter, DEFAULT_LOCALE};
