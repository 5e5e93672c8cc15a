//! Currency Conversion for Realta Listings
//!
//! Converts listing prices between currencies through a USD-based rate table
//! and renders them for the viewer's locale. Everything in this crate is pure:
//! the tables are explicit values built at the composition root, and the
//! converter never fails. Unknown currencies degrade to a 1:1 rate and the raw
//! code as symbol, reported through a [`FallbackObserver`].
//!
//! # Unit contract
//! Amounts enter as integer minor units (cents) and leave as major units.
//! [`CurrencyConverter::format_currency`] is the only entry point that takes
//! major units; [`CurrencyConverter::format_minor`] takes minor units.
//!
//! # Accuracy
//! Cross conversions route through USD (`amount / rate(from) * rate(to)`), so
//! they are only as accurate as two independently published USD rates, and a
//! round trip is not guaranteed to reproduce the original amount exactly.
//!
//! # Example
//! ```
//! use realta_currency::CurrencyConverter;
//!
//! let converter = CurrencyConverter::default();
//!
//! // 100.00 USD shown to a viewer in Guatemala
//! let result = converter.convert_price(10_000, "USD", "GTQ", "es-GT");
//! assert!((result.converted_amount - 780.0).abs() < 1e-9);
//! assert_eq!(result.formatted_converted, "Q780");
//! ```

pub mod catalog;
pub mod converter;
pub mod format;
pub mod observer;
pub mod rates;
pub mod symbols;

pub use catalog::{SupportedCurrency, supported_currencies};
pub use converter::{ConversionResult, CurrencyConverter, DEFAULT_LOCALE};
pub use format::{FormatError, LocaleTag, format_whole};
pub use observer::{FallbackEvent, FallbackObserver, NoopObserver, TracingObserver};
pub use rates::{BASE_CURRENCY, ExchangeRateTable, RateTableError};
pub use symbols::CurrencySymbolTable;
