//! Price conversion over injected rate and symbol tables.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::{self, SupportedCurrency};
use crate::format::{self, format_whole};
use crate::observer::{FallbackEvent, FallbackObserver, TracingObserver};
use crate::rates::ExchangeRateTable;
use crate::symbols::CurrencySymbolTable;

/// Locale used when a caller does not provide one.
pub const DEFAULT_LOCALE: &str = "es-MX";

/// Outcome of converting one price. Amounts are in major units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    #[schema(example = 100.0)]
    pub original_amount: f64,
    #[schema(example = 780.0)]
    pub converted_amount: f64,
    #[schema(example = "USD")]
    pub original_currency: String,
    #[schema(example = "GTQ")]
    pub converted_currency: String,
    /// Units of the target currency per unit of the source currency
    #[schema(example = 7.8)]
    pub exchange_rate: f64,
    #[schema(example = "US$100")]
    pub formatted_original: String,
    #[schema(example = "Q780")]
    pub formatted_converted: String,
}

/// Converts and formats prices. Never fails.
///
/// Build one at the composition root and share it behind an `Arc`; the tables
/// cannot change after construction.
#[derive(Clone)]
pub struct CurrencyConverter {
    rates: ExchangeRateTable,
    symbols: CurrencySymbolTable,
    observer: Arc<dyn FallbackObserver>,
}

impl CurrencyConverter {
    /// Creates a converter that reports fallbacks through `tracing`.
    pub fn new(rates: ExchangeRateTable, symbols: CurrencySymbolTable) -> Self {
        Self {
            rates,
            symbols,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the fallback observer.
    pub fn with_observer(mut self, observer: Arc<dyn FallbackObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// A converter with the same symbols and observer over a new rate table.
    pub fn with_rates(&self, rates: ExchangeRateTable) -> Self {
        Self {
            rates,
            symbols: self.symbols.clone(),
            observer: Arc::clone(&self.observer),
        }
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    pub fn symbols(&self) -> &CurrencySymbolTable {
        &self.symbols
    }

    /// Rate for `code`, or 1.0 when the table has none.
    pub fn rate_or_default(&self, code: &str) -> f64 {
        match self.rates.rate(code) {
            Some(rate) => rate,
            None => {
                self.observer.observe(&FallbackEvent::UnknownRate {
                    code: code.to_string(),
                });
                1.0
            }
        }
    }

    /// Units of `to` per unit of `from`, routed through the base currency.
    pub fn exchange_rate(&self, from: &str, to: &str) -> f64 {
        if from == to {
            return 1.0;
        }
        self.rate_or_default(to) / self.rate_or_default(from)
    }

    /// Converts `amount_minor` (cents) from one currency to another.
    pub fn convert_price(
        &self,
        amount_minor: i64,
        from: &str,
        to: &str,
        locale: &str,
    ) -> ConversionResult {
        let original_amount = amount_minor as f64 / 100.0;

        if from == to {
            return ConversionResult {
                original_amount,
                converted_amount: original_amount,
                original_currency: from.to_string(),
                converted_currency: to.to_string(),
                exchange_rate: 1.0,
                formatted_original: self.format_currency(original_amount, from, locale),
                formatted_converted: self.format_currency(original_amount, to, locale),
            };
        }

        let from_rate = self.rate_or_default(from);
        let to_rate = self.rate_or_default(to);

        let usd_amount = original_amount / from_rate;
        let converted_amount = usd_amount * to_rate;

        ConversionResult {
            original_amount,
            converted_amount,
            original_currency: from.to_string(),
            converted_currency: to.to_string(),
            exchange_rate: to_rate / from_rate,
            formatted_original: self.format_currency(original_amount, from, locale),
            formatted_converted: self.format_currency(converted_amount, to, locale),
        }
    }

    /// Formats an amount in major units, rounded to whole units.
    ///
    /// Falls back to `<symbol><amount>` when the locale formatter rejects the
    /// currency or locale.
    pub fn format_currency(&self, amount: f64, currency: &str, locale: &str) -> String {
        match format_whole(amount, currency, locale) {
            Ok(formatted) => formatted,
            Err(reason) => {
                self.observer.observe(&FallbackEvent::FormatFallback {
                    currency: currency.to_string(),
                    locale: locale.to_string(),
                    reason,
                });
                self.manual_format(amount, currency)
            }
        }
    }

    /// Formats an amount in minor units (cents).
    pub fn format_minor(&self, amount_minor: i64, currency: &str, locale: &str) -> String {
        self.format_currency(amount_minor as f64 / 100.0, currency, locale)
    }

    /// Currencies offered in selection menus.
    pub fn supported_currencies(&self) -> &'static [SupportedCurrency] {
        catalog::supported_currencies()
    }

    fn manual_format(&self, amount: f64, currency: &str) -> String {
        let symbol = match self.symbols.symbol(currency) {
            Some(symbol) => symbol,
            None => {
                self.observer.observe(&FallbackEvent::UnknownSymbol {
                    code: currency.to_string(),
                });
                currency
            }
        };
        format!("{symbol}{}", plain_number(amount))
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(ExchangeRateTable::defaults(), CurrencySymbolTable::defaults())
    }
}

impl fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("rates", &self.rates.len())
            .field("symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

/// Rounded amount with `,` grouping, for the manual fallback.
fn plain_number(amount: f64) -> String {
    if amount.is_nan() {
        return "NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    let rounded = amount.round();
    let grouped = format::group_digits(&format!("{:.0}", rounded.abs()), ",", 1);
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
