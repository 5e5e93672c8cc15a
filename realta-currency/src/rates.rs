//! USD-based exchange rate table.

use std::collections::HashMap;

/// Currency every rate in a table is quoted against.
pub const BASE_CURRENCY: &str = "USD";

/// Rates shipped with the application, quoted as units per 1 USD.
const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("MXN", 17.5),
    ("ARS", 350.0),
    ("BRL", 5.2),
    ("COP", 4200.0),
    ("CLP", 850.0),
    ("PEN", 3.7),
    ("GTQ", 7.8),
    ("CRC", 520.0),
    ("UYU", 39.0),
    ("BOB", 6.9),
    ("PYG", 7300.0),
    ("DOP", 56.0),
    ("HNL", 24.5),
    ("NIO", 36.8),
    ("PAB", 1.0),
    ("EUR", 0.85),
];

/// Errors raised while building a rate table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateTableError {
    #[error("Currency code cannot be empty")]
    EmptyCode,

    #[error("Invalid rate for {code}: {rate} (must be finite and positive)")]
    InvalidRate { code: String, rate: f64 },

    #[error("Base currency USD is fixed at 1.0, got {0}")]
    BaseRateOverride(f64),
}

/// Mapping from currency code to units of that currency per 1 USD.
///
/// Immutable once handed to a converter. The base currency is always present
/// with a rate of exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Creates a table holding only the base currency.
    pub fn new() -> Self {
        let mut rates = HashMap::new();
        rates.insert(BASE_CURRENCY.to_string(), 1.0);
        Self { rates }
    }

    /// Creates the table of rates shipped with the application.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for (code, rate) in DEFAULT_RATES {
            table.rates.insert((*code).to_string(), *rate);
        }
        table
    }

    /// Builds a table from `(code, rate)` pairs on top of the base entry.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (code, rate) in pairs {
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    /// Inserts or replaces a rate.
    pub fn insert(&mut self, code: impl Into<String>, rate: f64) -> Result<(), RateTableError> {
        let code = code.into();
        if code.is_empty() {
            return Err(RateTableError::EmptyCode);
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateTableError::InvalidRate { code, rate });
        }
        if code == BASE_CURRENCY && rate != 1.0 {
            return Err(RateTableError::BaseRateOverride(rate));
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_rate(mut self, code: impl Into<String>, rate: f64) -> Result<Self, RateTableError> {
        self.insert(code, rate)?;
        Ok(self)
    }

    /// Returns the rate for `code`, if the table has one.
    ///
    /// Lookups are exact: `"usd"` is not `"USD"`.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterates entries sorted by currency code.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, f64)> {
        let mut entries: Vec<_> = self.rates.iter().map(|(c, r)| (c.as_str(), *r)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn base_currency(&self) -> &'static str {
        BASE_CURRENCY
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_base_at_one() {
        let table = ExchangeRateTable::defaults();
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("GTQ"), Some(7.8));
        assert_eq!(table.len(), DEFAULT_RATES.len());
    }

    #[test]
    fn test_new_table_has_only_base() {
        let table = ExchangeRateTable::new();
        assert_eq!(table.len(), 1);
        assert!(table.contains(BASE_CURRENCY));
    }

    #[test]
    fn test_insert_rejects_non_positive_rates() {
        let mut table = ExchangeRateTable::new();
        assert!(matches!(
            table.insert("MXN", 0.0),
            Err(RateTableError::InvalidRate { .. })
        ));
        assert!(matches!(
            table.insert("MXN", -3.0),
            Err(RateTableError::InvalidRate { .. })
        ));
        assert!(matches!(
            table.insert("MXN", f64::NAN),
            Err(RateTableError::InvalidRate { .. })
        ));
        assert!(!table.contains("MXN"));
    }

    #[test]
    fn test_insert_rejects_empty_code() {
        let mut table = ExchangeRateTable::new();
        assert_eq!(table.insert("", 2.0), Err(RateTableError::EmptyCode));
    }

    #[test]
    fn test_base_rate_is_fixed() {
        let mut table = ExchangeRateTable::new();
        assert_eq!(
            table.insert("USD", 1.1),
            Err(RateTableError::BaseRateOverride(1.1))
        );
        assert!(table.insert("USD", 1.0).is_ok());
    }

    #[test]
    fn test_from_pairs() {
        let table = ExchangeRateTable::from_pairs([("GTQ", 8.0), ("EUR", 0.9)]).unwrap();
        assert_eq!(table.rate("GTQ"), Some(8.0));
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("MXN"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = ExchangeRateTable::defaults();
        assert_eq!(table.rate("gtq"), None);
    }

    #[test]
    fn test_iter_sorted() {
        let table = ExchangeRateTable::from_pairs([("MXN", 17.0), ("BRL", 5.0)]).unwrap();
        let codes: Vec<_> = table.iter_sorted().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["BRL", "MXN", "USD"]);
    }
}
