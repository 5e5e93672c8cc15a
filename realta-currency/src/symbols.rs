//! Display symbols used when the locale formatter cannot render a currency.

use std::collections::HashMap;

const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("MXN", "$"),
    ("ARS", "$"),
    ("BRL", "R$"),
    ("COP", "$"),
    ("CLP", "$"),
    ("PEN", "S/"),
    ("GTQ", "Q"),
    ("CRC", "₡"),
    ("UYU", "$U"),
    ("BOB", "Bs"),
    ("PYG", "₲"),
    ("DOP", "RD$"),
    ("HNL", "L"),
    ("NIO", "C$"),
    ("PAB", "B/."),
    ("EUR", "€"),
];

/// Mapping from currency code to display symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencySymbolTable {
    symbols: HashMap<String, String>,
}

impl CurrencySymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of symbols shipped with the application.
    pub fn defaults() -> Self {
        Self::from_pairs(DEFAULT_SYMBOLS.iter().copied())
    }

    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            symbols: pairs
                .into_iter()
                .map(|(code, symbol)| (code.into(), symbol.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, symbol: impl Into<String>) {
        self.symbols.insert(code.into(), symbol.into());
    }

    pub fn symbol(&self, code: &str) -> Option<&str> {
        self.symbols.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
