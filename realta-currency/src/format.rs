//! Locale-aware whole-unit currency formatting.
//!
//! A small rendition of platform number formatting for the locales the
//! marketplace serves. Amounts are always rounded to whole currency units
//! (half away from zero), even for currencies that normally show decimals.
//!
//! Unlike [`CurrencyConverter::format_currency`](crate::CurrencyConverter::format_currency),
//! this function rejects malformed input: the converter catches the error and
//! builds a manual string instead.

use std::fmt;
use std::str::FromStr;

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

/// Input rejected by the formatter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid locale tag: {0:?}")]
    InvalidLocale(String),

    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Amount is not a finite number")]
    NonFiniteAmount,
}

// ─────────────────────────────────────────────────────────────────────────────
// Locale tags
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed BCP-47 style tag: `language[-script][-region][-variant...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTag {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LocaleTag {
    pub fn parse(tag: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidLocale(tag.to_string());
        let mut parts = tag.split('-').peekable();

        let language = parts
            .next()
            .filter(|l| is_alpha(l) && matches!(l.len(), 2..=3 | 5..=8))
            .ok_or_else(invalid)?
            .to_ascii_lowercase();

        let mut script = None;
        if let Some(part) = parts.peek() {
            if part.len() == 4 && is_alpha(part) {
                let mut s = part.to_ascii_lowercase();
                s[..1].make_ascii_uppercase();
                script = Some(s);
                parts.next();
            }
        }

        let mut region = None;
        if let Some(part) = parts.peek() {
            let alpha_region = part.len() == 2 && is_alpha(part);
            let numeric_region = part.len() == 3 && part.bytes().all(|b| b.is_ascii_digit());
            if alpha_region || numeric_region {
                region = Some(part.to_ascii_uppercase());
                parts.next();
            }
        }

        // Variants and extensions are accepted but do not affect formatting.
        for part in parts {
            if part.is_empty() || part.len() > 8 || !part.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(invalid());
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl FromStr for LocaleTag {
    type Err = FormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        Ok(())
    }
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

// ─────────────────────────────────────────────────────────────────────────────
// Number conventions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    /// `$100`
    Before,
    /// `$ 100`
    BeforeSpaced,
    /// `100 €`
    AfterSpaced,
}

#[derive(Debug, Clone, Copy)]
struct NumberConventions {
    group_separator: &'static str,
    /// Digits required in the leading group before separators are used.
    min_grouping: usize,
    placement: SymbolPlacement,
}

const ENGLISH: NumberConventions = NumberConventions {
    group_separator: ",",
    min_grouping: 1,
    placement: SymbolPlacement::Before,
};

fn conventions(locale: &LocaleTag) -> NumberConventions {
    use SymbolPlacement::*;

    let (group_separator, min_grouping, placement) = match (locale.language(), locale.region()) {
        (
            "es",
            Some("MX" | "US" | "GT" | "HN" | "NI" | "PA" | "DO" | "PE" | "SV" | "PR" | "419"),
        ) => (",", 1, Before),
        ("es", Some("AR" | "CO" | "CL" | "UY" | "PY" | "BO" | "EC" | "VE")) => (".", 1, BeforeSpaced),
        ("es", Some("CR")) => (NBSP, 1, Before),
        ("es", _) => (".", 2, AfterSpaced),
        ("pt", Some("PT")) => (NBSP, 2, AfterSpaced),
        ("pt", _) => (".", 1, BeforeSpaced),
        ("fr", _) => (NARROW_NBSP, 1, AfterSpaced),
        ("de" | "it", _) => (".", 1, AfterSpaced),
        _ => return ENGLISH,
    };

    NumberConventions {
        group_separator,
        min_grouping,
        placement,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency display
// ─────────────────────────────────────────────────────────────────────────────

struct CurrencyDisplay {
    code: &'static str,
    /// Shown where the currency is the local one.
    narrow: &'static str,
    /// Shown everywhere else.
    international: &'static str,
    home_regions: &'static [&'static str],
}

const EUROZONE: &[&str] = &[
    "AT", "BE", "DE", "EE", "ES", "FI", "FR", "GR", "IE", "IT", "LT", "LU", "LV", "NL", "PT", "SI",
    "SK",
];

const DISPLAY: &[CurrencyDisplay] = &[
    CurrencyDisplay { code: "USD", narrow: "$", international: "US$", home_regions: &["US", "PR", "EC", "SV"] },
    CurrencyDisplay { code: "MXN", narrow: "$", international: "MX$", home_regions: &["MX"] },
    CurrencyDisplay { code: "ARS", narrow: "$", international: "ARS", home_regions: &["AR"] },
    CurrencyDisplay { code: "BRL", narrow: "R$", international: "R$", home_regions: &["BR"] },
    CurrencyDisplay { code: "COP", narrow: "$", international: "COP", home_regions: &["CO"] },
    CurrencyDisplay { code: "CLP", narrow: "$", international: "CLP", home_regions: &["CL"] },
    CurrencyDisplay { code: "PEN", narrow: "S/", international: "PEN", home_regions: &["PE"] },
    CurrencyDisplay { code: "GTQ", narrow: "Q", international: "GTQ", home_regions: &["GT"] },
    CurrencyDisplay { code: "CRC", narrow: "₡", international: "CRC", home_regions: &["CR"] },
    CurrencyDisplay { code: "UYU", narrow: "$", international: "UYU", home_regions: &["UY"] },
    CurrencyDisplay { code: "BOB", narrow: "Bs", international: "BOB", home_regions: &["BO"] },
    CurrencyDisplay { code: "PYG", narrow: "₲", international: "PYG", home_regions: &["PY"] },
    CurrencyDisplay { code: "DOP", narrow: "RD$", international: "DOP", home_regions: &["DO"] },
    CurrencyDisplay { code: "HNL", narrow: "L", international: "HNL", home_regions: &["HN"] },
    CurrencyDisplay { code: "NIO", narrow: "C$", international: "NIO", home_regions: &["NI"] },
    CurrencyDisplay { code: "PAB", narrow: "B/.", international: "PAB", home_regions: &["PA"] },
    CurrencyDisplay { code: "CAD", narrow: "$", international: "CA$", home_regions: &["CA"] },
    CurrencyDisplay { code: "GBP", narrow: "£", international: "£", home_regions: &["GB"] },
    CurrencyDisplay { code: "EUR", narrow: "€", international: "€", home_regions: EUROZONE },
];

fn display_symbol<'a>(code: &'a str, locale: &LocaleTag) -> &'a str {
    let Some(display) = DISPLAY.iter().find(|d| d.code == code) else {
        return code;
    };
    let at_home = locale
        .region()
        .is_some_and(|region| display.home_regions.contains(&region));
    // Region-less English defaults to the US.
    let english_default = code == "USD" && locale.language() == "en" && locale.region().is_none();
    if at_home || english_default {
        display.narrow
    } else {
        display.international
    }
}

/// Validates a currency code and upper-cases it.
fn normalize_currency(currency: &str) -> Result<String, FormatError> {
    if currency.len() == 3 && is_alpha(currency) {
        Ok(currency.to_ascii_uppercase())
    } else {
        Err(FormatError::InvalidCurrency(currency.to_string()))
    }
}

pub(crate) fn group_digits(digits: &str, separator: &str, min_grouping: usize) -> String {
    if digits.len() < 3 + min_grouping {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Formats `amount` (major units) in `currency` for `locale`, with zero
/// fraction digits.
pub fn format_whole(amount: f64, currency: &str, locale: &str) -> Result<String, FormatError> {
    let locale = LocaleTag::parse(locale)?;
    let code = normalize_currency(currency)?;
    if !amount.is_finite() {
        return Err(FormatError::NonFiniteAmount);
    }

    let rounded = amount.round();
    let conventions = conventions(&locale);
    let number = group_digits(
        &format!("{:.0}", rounded.abs()),
        conventions.group_separator,
        conventions.min_grouping,
    );

    let symbol = display_symbol(&code, &locale);
    let placement = match conventions.placement {
        SymbolPlacement::Before if is_alpha(symbol) => SymbolPlacement::BeforeSpaced,
        placement => placement,
    };

    let body = match placement {
        SymbolPlacement::Before => format!("{symbol}{number}"),
        SymbolPlacement::BeforeSpaced => format!("{symbol}{NBSP}{number}"),
        SymbolPlacement::AfterSpaced => format!("{number}{NBSP}{symbol}"),
    };

    if rounded < 0.0 {
        Ok(format!("-{body}"))
    } else {
        Ok(body)
    }
}
