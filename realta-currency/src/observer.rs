//! Diagnostics hook for silent fallbacks.
//!
//! The converter never surfaces unknown currencies as errors. Observers make
//! those degradations visible without changing that contract.

use std::fmt;

use crate::format::FormatError;

/// A fallback taken by the converter.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackEvent {
    /// No rate for `code`; 1.0 was used.
    UnknownRate { code: String },
    /// No symbol for `code`; the code itself was displayed.
    UnknownSymbol { code: String },
    /// The locale formatter rejected the input; a manual string was built.
    FormatFallback {
        currency: String,
        locale: String,
        reason: FormatError,
    },
}

impl fmt::Display for FallbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackEvent::UnknownRate { code } => {
                write!(f, "no exchange rate for {code}, using 1:1")
            }
            FallbackEvent::UnknownSymbol { code } => {
                write!(f, "no symbol for {code}, displaying code")
            }
            FallbackEvent::FormatFallback {
                currency,
                locale,
                reason,
            } => write!(
                f,
                "locale formatting failed for {currency} in {locale:?}: {reason}"
            ),
        }
    }
}

/// Receives fallback events. Must not panic.
pub trait FallbackObserver: Send + Sync {
    fn observe(&self, event: &FallbackEvent);
}

/// Logs every fallback at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FallbackObserver for TracingObserver {
    fn observe(&self, event: &FallbackEvent) {
        match event {
            FallbackEvent::UnknownRate { code } => {
                tracing::warn!(currency = %code, "{}", event)
            }
            FallbackEvent::UnknownSymbol { code } => {
                tracing::warn!(currency = %code, "{}", event)
            }
            FallbackEvent::FormatFallback {
                currency, locale, ..
            } => tracing::warn!(currency = %currency, locale = %locale, "{}", event),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FallbackObserver for NoopObserver {
    fn observe(&self, _event: &FallbackEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = FallbackEvent::UnknownRate { code: "XYZ".into() };
        assert_eq!(event.to_string(), "no exchange rate for XYZ, using 1:1");

        let event = FallbackEvent::FormatFallback {
            currency: "USD".into(),
            locale: String::new(),
            reason: FormatError::InvalidLocale(String::new()),
        };
        assert!(event.to_string().starts_with("locale formatting failed for USD in \"\""));
    }
}
