//! Curated currency list for selection menus.
//!
//! Display order is hand-maintained and intentionally narrower than the rate
//! table: the rate table also covers currencies that are only converted on the
//! backend.

use serde::Serialize;
use utoipa::ToSchema;

/// A currency offered to users in the currency selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SupportedCurrency {
    #[schema(value_type = String, example = "GTQ")]
    pub code: &'static str,
    #[schema(value_type = String, example = "Quetzal Guatemalteco")]
    pub name: &'static str,
    #[schema(value_type = String, example = "Q")]
    pub symbol: &'static str,
}

const SUPPORTED: &[SupportedCurrency] = &[
    SupportedCurrency {
        code: "USD",
        name: "Dólar Estadounidense",
        symbol: "$",
    },
    SupportedCurrency {
        code: "MXN",
        name: "Peso Mexicano",
        symbol: "$",
    },
    SupportedCurrency {
        code: "ARS",
        name: "Peso Argentino",
        symbol: "$",
    },
    SupportedCurrency {
        code: "BRL",
        name: "Real Brasileño",
        symbol: "R$",
    },
    SupportedCurrency {
        code: "COP",
        name: "Peso Colombiano",
        symbol: "$",
    },
    SupportedCurrency {
        code: "CLP",
        name: "Peso Chileno",
        symbol: "$",
    },
    SupportedCurrency {
        code: "PEN",
        name: "Sol Peruano",
        symbol: "S/",
    },
    SupportedCurrency {
        code: "GTQ",
        name: "Quetzal Guatemalteco",
        symbol: "Q",
    },
    SupportedCurrency {
        code: "CRC",
        name: "Colón Costarricense",
        symbol: "₡",
    },
    SupportedCurrency {
        code: "EUR",
        name: "Euro",
        symbol: "€",
    },
];

/// Returns the currencies offered in selection menus, in display order.
pub fn supported_currencies() -> &'static [SupportedCurrency] {
    SUPPORTED
}
