//! Currency selection for price rendering on the source site
//!
//! The marketplace renders prices in the currency named by the `cy` cookie.
//! Only a fixed set of codes is accepted; anything else falls back to RUB.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the marketplace can render prices in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Primary currency of the site
    #[default]
    Rub,
    Usd,
    Eur,
    Uah,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Rub, Currency::Usd, Currency::Eur, Currency::Uah];

    /// Parse a user supplied currency code, falling back to the primary currency
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "RUB" => Currency::Rub,
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "UAH" => Currency::Uah,
            other => {
                if !other.is_empty() {
                    tracing::debug!("Unknown currency '{}', falling back to RUB", other);
                }
                Currency::Rub
            }
        }
    }

    /// Value of the currency-selection cookie
    pub fn code(self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Uah => "UAH",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Rub => "₽",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Uah => "₴",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_are_case_insensitive() {
        assert_eq!(Currency::parse_lenient("usd"), Currency::Usd);
        assert_eq!(Currency::parse_lenient(" EUR "), Currency::Eur);
        assert_eq!(Currency::parse_lenient("Uah"), Currency::Uah);
    }

    #[test]
    fn test_unknown_code_falls_back_to_primary() {
        assert_eq!(Currency::parse_lenient("GBP"), Currency::Rub);
        assert_eq!(Currency::parse_lenient(""), Currency::Rub);
    }

    #[test]
    fn test_code_round_trips_through_parse() {
        for currency in Currency::ALL {
            assert_eq!(Currency::parse_lenient(currency.code()), currency);
        }
    }
}
