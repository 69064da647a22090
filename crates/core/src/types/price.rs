//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept at full precision; rounding to two decimal places happens
//! only when a price is formatted for display.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code is not one the storefront sells in.
    #[error("unsupported currency code: {0}")]
    Unsupported(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rand, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// The amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "R 249.99").
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use vitabot_core::{CurrencyCode, Price};
    ///
    /// let price = Price::new(Decimal::new(600, 0), CurrencyCode::ZAR);
    /// assert_eq!(price.display(), "R 600.00");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency_code.symbol(), self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 codes for the markets the store ships to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// South African rand.
    #[default]
    ZAR,
    /// Namibian dollar.
    NAD,
    /// Botswana pula.
    BWP,
}

impl CurrencyCode {
    /// Display symbol placed before amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::ZAR => "R",
            Self::NAD => "N$",
            Self::BWP => "P",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZAR" => Ok(Self::ZAR),
            "NAD" => Ok(Self::NAD),
            "BWP" => Ok(Self::BWP),
            _ => Err(CurrencyError::Unsupported(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        let price = Price::new(Decimal::new(44999, 2), CurrencyCode::ZAR);
        assert_eq!(price.display(), "R 449.99");

        let price = Price::new(Decimal::new(5, 0), CurrencyCode::NAD);
        assert_eq!(price.display(), "N$ 5.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(10005, 3), CurrencyCode::BWP);
        assert_eq!(price.display(), "P 10.01");
    }

    #[test]
    fn test_rounding_does_not_touch_amount() {
        let amount = Decimal::new(1_234_567, 4);
        let price = Price::new(amount, CurrencyCode::ZAR);
        assert_eq!(price.rounded(), Decimal::new(12346, 2));
        assert_eq!(price.amount, amount);
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("zar".parse::<CurrencyCode>().unwrap(), CurrencyCode::ZAR);
        assert_eq!(" BWP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::BWP);
        assert!(matches!(
            "USD".parse::<CurrencyCode>(),
            Err(CurrencyError::Unsupported(_))
        ));
    }
}
