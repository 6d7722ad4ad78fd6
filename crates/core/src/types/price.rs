//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::ops::Mul;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (euros, not cents).
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

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display (e.g., "€49.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

/// ISO 4217 currency codes the storefront displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Symbol shown before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// Returned when a currency code is not one of [`CurrencyCode`]'s variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// Format a decimal string amount returned by an API with its currency code.
///
/// Falls back to `"<amount> <CODE>"` for currencies without a known symbol and
/// to the raw input when the amount is not a decimal.
#[must_use]
pub fn format_money(amount: &str, currency_code: &str) -> String {
    let Ok(value) = Decimal::from_str(amount.trim()) else {
        return format!("{amount} {currency_code}");
    };
    CurrencyCode::from_str(currency_code).map_or_else(
        |_| format!("{value:.2} {currency_code}"),
        |code| Price::new(value, code).display(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::from_cents(4999, CurrencyCode::EUR);
        assert_eq!(price.display(), "€49.99");

        let whole = Price::new(Decimal::new(47, 0), CurrencyCode::EUR);
        assert_eq!(whole.to_string(), "€47.00");
    }

    #[test]
    fn test_multiply_by_quantity() {
        let price = Price::from_cents(4999, CurrencyCode::EUR);
        assert_eq!((price * 3).amount, Decimal::new(14997, 2));
        assert_eq!((price * 0).amount, Decimal::ZERO);
    }

    #[test]
    fn test_currency_code_parsing() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("49.9", "EUR"), "€49.90");
        assert_eq!(format_money("1200", "USD"), "$1200.00");
        assert_eq!(format_money("10.5", "JPY"), "10.50 JPY");
        assert_eq!(format_money("n/a", "EUR"), "n/a EUR");
    }

    #[test]
    fn test_serde_keeps_decimal_precision() {
        let price = Price::from_cents(4700, CurrencyCode::EUR);
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
