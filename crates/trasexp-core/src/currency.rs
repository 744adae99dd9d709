//! Currency and percentage formatting
//!
//! Amounts are rounded to two decimals, half away from zero, using
//! `rust_decimal` so that values such as `0.125` round the way a person
//! would expect.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use trasexp_utils::format_number;

/// Currencies the client can display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Ngn,
    Usd,
    Eur,
    Gbp,
}

impl CurrencyCode {
    /// Resolve a code, falling back to NGN for anything unknown
    pub fn resolve(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "USD" => CurrencyCode::Usd,
            "EUR" => CurrencyCode::Eur,
            "GBP" => CurrencyCode::Gbp,
            _ => CurrencyCode::Ngn,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Ngn => "NGN",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Ngn => "₦",
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
        }
    }

    /// Locale tag the amounts are grouped for
    pub fn locale(&self) -> &'static str {
        match self {
            CurrencyCode::Ngn => "en-NG",
            _ => "en-US",
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let plain = format_plain(amount);
        match plain.strip_prefix('-') {
            Some(magnitude) => format!("-{}{}", self.symbol(), magnitude),
            None => format!("{}{}", self.symbol(), plain),
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Symbol for a currency code, `₦` when the code is unknown
pub fn currency_symbol(code: &str) -> &'static str {
    CurrencyCode::resolve(code).symbol()
}

/// Format an amount as money, e.g. `-₦1,234.50`
pub fn format_currency(amount: f64, code: &str) -> String {
    CurrencyCode::resolve(code).format(amount)
}

/// Two decimals without grouping, e.g. `1234.50`. Non-finite input is zero.
pub fn format_fixed(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }
    match Decimal::from_f64(amount) {
        Some(value) => {
            let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            if rounded.is_zero() {
                rounded = Decimal::ZERO;
            }
            rounded.rescale(2);
            rounded.to_string()
        }
        // Out of Decimal's range
        None => format!("{:.2}", amount),
    }
}

/// Two decimals with comma grouping and no symbol, e.g. `-1,234.50`
pub fn format_plain(amount: f64) -> String {
    let fixed = format_fixed(amount);
    match fixed.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", format_number(whole), fraction),
        None => format_number(fixed),
    }
}

/// Percentage with two decimals, `0%` for zero or non-finite values
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0%".to_string();
    }
    format!("{}%", format_fixed(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(currency_symbol("NGN"), "₦");
        assert_eq!(currency_symbol("usd"), "$");
        assert_eq!(currency_symbol("EUR"), "€");
        assert_eq!(currency_symbol("GBP"), "£");
        assert_eq!(currency_symbol("JPY"), "₦");
        assert_eq!(currency_symbol(""), "₦");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, "NGN"), "₦1,234.50");
        assert_eq!(format_currency(0.0, "USD"), "$0.00");
        assert_eq!(format_currency(-1234567.891, "USD"), "-$1,234,567.89");
        assert_eq!(format_currency(999.999, "GBP"), "£1,000.00");
        assert_eq!(format_currency(12.0, "XYZ"), "₦12.00");
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(format_plain(0.125), "0.13");
        assert_eq!(format_plain(-0.125), "-0.13");
        assert_eq!(format_plain(2.5), "2.50");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_currency(-0.001, "NGN"), "₦0.00");
        assert_eq!(format_currency(-0.0, "EUR"), "€0.00");
    }

    #[test]
    fn test_non_finite_amounts() {
        assert_eq!(format_currency(f64::NAN, "NGN"), "₦0.00");
        assert_eq!(format_currency(f64::INFINITY, "USD"), "$0.00");
        assert_eq!(format_percentage(f64::NAN), "0%");
    }

    #[test]
    fn test_huge_amount_does_not_panic() {
        let formatted = format_currency(1e30, "USD");
        assert!(formatted.starts_with("$1,000,000"));
        assert!(formatted.ends_with(".00"));
    }

    #[test]
    fn test_formatting_round_trips() {
        for amount in [0.0, 1.0, 12.34, -56.78, 1000.1, 987654.32, -0.5, 3.14159, 42424242.42] {
            for code in ["NGN", "USD", "EUR", "GBP"] {
                let formatted = format_currency(amount, code);
                let stripped: String = formatted
                    .replace(currency_symbol(code), "")
                    .replace(',', "");
                let parsed: f64 = stripped.parse().unwrap();
                let expected = (amount * 100.0_f64).round() / 100.0;
                assert!((parsed - expected).abs() < 1e-9, "{} -> {}", amount, formatted);
            }
        }
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0), "0%");
        assert_eq!(format_percentage(12.3456), "12.35%");
        assert_eq!(format_percentage(7.5), "7.50%");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(1234.5), "1234.50");
        assert_eq!(format_fixed(3.0), "3.00");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(CurrencyCode::resolve("gbp"), CurrencyCode::Gbp);
        assert_eq!(CurrencyCode::resolve("ZAR"), CurrencyCode::Ngn);
        assert_eq!(CurrencyCode::Ngn.locale(), "en-NG");
        assert_eq!(CurrencyCode::Usd.to_string(), "USD");
    }
}
