//! Currency normalization between display and settlement currencies.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::currency::Currency;

/// Default USD to GHS exchange rate (1 USD = 10.5 GHS).
pub const DEFAULT_USD_TO_GHS_RATE: Decimal = Decimal::from_parts(105, 0, 0, false, 1);

/// Rounds a monetary amount to two decimal places, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a display amount into the amount actually charged.
///
/// Amounts already in the settlement currency are only rounded, so applying the
/// conversion to its own output is a no-op.
pub fn to_settlement(amount: Decimal, currency: Currency, usd_to_ghs_rate: Decimal) -> Decimal {
    match currency {
        Currency::Ghs => round_money(amount),
        Currency::Usd => round_money(amount * usd_to_ghs_rate),
    }
}

/// Converts a settlement amount into a display currency.
pub fn to_display(amount_ghs: Decimal, currency: Currency, usd_to_ghs_rate: Decimal) -> Decimal {
    match currency {
        Currency::Ghs => round_money(amount_ghs),
        Currency::Usd if usd_to_ghs_rate.is_zero() => round_money(amount_ghs),
        Currency::Usd => round_money(amount_ghs / usd_to_ghs_rate),
    }
}

/// Converts a settlement amount into gateway minor units (pesewas).
///
/// Returns `None` when the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;
    (round_money(amount) * Decimal::ONE_HUNDRED).trunc().to_i64()
}

/// Converts gateway minor units back into a settlement amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(DEFAULT_USD_TO_GHS_RATE, dec("10.5"));
    }

    #[test]
    fn test_usd_to_settlement() {
        assert_eq!(to_settlement(dec("20"), Currency::Usd, DEFAULT_USD_TO_GHS_RATE), dec("210.00"));
        assert_eq!(to_settlement(dec("9.99"), Currency::Usd, DEFAULT_USD_TO_GHS_RATE), dec("104.90"));
    }

    #[test]
    fn test_usd_rounding_midpoint() {
        // 0.001 * 10.5 = 0.0105 -> 0.01
        assert_eq!(to_settlement(dec("0.001"), Currency::Usd, DEFAULT_USD_TO_GHS_RATE), dec("0.01"));
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
    }

    #[test]
    fn test_ghs_is_identity() {
        assert_eq!(to_settlement(dec("150.00"), Currency::Ghs, DEFAULT_USD_TO_GHS_RATE), dec("150.00"));
        assert_eq!(to_settlement(dec("150.456"), Currency::Ghs, DEFAULT_USD_TO_GHS_RATE), dec("150.46"));
    }

    #[test]
    fn test_settlement_is_idempotent() {
        for raw in ["12.345", "0.5", "999.999", "42"] {
            let once = to_settlement(dec(raw), Currency::Usd, DEFAULT_USD_TO_GHS_RATE);
            let twice = to_settlement(once, Currency::SETTLEMENT, DEFAULT_USD_TO_GHS_RATE);
            assert_eq!(once, twice, "input {}", raw);
        }
    }

    #[test]
    fn test_to_display() {
        assert_eq!(to_display(dec("210"), Currency::Usd, DEFAULT_USD_TO_GHS_RATE), dec("20.00"));
        assert_eq!(to_display(dec("100"), Currency::Usd, DEFAULT_USD_TO_GHS_RATE), dec("9.52"));
        assert_eq!(to_display(dec("100"), Currency::Ghs, DEFAULT_USD_TO_GHS_RATE), dec("100"));
        assert_eq!(to_display(dec("100"), Currency::Usd, Decimal::ZERO), dec("100"));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(dec("104.90")), Some(10490));
        assert_eq!(to_minor_units(dec("0.015")), Some(2));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
        assert_eq!(from_minor_units(10490), dec("104.90"));
    }
}
