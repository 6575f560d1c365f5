//! Server-side cart pricing.
//!
//! Prices always come from the catalogue. The client-sent amount is only
//! compared against the computed display total.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::currency::Currency;
use crate::models::product::Product;
use crate::services::currency::{round_money, to_settlement};

/// Largest accepted difference between client and server totals.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub display_price: Decimal,
    /// Snapshot stored on the order item.
    pub settlement_price: Decimal,
}

/// Totals for a cart in a display currency.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPricing {
    pub currency: Currency,
    pub lines: Vec<PricedLine>,
    pub display_total: Decimal,
    /// Amount charged by the gateway.
    pub settlement_total: Decimal,
}

impl OrderPricing {
    pub fn compute(products: &[Product], currency: Currency, usd_to_ghs_rate: Decimal) -> Self {
        let lines: Vec<PricedLine> = products
            .iter()
            .map(|p| {
                let display_price = p.display_price(currency, usd_to_ghs_rate);
                PricedLine {
                    product_id: p.id,
                    display_price,
                    settlement_price: to_settlement(display_price, currency, usd_to_ghs_rate),
                }
            })
            .collect();

        let display_total = round_money(lines.iter().map(|l| l.display_price).sum());

        Self {
            currency,
            settlement_total: to_settlement(display_total, currency, usd_to_ghs_rate),
            display_total,
            lines,
        }
    }

    /// Whether a client-sent amount agrees with the computed display total.
    pub fn matches_client_amount(&self, amount: Decimal) -> bool {
        (round_money(amount) - self.display_total).abs() <= AMOUNT_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::tests::sample_product;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compute_ghs() {
        let products = vec![sample_product("50.00"), sample_product("54.90")];
        let pricing = OrderPricing::compute(&products, Currency::Ghs, dec("10.5"));
        assert_eq!(pricing.display_total, dec("104.90"));
        assert_eq!(pricing.settlement_total, dec("104.90"));
        assert_eq!(pricing.lines.len(), 2);
        assert_eq!(pricing.lines[1].settlement_price, dec("54.90"));
    }

    #[test]
    fn test_compute_usd_with_fixed_price() {
        let mut a = sample_product("105.00");
        a.usd_price = Some(dec("9.99"));
        let b = sample_product("21.00");
        let pricing = OrderPricing::compute(&[a, b], Currency::Usd, dec("10.5"));
        assert_eq!(pricing.display_total, dec("11.99"));
        assert_eq!(pricing.settlement_total, dec("125.90"));
    }

    #[test]
    fn test_client_amount_tolerance() {
        let pricing = OrderPricing::compute(&[sample_product("10.00")], Currency::Ghs, dec("10.5"));
        assert!(pricing.matches_client_amount(dec("10.00")));
        assert!(pricing.matches_client_amount(dec("10.01")));
        assert!(!pricing.matches_client_amount(dec("9.98")));
        assert!(!pricing.matches_client_amount(dec("1.00")));
    }
}
