//! Display currency lookup.

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use domain::models::Currency;

#[derive(Debug, Deserialize)]
pub struct CurrencyQuery {
    /// IANA timezone reported by the browser
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    pub currency: Currency,
    pub settlement_currency: Currency,
    /// 1 USD in the settlement currency
    pub usd_to_ghs_rate: Decimal,
}

/// Default display currency for a visitor's timezone.
///
/// GET /api/v1/currency?timezone=Africa/Accra
pub async fn get_currency(
    State(state): State<AppState>,
    Query(query): Query<CurrencyQuery>,
) -> Json<CurrencyResponse> {
    Json(currency_for(
        query.timezone.as_deref(),
        state.config.payment.usd_to_ghs_rate,
    ))
}

fn currency_for(timezone: Option<&str>, rate: Decimal) -> CurrencyResponse {
    CurrencyResponse {
        currency: Currency::for_timezone(timezone.unwrap_or_default()),
        settlement_currency: Currency::SETTLEMENT,
        usd_to_ghs_rate: rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_for_timezone() {
        let rate = Decimal::new(105, 1);
        assert_eq!(currency_for(Some("Africa/Accra"), rate).currency, Currency::Ghs);
        assert_eq!(currency_for(Some("Europe/London"), rate).currency, Currency::Usd);
        assert_eq!(currency_for(None, rate).currency, Currency::Usd);
    }

    #[test]
    fn test_response_serialization() {
        let json = serde_json::to_value(currency_for(Some("Africa/Accra"), Decimal::new(105, 1))).unwrap();
        assert_eq!(json["currency"], "GHS");
        assert_eq!(json["settlement_currency"], "GHS");
        assert_eq!(json["usd_to_ghs_rate"], 10.5);
    }
}
