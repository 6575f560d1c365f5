//! Display and settlement currencies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Timezone that selects the local currency for first-time visitors.
pub const LOCAL_TIMEZONE: &str = "Africa/Accra";

/// Currencies the storefront can display prices in.
///
/// `Ghs` is the settlement currency: the only one the gateway charges in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ghs,
    Usd,
}

impl Currency {
    /// The currency the payment gateway settles in.
    pub const SETTLEMENT: Currency = Currency::Ghs;

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Ghs => "GHS",
            Currency::Usd => "USD",
        }
    }

    pub fn is_settlement(&self) -> bool {
        *self == Self::SETTLEMENT
    }

    /// Picks the display currency for a browser timezone.
    pub fn for_timezone(timezone: &str) -> Self {
        if timezone.trim() == LOCAL_TIMEZONE {
            Currency::Ghs
        } else {
            Currency::Usd
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GHS" => Ok(Currency::Ghs),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("Unsupported currency: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_serialization() {
        assert_eq!(serde_json::to_string(&Currency::Ghs).unwrap(), "\"GHS\"");
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("ghs".parse::<Currency>().unwrap(), Currency::Ghs);
        assert_eq!(" USD ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_for_timezone() {
        assert_eq!(Currency::for_timezone("Africa/Accra"), Currency::Ghs);
        assert_eq!(Currency::for_timezone("Europe/London"), Currency::Usd);
        assert_eq!(Currency::for_timezone("Africa/Lagos"), Currency::Usd);
        assert_eq!(Currency::for_timezone(""), Currency::Usd);
    }

    #[test]
    fn test_settlement() {
        assert!(Currency::Ghs.is_settlement());
        assert!(!Currency::Usd.is_settlement());
        assert_eq!(Currency::default(), Currency::SETTLEMENT);
    }
}
