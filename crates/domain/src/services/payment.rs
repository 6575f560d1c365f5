//! Payment gateway abstraction.
//!
//! The confirmation workflow only sees [`PaymentGateway`]; the HTTP client for
//! the real gateway lives in the API crate and [`MockPaymentGateway`] stands in
//! when no gateway secret is configured.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::currency::Currency;

/// Prefix every mock reference carries.
pub const MOCK_REFERENCE_PREFIX: &str = "mock-";

/// Gateway status string for a settled charge.
pub const STATUS_SUCCESS: &str = "success";

/// Errors from talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment gateway not configured")]
    NotConfigured,

    #[error("Payment gateway request failed: {0}")]
    Request(String),

    #[error("Payment gateway timed out")]
    Timeout,

    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),

    #[error("Invalid payment gateway response: {0}")]
    InvalidResponse(String),
}

/// A charge to open on the gateway's hosted checkout.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub order_id: Uuid,
    pub email: String,
    /// Amount in minor units of the settlement currency.
    pub amount_minor: i64,
    pub currency: Currency,
    pub callback_url: String,
}

/// Handle returned after a charge has been initialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChargeAuthorization {
    pub reference: String,
    pub authorization_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

/// Result of verifying a charge by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeVerification {
    pub reference: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_minor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl ChargeVerification {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_SUCCESS)
    }
}

/// A payment gateway able to open and verify charges.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Provider name stored on orders.
    fn provider(&self) -> &'static str;

    /// Whether this gateway fakes payments (no credentials configured).
    fn is_mock(&self) -> bool {
        false
    }

    /// Opens a charge and returns the reference and checkout URL.
    async fn initialize(&self, request: &ChargeRequest) -> Result<ChargeAuthorization, GatewayError>;

    /// Looks up the state of a charge.
    async fn verify(&self, reference: &str) -> Result<ChargeVerification, GatewayError>;
}

/// Gateway used for local development and tests.
///
/// Initialization returns a `mock-paystack-ref-<millis>` reference whose
/// checkout URL is the callback itself. Verification succeeds for any
/// reference starting with `mock-` and fails for everything else.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway;

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self
    }

    pub fn is_mock_reference(reference: &str) -> bool {
        reference.starts_with(MOCK_REFERENCE_PREFIX)
    }
}

/// Appends `reference=<value>` to a callback URL.
pub fn append_reference(callback_url: &str, reference: &str) -> String {
    let separator = if callback_url.contains('?') { '&' } else { '?' };
    format!("{}{}reference={}", callback_url, separator, reference)
}

#[async_trait::async_trait]
impl PaymentGateway for MockPaymentGateway {
    fn provider(&self) -> &'static str {
        "paystack"
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn initialize(&self, request: &ChargeRequest) -> Result<ChargeAuthorization, GatewayError> {
        let reference = format!(
            "{}paystack-ref-{}",
            MOCK_REFERENCE_PREFIX,
            Utc::now().timestamp_millis()
        );

        tracing::info!(
            order_id = %request.order_id,
            amount_minor = request.amount_minor,
            reference = %reference,
            "Mock payment initialized"
        );

        Ok(ChargeAuthorization {
            authorization_url: append_reference(&request.callback_url, &reference),
            reference,
            access_code: None,
        })
    }

    async fn verify(&self, reference: &str) -> Result<ChargeVerification, GatewayError> {
        let (status, gateway_response) = if Self::is_mock_reference(reference) {
            (STATUS_SUCCESS, "Mock payment approved")
        } else {
            ("failed", "Invalid mock reference")
        };

        Ok(ChargeVerification {
            reference: reference.to_string(),
            status: status.to_string(),
            amount_minor: None,
            currency: None,
            gateway_response: Some(gateway_response.to_string()),
            customer_email: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge_request() -> ChargeRequest {
        ChargeRequest {
            order_id: Uuid::new_v4(),
            email: "buyer@example.com".to_string(),
            amount_minor: 10490,
            currency: Currency::Ghs,
            callback_url: "http://localhost:3000/checkout/success?orderId=abc".to_string(),
        }
    }

    #[test]
    fn test_append_reference() {
        assert_eq!(
            append_reference("http://x/cb?orderId=1", "ref"),
            "http://x/cb?orderId=1&reference=ref"
        );
        assert_eq!(append_reference("http://x/cb", "ref"), "http://x/cb?reference=ref");
    }

    #[test]
    fn test_verification_is_success() {
        let mut v = ChargeVerification {
            reference: "r".to_string(),
            status: "success".to_string(),
            amount_minor: None,
            currency: None,
            gateway_response: None,
            customer_email: None,
        };
        assert!(v.is_success());
        v.status = "SUCCESS".to_string();
        assert!(v.is_success());
        v.status = "abandoned".to_string();
        assert!(!v.is_success());
    }

    #[tokio::test]
    async fn test_mock_initialize() {
        let gateway = MockPaymentGateway::new();
        let auth = gateway.initialize(&charge_request()).await.unwrap();
        assert!(auth.reference.starts_with("mock-paystack-ref-"));
        assert!(auth
            .authorization_url
            .ends_with(&format!("&reference={}", auth.reference)));
        assert!(gateway.is_mock());
        assert_eq!(gateway.provider(), "paystack");
    }

    #[tokio::test]
    async fn test_mock_verify_accepts_mock_references() {
        let gateway = MockPaymentGateway::new();
        let result = gateway.verify("mock-xyz").await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.reference, "mock-xyz");
    }

    #[tokio::test]
    async fn test_mock_verify_rejects_other_references() {
        let gateway = MockPaymentGateway::new();
        let result = gateway.verify("T1234567890").await.unwrap();
        assert!(!result.is_success());
        assert_eq!(result.gateway_response.as_deref(), Some("Invalid mock reference"));
    }
}
