//! Paystack payment gateway client.
//!
//! Implements [`PaymentGateway`] over the Paystack REST API. Amounts are sent
//! in minor units of the settlement currency.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use domain::services::payment::{
    ChargeAuthorization, ChargeRequest, ChargeVerification, GatewayError, MockPaymentGateway,
    PaymentGateway,
};

use crate::config::PaymentConfig;

/// Paystack gateway client.
pub struct PaystackGateway {
    client: Client,
    base_url: String,
    secret_key: String,
}

/// Envelope every Paystack response uses.
#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct InitializeBody<'a> {
    email: &'a str,
    amount: i64,
    currency: &'a str,
    callback_url: &'a str,
    metadata: InitializeMetadata,
}

#[derive(Debug, Serialize)]
struct InitializeMetadata {
    #[serde(rename = "orderId")]
    order_id: String,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: Option<String>,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: String,
    amount: Option<i64>,
    currency: Option<String>,
    gateway_response: Option<String>,
    customer: Option<VerifyCustomer>,
}

#[derive(Debug, Deserialize)]
struct VerifyCustomer {
    email: Option<String>,
}

impl From<VerifyData> for ChargeVerification {
    fn from(data: VerifyData) -> Self {
        Self {
            reference: data.reference,
            status: data.status,
            amount_minor: data.amount,
            currency: data.currency,
            gateway_response: data.gateway_response,
            customer_email: data.customer.and_then(|c| c.email),
        }
    }
}

impl PaystackGateway {
    /// Creates a client with the configured timeout.
    pub fn new(config: &PaymentConfig) -> Result<Self, GatewayError> {
        if config.is_mock() {
            return Err(GatewayError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_envelope<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        let envelope: PaystackEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                GatewayError::InvalidResponse(e.to_string())
            } else {
                GatewayError::Rejected(format!("HTTP {}", status))
            }
        })?;

        if !status.is_success() || !envelope.status {
            return Err(GatewayError::Rejected(envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| GatewayError::InvalidResponse("missing data".to_string()))
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Request(err.to_string())
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PaystackGateway {
    fn provider(&self) -> &'static str {
        "paystack"
    }

    async fn initialize(&self, request: &ChargeRequest) -> Result<ChargeAuthorization, GatewayError> {
        let body = InitializeBody {
            email: &request.email,
            amount: request.amount_minor,
            currency: request.currency.as_str(),
            callback_url: &request.callback_url,
            metadata: InitializeMetadata {
                order_id: request.order_id.to_string(),
            },
        };

        let response = self
            .client
            .post(self.url("/transaction/initialize"))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: InitializeData = Self::read_envelope(response).await?;
        debug!(order_id = %request.order_id, reference = %data.reference, "Paystack transaction initialized");

        Ok(ChargeAuthorization {
            reference: data.reference,
            authorization_url: data.authorization_url,
            access_code: data.access_code,
        })
    }

    async fn verify(&self, reference: &str) -> Result<ChargeVerification, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/transaction/verify/{}",
                urlencoding::encode(reference)
            )))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: VerifyData = Self::read_envelope(response).await?;
        Ok(data.into())
    }
}

/// Builds the configured gateway, falling back to the mock without a secret key.
pub fn build_gateway(config: &PaymentConfig) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
    if config.is_mock() {
        warn!("No payment secret key configured, using mock payment gateway");
        return Ok(Arc::new(MockPaymentGateway::new()));
    }
    Ok(Arc::new(PaystackGateway::new(config)?))
}
