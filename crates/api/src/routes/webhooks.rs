//! Paystack webhook receiver.
//!
//! The body is authenticated with `x-paystack-signature`, the hex HMAC-SHA512
//! of the raw bytes keyed with the gateway secret. `charge.success` feeds the
//! same confirmation workflow as the redirect path.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use shared::crypto::verify_hmac_sha512_hex;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_webhook_event;
use crate::services::ConfirmationError;

pub const SIGNATURE_HEADER: &str = "x-paystack-signature";
const CHARGE_SUCCESS: &str = "charge.success";

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

impl WebhookEvent {
    fn reference(&self) -> Option<&str> {
        self.data
            .get("reference")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Order id placed in the charge metadata at initialization.
    fn order_id(&self) -> Option<Uuid> {
        self.data
            .get("metadata")
            .and_then(|m| m.get("orderId"))
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Serialize)]
pub struct WebhookStatus {
    pub status: &'static str,
}

/// Liveness check used when registering the webhook URL.
///
/// GET /api/v1/webhooks/paystack
pub async fn paystack_status() -> Json<WebhookStatus> {
    Json(WebhookStatus { status: "active" })
}

/// Receive a gateway event.
///
/// POST /api/v1/webhooks/paystack
pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let secret = state.config.payment.secret_key.trim();
    if secret.is_empty() {
        return Err(ApiError::Internal(
            "Webhook received but no payment secret key is configured".to_string(),
        ));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            record_webhook_event("unknown", "missing_signature");
            ApiError::Unauthorized("Missing signature".to_string())
        })?;

    if !matches!(verify_hmac_sha512_hex(secret, &body, signature), Ok(true)) {
        record_webhook_event("unknown", "invalid_signature");
        warn!("Webhook signature mismatch");
        return Err(ApiError::Unauthorized("Invalid signature".to_string()));
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid webhook payload: {}", e)))?;

    if event.event != CHARGE_SUCCESS {
        info!(event = %event.event, "Webhook event ignored");
        record_webhook_event(&event.event, "ignored");
        return Ok(Json(WebhookAck { received: true }));
    }

    let Some(reference) = event.reference() else {
        warn!("charge.success without a reference");
        record_webhook_event(&event.event, "ignored");
        return Ok(Json(WebhookAck { received: true }));
    };

    match state
        .confirmation
        .confirm_for_order(reference, event.order_id())
        .await
    {
        Ok(outcome) => {
            info!(
                order_id = %outcome.order_id,
                newly_paid = outcome.newly_paid,
                "Webhook charge processed"
            );
            record_webhook_event(&event.event, "processed");
        }
        // Let the gateway retry when storage is unavailable.
        Err(ConfirmationError::Database(e)) => {
            record_webhook_event(&event.event, "error");
            return Err(e.into());
        }
        Err(e) => {
            warn!(reference = %reference, error = %e, "Webhook charge not confirmed");
            record_webhook_event(&event.event, "rejected");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
