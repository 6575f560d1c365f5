//! Checkout: order creation, payment initialization and verification.

use axum::{
    extract::{Query, State},
    Json,
};
use persistence::repositories::{NewOrder, NewOrderItem, OrderRepository, ProductRepository};
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_payment_initialized;
use domain::models::order::{
    InitializePaymentRequest, InitializePaymentResponse, VerifyPaymentQuery, VerifyPaymentResponse,
};
use domain::models::{Currency, OrderStatus, Product};
use domain::services::currency::to_minor_units;
use domain::services::payment::ChargeRequest;
use domain::services::OrderPricing;

/// Create a pending order and start a gateway checkout.
///
/// POST /api/v1/pay
pub async fn initialize_payment(
    State(state): State<AppState>,
    Json(request): Json<InitializePaymentRequest>,
) -> Result<Json<InitializePaymentResponse>, ApiError> {
    request.validate()?;
    request.validate_amount().map_err(ApiError::Validation)?;

    if !request.provider.eq_ignore_ascii_case(state.gateway.provider()) {
        return Err(ApiError::Validation(format!(
            "Unsupported payment provider: {}",
            request.provider
        )));
    }

    let product_ids = request.product_ids();
    let product_repo = ProductRepository::new(state.pool.clone());
    let found: Vec<Product> = product_repo
        .find_active_by_ids(&product_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let products = in_cart_order(&product_ids, found)?;

    let rate = state.config.payment.usd_to_ghs_rate;
    let pricing = OrderPricing::compute(&products, request.currency, rate);

    if pricing.settlement_total <= rust_decimal::Decimal::ZERO {
        return Err(ApiError::Validation(
            "Order total must be greater than zero".to_string(),
        ));
    }
    if !pricing.matches_client_amount(request.amount) {
        return Err(ApiError::Validation(format!(
            "Amount does not match cart total of {} {}",
            pricing.display_total, pricing.currency
        )));
    }

    let amount_minor = to_minor_units(pricing.settlement_total)
        .ok_or_else(|| ApiError::Validation("Order total is out of range".to_string()))?;

    let email = request.email.trim().to_lowercase();
    let phone = request
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let items: Vec<NewOrderItem> = pricing
        .lines
        .iter()
        .map(|line| NewOrderItem {
            product_id: line.product_id,
            price_at_purchase: line.settlement_price,
        })
        .collect();

    let order_repo = OrderRepository::new(state.pool.clone());
    let (order, _) = order_repo
        .create_with_items(
            &NewOrder {
                customer_email: &email,
                customer_phone: phone,
                total_amount: pricing.settlement_total,
                display_amount: pricing.display_total,
                currency: pricing.currency.as_str(),
                payment_provider: state.gateway.provider(),
            },
            &items,
        )
        .await?;

    let charge = ChargeRequest {
        order_id: order.id,
        email: email.clone(),
        amount_minor,
        currency: Currency::SETTLEMENT,
        callback_url: state.config.payment_callback_url(order.id),
    };

    let authorization = match state.gateway.initialize(&charge).await {
        Ok(a) => a,
        Err(e) => {
            error!(order_id = %order.id, error = %e, "Payment initialization failed");
            record_payment_initialized("gateway_error");
            if let Err(mark_err) = order_repo.mark_failed_if_pending(order.id).await {
                warn!(order_id = %order.id, error = %mark_err, "Failed to mark order failed");
            }
            return Err(ApiError::BadGateway(
                "Payment initialization failed".to_string(),
            ));
        }
    };

    if order_repo
        .attach_reference(order.id, &authorization.reference)
        .await?
        .is_none()
    {
        return Err(ApiError::Internal(format!(
            "Could not store reference for order {}",
            order.id
        )));
    }

    record_payment_initialized("ok");
    info!(
        order_id = %order.id,
        reference = %authorization.reference,
        items = items.len(),
        currency = %pricing.currency,
        "Payment initialized"
    );

    Ok(Json(InitializePaymentResponse {
        success: true,
        order_id: order.id,
        reference_id: authorization.reference,
        authorization_url: authorization.authorization_url,
    }))
}

/// Confirm a payment after the gateway redirect.
///
/// GET /api/v1/pay/verify?reference=<ref>
pub async fn verify_payment(
    State(state): State<AppState>,
    Query(query): Query<VerifyPaymentQuery>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let reference = query
        .reference()
        .ok_or_else(|| ApiError::Validation("Payment reference is required".to_string()))?;

    let outcome = state.confirmation.confirm(reference).await?;
    let success = outcome.status == OrderStatus::Paid;

    let message = match (outcome.newly_paid, success) {
        (true, _) => "Payment verified".to_string(),
        (false, true) => "Payment already verified".to_string(),
        (false, false) => format!("Order is {}", outcome.status),
    };

    Ok(Json(VerifyPaymentResponse {
        success,
        order_id: outcome.order_id,
        status: outcome.status,
        already_processed: outcome.already_processed(),
        message,
    }))
}

/// Orders products by their position in the cart, failing if any is missing.
fn in_cart_order(ids: &[Uuid], products: Vec<Product>) -> Result<Vec<Product>, ApiError> {
    let mut by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut ordered = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match by_id.remove(id) {
            Some(product) => ordered.push(product),
            None => missing.push(id.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(ordered)
    } else {
        Err(ApiError::Validation(format!(
            "Products not available: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Plan".to_string(),
            description: None,
            price: Decimal::new(5000, 2),
            usd_price: None,
            duration_label: None,
            duration_days: None,
            image_url: None,
            preview_url: None,
            file_url: "https://files.example.com/plan.pdf".to_string(),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_in_cart_order_follows_ids() {
        let a = product();
        let b = product();
        let ids = vec![b.id, a.id];

        let ordered = in_cart_order(&ids, vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(ordered[0].id, b.id);
        assert_eq!(ordered[1].id, a.id);
    }

    #[test]
    fn test_in_cart_order_reports_missing() {
        let a = product();
        let missing = Uuid::new_v4();

        let err = in_cart_order(&[a.id, missing], vec![a]).unwrap_err();
        match err {
            ApiError::Validation(msg) => assert!(msg.contains(&missing.to_string())),
            other => panic!("unexpected {other:?}"),
        }
    }
}
