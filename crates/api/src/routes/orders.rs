//! Order lookup for the checkout success page.

use axum::{
    extract::{Path, State},
    Json,
};
use persistence::repositories::OrderRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::order::OrderItemsResponse;
use domain::models::Order;

/// Line items of an order with product names.
///
/// GET /api/v1/orders/:order_id
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderItemsResponse>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order: Order = repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?
        .into();

    let items = repo
        .list_items_with_products(order.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(OrderItemsResponse {
        order_id: order.id,
        status: order.status,
        currency: order.currency,
        display_amount: order.display_amount,
        items,
    }))
}
