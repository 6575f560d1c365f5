//! Admin order views and dashboard counters.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use persistence::entities::OrderStatusDb;
use persistence::repositories::{OrderRepository, ProductRepository, TestimonialRepository};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::order::{ListOrdersQuery, ListOrdersResponse, OrderResponse, OrderStats};
use domain::models::{Order, OrderLineItem};

/// An order with its purchased items.
#[derive(Debug, Serialize)]
pub struct AdminOrderDetail {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderLineItem>,
}

/// Most recent orders, newest first.
///
/// GET /api/v1/admin/orders?status=paid&limit=50
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    query.validate()?;

    let status = query.status.map(OrderStatusDb::from);
    let repo = OrderRepository::new(state.pool.clone());

    let orders = repo
        .list_recent(status, query.limit())
        .await?
        .into_iter()
        .map(|e| OrderResponse::from(Order::from(e)))
        .collect();
    let total = repo.count(status).await?;

    Ok(Json(ListOrdersResponse { orders, total }))
}

/// GET /api/v1/admin/orders/:order_id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<AdminOrderDetail>, ApiError> {
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

    Ok(Json(AdminOrderDetail {
        order: order.into(),
        items,
    }))
}

/// Dashboard counters.
///
/// GET /api/v1/admin/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<OrderStats>, ApiError> {
    let orders = OrderRepository::new(state.pool.clone()).stats().await?;
    let active_products = ProductRepository::new(state.pool.clone())
        .count_active()
        .await?;
    let pending_testimonials = TestimonialRepository::new(state.pool.clone())
        .count_pending()
        .await?;

    Ok(Json(OrderStats {
        total_orders: orders.total_orders,
        paid_orders: orders.paid_orders,
        pending_orders: orders.pending_orders,
        total_revenue: orders.total_revenue,
        active_products,
        pending_testimonials,
    }))
}
