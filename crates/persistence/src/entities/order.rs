//! Order entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Currency, Order, OrderItem, OrderLineItem, OrderStatus, Purchase};

/// Database enum for order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatusDb {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl From<OrderStatusDb> for OrderStatus {
    fn from(status: OrderStatusDb) -> Self {
        match status {
            OrderStatusDb::Pending => OrderStatus::Pending,
            OrderStatusDb::Paid => OrderStatus::Paid,
            OrderStatusDb::Failed => OrderStatus::Failed,
            OrderStatusDb::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl From<OrderStatus> for OrderStatusDb {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => OrderStatusDb::Pending,
            OrderStatus::Paid => OrderStatusDb::Paid,
            OrderStatus::Failed => OrderStatusDb::Failed,
            OrderStatus::Cancelled => OrderStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub total_amount: Decimal,
    pub display_amount: Decimal,
    pub currency: String,
    pub status: OrderStatusDb,
    pub payment_provider: String,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderEntity> for Order {
    fn from(entity: OrderEntity) -> Self {
        let currency = entity.currency.parse::<Currency>().unwrap_or_else(|e| {
            tracing::warn!(order_id = %entity.id, error = %e, "Unknown stored currency");
            Currency::SETTLEMENT
        });

        Self {
            id: entity.id,
            customer_email: entity.customer_email,
            customer_phone: entity.customer_phone,
            total_amount: entity.total_amount,
            display_amount: entity.display_amount,
            currency,
            status: entity.status.into(),
            payment_provider: entity.payment_provider,
            payment_reference: entity.payment_reference,
            paid_at: entity.paid_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the order_items table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub price_at_purchase: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<OrderItemEntity> for OrderItem {
    fn from(entity: OrderItemEntity) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            product_id: entity.product_id,
            price_at_purchase: entity.price_at_purchase,
            created_at: entity.created_at,
        }
    }
}

/// Order item joined with product columns.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemWithProductEntity {
    pub product_id: Uuid,
    pub price_at_purchase: Decimal,
    pub product_name: Option<String>,
    pub file_url: Option<String>,
    pub duration_days: Option<i32>,
}

/// Name shown when the product row is gone.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

impl From<OrderItemWithProductEntity> for OrderLineItem {
    fn from(entity: OrderItemWithProductEntity) -> Self {
        Self {
            product_id: entity.product_id,
            product_name: entity
                .product_name
                .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            file_url: entity.file_url.unwrap_or_default(),
            price: entity.price_at_purchase,
            duration_days: entity.duration_days,
        }
    }
}

/// Order item joined with its order, product and entitlement window.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseEntity {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub customer_email: String,
    pub status: OrderStatusDb,
    pub product_name: String,
    pub file_url: String,
    pub end_date: Option<NaiveDate>,
}

impl From<PurchaseEntity> for Purchase {
    fn from(entity: PurchaseEntity) -> Self {
        Self {
            order_id: entity.order_id,
            product_id: entity.product_id,
            customer_email: entity.customer_email,
            order_status: entity.status.into(),
            product_name: entity.product_name,
            file_url: entity.file_url,
            entitlement_end: entity.end_date,
        }
    }
}
