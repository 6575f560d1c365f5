//! Order repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    OrderEntity, OrderItemEntity, OrderItemWithProductEntity, OrderStatusDb, PurchaseEntity,
};
use crate::metrics::QueryTimer;

/// Column values for a new order.
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub customer_email: &'a str,
    pub customer_phone: Option<&'a str>,
    pub total_amount: Decimal,
    pub display_amount: Decimal,
    pub currency: &'a str,
    pub payment_provider: &'a str,
}

/// A line to insert with its price snapshot.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub price_at_purchase: Decimal,
}

/// Aggregate order counters for the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderStatsRow {
    pub total_orders: i64,
    pub paid_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: Decimal,
}

/// Repository for order-related database operations.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a pending order and its items in one transaction.
    pub async fn create_with_items(
        &self,
        order: &NewOrder<'_>,
        items: &[NewOrderItem],
    ) -> Result<(OrderEntity, Vec<OrderItemEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_order_with_items");
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, OrderEntity>(
            r#"
            INSERT INTO orders (
                customer_email, customer_phone, total_amount, display_amount,
                currency, status, payment_provider
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(order.customer_email)
        .bind(order.customer_phone)
        .bind(order.total_amount)
        .bind(order.display_amount)
        .bind(order.currency)
        .bind(OrderStatusDb::Pending)
        .bind(order.payment_provider)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItemEntity>(
                r#"
                INSERT INTO order_items (order_id, product_id, price_at_purchase)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(created.id)
            .bind(item.product_id)
            .bind(item.price_at_purchase)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok((created, inserted))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_order_by_id");
        let result = sqlx::query_as::<_, OrderEntity>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(result)
    }

    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_order_by_reference");
        let result = sqlx::query_as::<_, OrderEntity>(
            "SELECT * FROM orders WHERE payment_reference = $1",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Stores the gateway reference unless a different one is already set.
    ///
    /// Returns `None` when the order does not exist or carries another reference.
    pub async fn attach_reference(
        &self,
        id: Uuid,
        reference: &str,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("attach_order_reference");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET payment_reference = $2, updated_at = NOW()
            WHERE id = $1 AND (payment_reference IS NULL OR payment_reference = $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reference)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Moves a pending order to paid.
    ///
    /// Returns `None` if the order was not pending; callers treat that as
    /// "already processed" and skip every side effect.
    pub async fn mark_paid_if_pending(&self, id: Uuid) -> Result<Option<OrderEntity>, sqlx::Error> {
        self.transition_from_pending(id, OrderStatusDb::Paid, "mark_order_paid")
            .await
    }

    /// Moves a pending order to failed.
    pub async fn mark_failed_if_pending(
        &self,
        id: Uuid,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        self.transition_from_pending(id, OrderStatusDb::Failed, "mark_order_failed")
            .await
    }

    async fn transition_from_pending(
        &self,
        id: Uuid,
        status: OrderStatusDb,
        query_name: &'static str,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new(query_name);
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET status = $2,
                paid_at = CASE WHEN $2 = 'paid'::order_status THEN NOW() ELSE paid_at END,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Order items with product name, file and licence length.
    ///
    /// Items whose product row is missing still appear, with empty product columns.
    pub async fn list_items_with_products(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemWithProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_order_items_with_products");
        let result = sqlx::query_as::<_, OrderItemWithProductEntity>(
            r#"
            SELECT
                oi.product_id,
                oi.price_at_purchase,
                p.name AS product_name,
                p.file_url,
                p.duration_days
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// The purchase of `product_id` within `order_id`, if any.
    pub async fn find_purchase(
        &self,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<PurchaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_purchase");
        let result = sqlx::query_as::<_, PurchaseEntity>(
            r#"
            SELECT
                o.id AS order_id,
                p.id AS product_id,
                o.customer_email,
                o.status,
                p.name AS product_name,
                p.file_url,
                pd.end_date
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN product_durations pd
                ON pd.order_id = oi.order_id AND pd.product_id = oi.product_id
            WHERE oi.order_id = $1 AND oi.product_id = $2
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Most recent orders, optionally filtered by status.
    pub async fn list_recent(
        &self,
        status: Option<OrderStatusDb>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_recent_orders");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT * FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn count(&self, status: Option<OrderStatusDb>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_orders");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            "SELECT COUNT(*) FROM orders WHERE ($1::order_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map(|row| row.0)
    }

    pub async fn stats(&self) -> Result<OrderStatsRow, sqlx::Error> {
        let timer = QueryTimer::new("order_stats");
        let result = sqlx::query_as::<_, OrderStatsRow>(
            r#"
            SELECT
                COUNT(*) AS total_orders,
                COUNT(*) FILTER (WHERE status = 'paid') AS paid_orders,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_orders,
                COALESCE(SUM(total_amount) FILTER (WHERE status = 'paid'), 0) AS total_revenue
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }
}
