//! Entitlement window repository (product_durations).

use sqlx::PgPool;
use uuid::Uuid;

use domain::services::EntitlementWindow;

use crate::entities::EntitlementEntity;
use crate::metrics::QueryTimer;

/// Repository for entitlement windows.
#[derive(Clone)]
pub struct EntitlementRepository {
    pool: PgPool,
}

impl EntitlementRepository {
    /// Creates a new EntitlementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a window. An existing window for the pair is kept.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_window(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        window: &EntitlementWindow,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("insert_entitlement_window");
        let result = sqlx::query(
            r#"
            INSERT INTO product_durations (order_id, product_id, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (order_id, product_id) DO NOTHING
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(window.start_date)
        .bind(window.end_date)
        .execute(&self.pool)
        .await;
        timer.finish(result).map(|r| r.rows_affected() > 0)
    }

    pub async fn find(
        &self,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<EntitlementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_entitlement_window");
        let result = sqlx::query_as::<_, EntitlementEntity>(
            "SELECT * FROM product_durations WHERE order_id = $1 AND product_id = $2",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<EntitlementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_entitlement_windows");
        let result = sqlx::query_as::<_, EntitlementEntity>(
            "SELECT * FROM product_durations WHERE order_id = $1 ORDER BY created_at ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }
}
