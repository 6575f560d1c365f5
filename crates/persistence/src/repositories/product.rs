//! Product repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::product::UpdateProductRequest;
use domain::services::MoveDirection;

use crate::entities::{ProductEntity, ProductInput};
use crate::metrics::QueryTimer;
use crate::repositories::ordering::{move_row, MoveOutcome, SortableTable};

/// Repository for product-related database operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active products in display order.
    pub async fn list_active(&self) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_products");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT * FROM products
            WHERE is_active = true
            ORDER BY sort_order ASC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Every product, including soft-deleted ones.
    pub async fn list_all(&self) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_products");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT * FROM products
            ORDER BY sort_order ASC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_product_by_id");
        let result = sqlx::query_as::<_, ProductEntity>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(result)
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_product_by_id");
        let result = sqlx::query_as::<_, ProductEntity>(
            "SELECT * FROM products WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Active products among `ids`. Missing or inactive ids are simply absent.
    pub async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_products_by_ids");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT * FROM products
            WHERE id = ANY($1) AND is_active = true
            ORDER BY sort_order ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Inserts a product. Without an explicit sort order it goes last.
    pub async fn create(&self, input: &ProductInput) -> Result<ProductEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            INSERT INTO products (
                name, description, price, usd_price, duration_label, duration_days,
                image_url, preview_url, file_url, is_active, sort_order
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                COALESCE($11, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM products))
            )
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.usd_price)
        .bind(&input.duration_label)
        .bind(input.duration_days)
        .bind(&input.image_url)
        .bind(&input.preview_url)
        .bind(&input.file_url)
        .bind(input.is_active)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Partial update. `duration_days` is the value resolved from the label.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateProductRequest,
        duration_days: Option<i32>,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                usd_price = COALESCE($5, usd_price),
                duration_label = COALESCE($6, duration_label),
                duration_days = COALESCE($7, duration_days),
                image_url = COALESCE($8, image_url),
                preview_url = COALESCE($9, preview_url),
                file_url = COALESCE($10, file_url),
                is_active = COALESCE($11, is_active),
                sort_order = COALESCE($12, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.usd_price)
        .bind(&changes.duration_label)
        .bind(duration_days)
        .bind(&changes.image_url)
        .bind(&changes.preview_url)
        .bind(&changes.file_url)
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Hides a product. Rows stay for order history.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_product");
        let result = sqlx::query(
            "UPDATE products SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.finish(result).map(|r| r.rows_affected() > 0)
    }

    pub async fn move_product(
        &self,
        id: Uuid,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, sqlx::Error> {
        move_row(&self.pool, SortableTable::Products, id, direction).await
    }

    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_products");
        let result: Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE is_active = true")
                .fetch_one(&self.pool)
                .await;
        timer.finish(result).map(|row| row.0)
    }
}

#[cfg(test)]
mod tests {
    // Note: ProductRepository tests require database connection and are covered by integration tests
}
