//! Testimonial repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::services::MoveDirection;

use crate::entities::TestimonialEntity;
use crate::metrics::QueryTimer;
use crate::repositories::ordering::{move_row, MoveOutcome, SortableTable};

/// Repository for testimonial-related database operations.
#[derive(Clone)]
pub struct TestimonialRepository {
    pool: PgPool,
}

impl TestimonialRepository {
    /// Creates a new TestimonialRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Approved testimonials in display order.
    pub async fn list_approved(&self) -> Result<Vec<TestimonialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_approved_testimonials");
        let result = sqlx::query_as::<_, TestimonialEntity>(
            r#"
            SELECT * FROM testimonials
            WHERE is_approved = true
            ORDER BY sort_order ASC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn list_all(&self) -> Result<Vec<TestimonialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_testimonials");
        let result = sqlx::query_as::<_, TestimonialEntity>(
            "SELECT * FROM testimonials ORDER BY sort_order ASC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Inserts a testimonial after the current last one.
    pub async fn create(
        &self,
        username: &str,
        text: &str,
        rating: i16,
        is_approved: bool,
    ) -> Result<TestimonialEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_testimonial");
        let result = sqlx::query_as::<_, TestimonialEntity>(
            r#"
            INSERT INTO testimonials (username, text, rating, is_approved, sort_order)
            VALUES ($1, $2, $3, $4, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM testimonials))
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(text)
        .bind(rating)
        .bind(is_approved)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        username: Option<&str>,
        text: Option<&str>,
        rating: Option<i16>,
    ) -> Result<Option<TestimonialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_testimonial");
        let result = sqlx::query_as::<_, TestimonialEntity>(
            r#"
            UPDATE testimonials SET
                username = COALESCE($2, username),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(text)
        .bind(rating)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn set_approved(
        &self,
        id: Uuid,
        is_approved: bool,
    ) -> Result<Option<TestimonialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_testimonial_approval");
        let result = sqlx::query_as::<_, TestimonialEntity>(
            "UPDATE testimonials SET is_approved = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_approved)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_testimonial");
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(result).map(|r| r.rows_affected() > 0)
    }

    pub async fn move_testimonial(
        &self,
        id: Uuid,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, sqlx::Error> {
        move_row(&self.pool, SortableTable::Testimonials, id, direction).await
    }

    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pending_testimonials");
        let result: Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM testimonials WHERE is_approved = false")
                .fetch_one(&self.pool)
                .await;
        timer.finish(result).map(|row| row.0)
    }
}
