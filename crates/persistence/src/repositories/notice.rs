//! Notice repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NoticeEntity;
use crate::metrics::QueryTimer;

/// Repository for site notices.
#[derive(Clone)]
pub struct NoticeRepository {
    pool: PgPool,
}

impl NoticeRepository {
    /// Creates a new NoticeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_active(&self) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_notice");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            SELECT * FROM notices
            WHERE is_active = true
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn list_all(&self) -> Result<Vec<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notices");
        let result =
            sqlx::query_as::<_, NoticeEntity>("SELECT * FROM notices ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await;
        timer.finish(result)
    }

    /// New notices start inactive.
    pub async fn create(&self, content: &str) -> Result<NoticeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notice");
        let result = sqlx::query_as::<_, NoticeEntity>(
            "INSERT INTO notices (content, is_active) VALUES ($1, false) RETURNING *",
        )
        .bind(content)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update_content(
        &self,
        id: Uuid,
        content: &str,
    ) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_notice");
        let result = sqlx::query_as::<_, NoticeEntity>(
            "UPDATE notices SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Sets a notice's status. Activating one deactivates all others.
    pub async fn set_status(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_notice_status");
        let mut tx = self.pool.begin().await?;

        if is_active {
            sqlx::query(
                r#"
                UPDATE notices SET is_active = false, updated_at = NOW()
                WHERE is_active = true AND id <> $1
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, NoticeEntity>(
            "UPDATE notices SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&mut *tx)
        .await?;

        // Unknown id: roll back so the other notices stay as they were.
        if updated.is_none() {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_notice");
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(result).map(|r| r.rows_affected() > 0)
    }
}
