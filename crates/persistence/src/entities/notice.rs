//! Notice entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Notice;

/// Database row mapping for the notices table.
#[derive(Debug, Clone, FromRow)]
pub struct NoticeEntity {
    pub id: Uuid,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NoticeEntity> for Notice {
    fn from(entity: NoticeEntity) -> Self {
        Self {
            id: entity.id,
            content: entity.content,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
