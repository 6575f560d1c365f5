//! Testimonial entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Testimonial;

/// Database row mapping for the testimonials table.
#[derive(Debug, Clone, FromRow)]
pub struct TestimonialEntity {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub rating: i16,
    pub is_approved: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<TestimonialEntity> for Testimonial {
    fn from(entity: TestimonialEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            text: entity.text,
            rating: entity.rating,
            is_approved: entity.is_approved,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
        }
    }
}
