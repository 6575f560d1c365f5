//! Testimonial domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::validate_not_blank;
use uuid::Uuid;
use validator::Validate;

/// A customer review. Only approved testimonials are shown publicly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Testimonial {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub rating: i16,
    pub is_approved: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Review submitted by a visitor. Stored unapproved.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitTestimonialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,

    #[validate(length(min = 1, max = 2000, message = "Review must be 1-2000 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
}

/// Testimonial created by an admin. Stored approved.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,

    #[validate(length(min = 1, max = 2000, message = "Review must be 1-2000 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
}

/// Partial update of a testimonial.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTestimonialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Review must be 1-2000 characters"))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetApprovalRequest {
    pub is_approved: bool,
}

/// Public view of a testimonial.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TestimonialResponse {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            username: t.username,
            text: t.text,
            rating: t.rating,
            created_at: t.created_at,
        }
    }
}
