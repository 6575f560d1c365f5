//! Admin moderation of testimonials.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::TestimonialRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::move_response;
use domain::models::testimonial::{
    CreateTestimonialRequest, SetApprovalRequest, UpdateTestimonialRequest,
};
use domain::models::Testimonial;
use domain::services::{MoveRequest, MoveResponse};

const NOT_FOUND: &str = "Testimonial not found";

/// All testimonials, pending ones included.
///
/// GET /api/v1/admin/testimonials
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonials = repo.list_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(testimonials))
}

/// Testimonials added by an admin are published immediately.
///
/// POST /api/v1/admin/testimonials
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(request): Json<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    request.validate()?;

    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonial: Testimonial = repo
        .create(request.username.trim(), request.text.trim(), request.rating, true)
        .await?
        .into();

    info!(testimonial_id = %testimonial.id, "Testimonial created");
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PUT /api/v1/admin/testimonials/:testimonial_id
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(testimonial_id): Path<Uuid>,
    Json(request): Json<UpdateTestimonialRequest>,
) -> Result<Json<Testimonial>, ApiError> {
    request.validate()?;

    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonial: Testimonial = repo
        .update(
            testimonial_id,
            request.username.as_deref().map(str::trim),
            request.text.as_deref().map(str::trim),
            request.rating,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?
        .into();

    Ok(Json(testimonial))
}

/// Approve or hide a testimonial.
///
/// PUT /api/v1/admin/testimonials/:testimonial_id/approval
pub async fn set_approval(
    State(state): State<AppState>,
    Path(testimonial_id): Path<Uuid>,
    Json(request): Json<SetApprovalRequest>,
) -> Result<Json<Testimonial>, ApiError> {
    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonial: Testimonial = repo
        .set_approved(testimonial_id, request.is_approved)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?
        .into();

    info!(
        testimonial_id = %testimonial.id,
        is_approved = testimonial.is_approved,
        "Testimonial moderated"
    );
    Ok(Json(testimonial))
}

/// DELETE /api/v1/admin/testimonials/:testimonial_id
pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(testimonial_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TestimonialRepository::new(state.pool.clone());
    if !repo.delete(testimonial_id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(testimonial_id = %testimonial_id, "Testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/testimonials/:testimonial_id/move
pub async fn move_testimonial(
    State(state): State<AppState>,
    Path(testimonial_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let repo = TestimonialRepository::new(state.pool.clone());
    let outcome = repo.move_testimonial(testimonial_id, request.direction).await?;
    move_response(testimonial_id, request.direction, outcome, NOT_FOUND)
}
