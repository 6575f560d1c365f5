//! Public testimonials.

use axum::{extract::State, http::StatusCode, Json};
use persistence::repositories::TestimonialRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::testimonial::{SubmitTestimonialRequest, TestimonialResponse};
use domain::models::Testimonial;

/// Approved testimonials in display order.
///
/// GET /api/v1/testimonials
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<TestimonialResponse>>, ApiError> {
    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonials = repo
        .list_approved()
        .await?
        .into_iter()
        .map(|e| Testimonial::from(e).into())
        .collect();

    Ok(Json(testimonials))
}

/// Submit a review. It stays hidden until an admin approves it.
///
/// POST /api/v1/testimonials
pub async fn submit_testimonial(
    State(state): State<AppState>,
    Json(request): Json<SubmitTestimonialRequest>,
) -> Result<(StatusCode, Json<TestimonialResponse>), ApiError> {
    request.validate()?;

    let repo = TestimonialRepository::new(state.pool.clone());
    let testimonial: Testimonial = repo
        .create(request.username.trim(), request.text.trim(), request.rating, false)
        .await?
        .into();

    info!(testimonial_id = %testimonial.id, rating = testimonial.rating, "Testimonial submitted");

    Ok((StatusCode::CREATED, Json(testimonial.into())))
}
