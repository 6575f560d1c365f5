//! HTTP route handlers.

pub mod admin_collections;
pub mod admin_notices;
pub mod admin_orders;
pub mod admin_products;
pub mod admin_testimonials;
pub mod collections;
pub mod currency;
pub mod downloads;
pub mod health;
pub mod notices;
pub mod orders;
pub mod payments;
pub mod preview;
pub mod products;
pub mod testimonials;
pub mod webhooks;

use axum::Json;
use persistence::repositories::MoveOutcome;
use uuid::Uuid;

use crate::error::ApiError;
use domain::services::{MoveDirection, MoveResponse};

/// Maps a repository move outcome to the admin response.
pub(crate) fn move_response(
    id: Uuid,
    direction: MoveDirection,
    outcome: MoveOutcome,
    not_found: &str,
) -> Result<Json<MoveResponse>, ApiError> {
    let moved = match outcome {
        MoveOutcome::Moved => true,
        MoveOutcome::AtEdge => false,
        MoveOutcome::NotFound => return Err(ApiError::NotFound(not_found.to_string())),
    };
    Ok(Json(MoveResponse {
        id,
        direction,
        moved,
    }))
}
