//! Admin management of the site banner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::NoticeRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::collection::SetActiveRequest;
use domain::models::notice::{CreateNoticeRequest, UpdateNoticeRequest};
use domain::models::Notice;

fn not_found() -> ApiError {
    ApiError::NotFound("Notice not found".to_string())
}

/// GET /api/v1/admin/notices
pub async fn list_notices(State(state): State<AppState>) -> Result<Json<Vec<Notice>>, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    let notices = repo.list_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(notices))
}

/// Create an inactive notice.
///
/// POST /api/v1/admin/notices
pub async fn create_notice(
    State(state): State<AppState>,
    Json(request): Json<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    request.validate()?;

    let repo = NoticeRepository::new(state.pool.clone());
    let notice: Notice = repo.create(request.content.trim()).await?.into();

    info!(notice_id = %notice.id, "Notice created");
    Ok((StatusCode::CREATED, Json(notice)))
}

/// PUT /api/v1/admin/notices/:notice_id
pub async fn update_notice(
    State(state): State<AppState>,
    Path(notice_id): Path<Uuid>,
    Json(request): Json<UpdateNoticeRequest>,
) -> Result<Json<Notice>, ApiError> {
    request.validate()?;

    let repo = NoticeRepository::new(state.pool.clone());
    let notice: Notice = repo
        .update_content(notice_id, request.content.trim())
        .await?
        .ok_or_else(not_found)?
        .into();

    Ok(Json(notice))
}

/// Activate or deactivate a notice. Activation switches every other notice off.
///
/// PUT /api/v1/admin/notices/:notice_id/status
pub async fn set_notice_status(
    State(state): State<AppState>,
    Path(notice_id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Notice>, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    let notice: Notice = repo
        .set_status(notice_id, request.is_active)
        .await?
        .ok_or_else(not_found)?
        .into();

    info!(notice_id = %notice.id, is_active = notice.is_active, "Notice status changed");
    Ok(Json(notice))
}

/// DELETE /api/v1/admin/notices/:notice_id
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(notice_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    if !repo.delete(notice_id).await? {
        return Err(not_found());
    }

    info!(notice_id = %notice_id, "Notice deleted");
    Ok(StatusCode::NO_CONTENT)
}
