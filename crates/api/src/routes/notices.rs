use axum::{extract::State, Json};
use persistence::repositories::NoticeRepository;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::Notice;

/// The active site notice, or `null`.
///
/// GET /api/v1/notices/active
pub async fn get_active_notice(
    State(state): State<AppState>,
) -> Result<Json<Option<Notice>>, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    let notice = repo.find_active().await?.map(Notice::from);
    Ok(Json(notice))
}
