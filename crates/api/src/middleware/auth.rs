//! Admin authentication middleware.
//!
//! Admin routes are guarded by a static key sent in `X-Admin-Key` and
//! compared against `admin.api_key`. There are no sessions or accounts.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use shared::crypto::secrets_match;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Rejects requests without the configured admin key.
///
/// An empty `admin.api_key` disables the admin API entirely.
pub async fn require_admin_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.admin.api_key.as_str();
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if is_authorized(expected, provided) {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request");
        ApiError::Unauthorized("Invalid or missing admin key".into()).into_response()
    }
}

fn is_authorized(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(key) if !expected.is_empty() => secrets_match(key, expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_authorized() {
        assert!(is_authorized("secret", Some("secret")));
        assert!(!is_authorized("secret", Some("Secret")));
        assert!(!is_authorized("secret", None));
    }

    #[test]
    fn test_empty_key_disables_admin() {
        assert!(!is_authorized("", Some("")));
        assert!(!is_authorized("", None));
    }
}
