//! Inline PDF preview proxy.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::downloads::content_disposition;
use crate::services::FileFetchError;

const PDF_NOT_FOUND: &str = "PDF not found";

/// Stream a preview PDF from storage so the browser can show it inline.
///
/// GET /api/v1/preview/:url (the source URL, percent-encoded)
pub async fn preview_pdf(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Response, ApiError> {
    let url = source_url(&raw).ok_or_else(|| ApiError::Validation("Invalid preview URL".to_string()))?;

    let file = match state.fetcher.fetch_allowed(&url).await {
        Ok(file) => file,
        Err(FileFetchError::HostNotAllowed(host)) => {
            warn!(host = %host, "Preview requested from a host outside the allow-list");
            return Err(ApiError::Forbidden("Preview source not allowed".to_string()));
        }
        Err(FileFetchError::InvalidUrl(e)) => return Err(ApiError::Validation(e)),
        Err(e) if e.is_not_found() => return Err(ApiError::NotFound(PDF_NOT_FOUND.to_string())),
        Err(e) => {
            debug!(url = %url, error = %e, "Preview fetch failed");
            return Err(ApiError::NotFound(PDF_NOT_FOUND.to_string()));
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition("inline", "preview.pdf"),
        )
        .header(
            header::CACHE_CONTROL,
            "private, no-cache, no-store, must-revalidate",
        )
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(file.bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// Recovers the source URL from the path segment.
///
/// The router already percent-decodes once; a second decode handles
/// clients that encode twice.
fn source_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if looks_absolute(raw) {
        return Some(raw.to_string());
    }
    let decoded = urlencoding::decode(raw).ok()?;
    looks_absolute(&decoded).then(|| decoded.into_owned())
}

fn looks_absolute(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_plain() {
        assert_eq!(
            source_url("https://files.example.com/a.pdf").as_deref(),
            Some("https://files.example.com/a.pdf")
        );
    }

    #[test]
    fn test_source_url_double_encoded() {
        assert_eq!(
            source_url("https%3A%2F%2Ffiles.example.com%2Fa%20b.pdf").as_deref(),
            Some("https://files.example.com/a b.pdf")
        );
    }

    #[test]
    fn test_source_url_rejects_relative() {
        assert_eq!(source_url("a.pdf"), None);
        assert_eq!(source_url("  "), None);
    }
}
