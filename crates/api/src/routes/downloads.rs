//! Entitlement-checked file delivery.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use chrono::Utc;
use persistence::repositories::OrderRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_download;
use crate::services::watermark_pdf;
use domain::models::{OrderStatus, Purchase};
use domain::services::download::{attachment_filename, is_pdf, url_extension, watermark_text};

const PURCHASE_NOT_FOUND: &str = "Purchase not found";

/// Download a purchased file, watermarked when it is a PDF.
///
/// GET /api/v1/download/:order_id/:product_id
pub async fn download_file(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    // Malformed ids are indistinguishable from unknown purchases.
    let (Ok(order_id), Ok(product_id)) = (Uuid::parse_str(&order_id), Uuid::parse_str(&product_id))
    else {
        return Err(ApiError::NotFound(PURCHASE_NOT_FOUND.to_string()));
    };

    let repo = OrderRepository::new(state.pool.clone());
    let purchase: Purchase = repo
        .find_purchase(order_id, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PURCHASE_NOT_FOUND.to_string()))?
        .into();

    let rules = &state.config.downloads;
    if rules.require_paid_order && purchase.order_status != OrderStatus::Paid {
        return Err(ApiError::NotFound(PURCHASE_NOT_FOUND.to_string()));
    }
    if rules.enforce_entitlement_window && purchase.is_expired_on(Utc::now().date_naive()) {
        return Err(ApiError::Forbidden(
            "Your access to this file has expired".to_string(),
        ));
    }

    let file = state
        .fetcher
        .fetch(&purchase.file_url)
        .await
        .map_err(|e| ApiError::FileAccess(format!("{} ({})", e, purchase.file_url)))?;

    let (bytes, content_type, filename, watermarked) =
        if is_pdf(file.content_type.as_deref(), &purchase.file_url) {
            let text = watermark_text(&purchase.customer_email, purchase.order_id);
            let original = file.bytes;
            let stamped = tokio::task::spawn_blocking(move || {
                let result = watermark_pdf(&original, &text);
                (original, result)
            })
            .await
            .map_err(|e| ApiError::Internal(format!("Watermark task failed: {}", e)))?;

            let (bytes, watermarked) = match stamped {
                (_, Ok(stamped)) => (stamped, true),
                (original, Err(e)) => {
                    warn!(
                        order_id = %purchase.order_id,
                        product_id = %purchase.product_id,
                        error = %e,
                        "Watermarking failed, serving original file"
                    );
                    (original, false)
                }
            };
            (
                bytes,
                "application/pdf".to_string(),
                attachment_filename(&purchase.product_name, "pdf"),
                watermarked,
            )
        } else {
            let extension = url_extension(&purchase.file_url).unwrap_or_default();
            (
                file.bytes,
                file.content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                attachment_filename(&purchase.product_name, &extension),
                false,
            )
        };

    record_download(watermarked);
    info!(
        order_id = %purchase.order_id,
        product_id = %purchase.product_id,
        bytes = bytes.len(),
        watermarked,
        "File delivered"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition("attachment", &filename),
        )
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// `Content-Disposition` value with an ASCII fallback name and an RFC 5987
/// `filename*` for names outside ASCII.
pub(crate) fn content_disposition(kind: &str, filename: &str) -> HeaderValue {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();

    let value = if ascii == filename {
        format!("{}; filename=\"{}\"", kind, filename)
    } else {
        format!(
            "{}; filename=\"{}\"; filename*=UTF-8''{}",
            kind,
            ascii,
            urlencoding::encode(filename)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
