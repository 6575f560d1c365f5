//! Download links and licence watermark text.

use uuid::Uuid;

/// Number of order-id characters shown to customers.
const ORDER_NUMBER_LEN: usize = 8;

/// Short order number used in e-mails and watermarks (first 8 hex characters).
pub fn order_number(order_id: Uuid) -> String {
    order_id
        .simple()
        .to_string()
        .chars()
        .take(ORDER_NUMBER_LEN)
        .collect()
}

/// Text stamped onto every page of a delivered PDF.
pub fn watermark_text(customer_email: &str, order_id: Uuid) -> String {
    format!(
        "Licensed to {} - Order #{}",
        customer_email.trim(),
        order_number(order_id)
    )
}

/// Public download link for one purchased product.
pub fn download_url(base_url: &str, order_id: Uuid, product_id: Uuid) -> String {
    format!(
        "{}/api/v1/download/{}/{}",
        base_url.trim_end_matches('/'),
        order_id,
        product_id
    )
}

/// Builds the attachment filename from a product name and extension.
///
/// Characters that would break a quoted `Content-Disposition` value are dropped.
pub fn attachment_filename(product_name: &str, extension: &str) -> String {
    let stem: String = product_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\' && *c != '/')
        .collect();
    let stem = stem.trim();
    let stem = if stem.is_empty() { "download" } else { stem };
    let extension = extension.trim_start_matches('.');

    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Extension of the last path segment of a URL, ignoring query and fragment.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Whether fetched content should be treated as a PDF.
pub fn is_pdf(content_type: Option<&str>, url: &str) -> bool {
    content_type
        .map(|ct| ct.to_lowercase().contains("pdf"))
        .unwrap_or(false)
        || url_extension(url).as_deref() == Some("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_id() -> Uuid {
        Uuid::parse_str("3f2a9c1e-7b4d-4e2a-9c1e-7b4d4e2a9c1e").unwrap()
    }

    #[test]
    fn test_order_number() {
        assert_eq!(order_number(order_id()), "3f2a9c1e");
    }

    #[test]
    fn test_watermark_text() {
        assert_eq!(
            watermark_text("ama@example.com", order_id()),
            "Licensed to ama@example.com - Order #3f2a9c1e"
        );
    }

    #[test]
    fn test_watermark_text_is_stable() {
        let id = Uuid::new_v4();
        assert_eq!(watermark_text("a@b.co", id), watermark_text("a@b.co", id));
    }

    #[test]
    fn test_download_url() {
        let product_id = Uuid::nil();
        assert_eq!(
            download_url("https://shop.example.com/", order_id(), product_id),
            format!(
                "https://shop.example.com/api/v1/download/{}/{}",
                order_id(),
                product_id
            )
        );
    }

    #[test]
    fn test_attachment_filename() {
        assert_eq!(attachment_filename("12 Week Plan", "pdf"), "12 Week Plan.pdf");
        assert_eq!(attachment_filename("Bad \"Name\"/x", ".zip"), "Bad Namex.zip");
        assert_eq!(attachment_filename("   ", "pdf"), "download.pdf");
        assert_eq!(attachment_filename("Plan", ""), "Plan");
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://cdn.example.com/files/plan.PDF").as_deref(), Some("pdf"));
        assert_eq!(url_extension("https://cdn.example.com/a.zip?token=1").as_deref(), Some("zip"));
        assert_eq!(url_extension("https://cdn.example.com/files/plan"), None);
        assert_eq!(url_extension("https://cdn.example.com/files/"), None);
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Some("application/pdf"), "https://x/y"));
        assert!(is_pdf(Some("Application/PDF; charset=binary"), "https://x/y"));
        assert!(is_pdf(None, "https://x/y/file.pdf"));
        assert!(is_pdf(Some("application/octet-stream"), "https://x/file.pdf?dl=1"));
        assert!(!is_pdf(Some("application/zip"), "https://x/file.zip"));
        assert!(!is_pdf(None, "https://x/file"));
    }
}
