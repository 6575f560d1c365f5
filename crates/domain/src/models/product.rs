//! Product domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validation::validate_not_blank;
use uuid::Uuid;
use validator::Validate;

use crate::models::currency::Currency;
use crate::services::currency::{round_money, to_display};
use crate::services::licence::{resolve_duration, LicenceDuration, MAX_LICENCE_DAYS};

/// A purchasable digital product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price in the settlement currency.
    pub price: Decimal,
    /// Optional fixed USD price; otherwise USD is derived from `price`.
    pub usd_price: Option<Decimal>,
    pub duration_label: Option<String>,
    pub duration_days: Option<i32>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub file_url: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Licence length granted on purchase, if the product is time-limited.
    pub fn licence_duration(&self) -> Option<LicenceDuration> {
        LicenceDuration::from_db(self.duration_days)
    }

    /// Price shown to a customer browsing in `currency`.
    pub fn display_price(&self, currency: Currency, usd_to_ghs_rate: Decimal) -> Decimal {
        match (currency, self.usd_price) {
            (Currency::Usd, Some(usd)) => round_money(usd),
            _ => to_display(self.price, currency, usd_to_ghs_rate),
        }
    }
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub price: Decimal,

    pub usd_price: Option<Decimal>,

    #[validate(length(max = 100, message = "Duration label must be at most 100 characters"))]
    pub duration_label: Option<String>,

    #[validate(range(min = 1, max = 36500, message = "Duration must be 1-36500 days"))]
    pub duration_days: Option<i32>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid preview URL"))]
    pub preview_url: Option<String>,

    #[validate(url(message = "Invalid file URL"))]
    pub file_url: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub sort_order: Option<i32>,
}

impl CreateProductRequest {
    /// Validate that prices are non-negative.
    pub fn validate_prices(&self) -> Result<(), String> {
        validate_prices(Some(self.price), self.usd_price)
    }

    /// Licence length to store: explicit days win over the parsed label.
    pub fn resolved_duration_days(&self) -> Option<i32> {
        resolved_days(self.duration_label.as_deref(), self.duration_days)
    }
}

/// Request payload for updating a product (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub price: Option<Decimal>,

    pub usd_price: Option<Decimal>,

    #[validate(length(max = 100, message = "Duration label must be at most 100 characters"))]
    pub duration_label: Option<String>,

    #[validate(range(min = 1, max = 36500, message = "Duration must be 1-36500 days"))]
    pub duration_days: Option<i32>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid preview URL"))]
    pub preview_url: Option<String>,

    #[validate(url(message = "Invalid file URL"))]
    pub file_url: Option<String>,

    pub is_active: Option<bool>,

    pub sort_order: Option<i32>,
}

impl UpdateProductRequest {
    pub fn validate_prices(&self) -> Result<(), String> {
        validate_prices(self.price, self.usd_price)
    }

    /// New licence length, when the label or the day count changes.
    pub fn resolved_duration_days(&self) -> Option<i32> {
        if self.duration_label.is_none() && self.duration_days.is_none() {
            return None;
        }
        resolved_days(self.duration_label.as_deref(), self.duration_days)
    }
}

fn validate_prices(price: Option<Decimal>, usd_price: Option<Decimal>) -> Result<(), String> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err("Price must not be negative".to_string());
    }
    if usd_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err("USD price must not be negative".to_string());
    }
    Ok(())
}

fn resolved_days(label: Option<&str>, days: Option<i32>) -> Option<i32> {
    let explicit = days
        .and_then(|d| u32::try_from(d).ok())
        .filter(|d| *d <= MAX_LICENCE_DAYS);
    resolve_duration(label, explicit).and_then(|d| i32::try_from(d.days()).ok())
}

/// Public view of a product. The source file location is never exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub usd_price: Option<Decimal>,
    pub duration_label: Option<String>,
    pub duration_days: Option<i32>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub sort_order: i32,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            usd_price: p.usd_price,
            duration_label: p.duration_label,
            duration_days: p.duration_days,
            image_url: p.image_url,
            preview_url: p.preview_url,
            sort_order: p.sort_order,
        }
    }
}

/// Response for listing products.
#[derive(Debug, Clone, Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<ProductResponse>,
    pub total: i64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::str::FromStr;

    pub(crate) fn sample_product(price: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Strength Programme".to_string(),
            description: Some("Twelve weeks of lifting".to_string()),
            price: Decimal::from_str(price).unwrap(),
            usd_price: None,
            duration_label: Some("4 Weeks".to_string()),
            duration_days: Some(28),
            image_url: None,
            preview_url: Some("https://cdn.example.com/preview.pdf".to_string()),
            file_url: "https://cdn.example.com/programme.pdf".to_string(),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_request() -> CreateProductRequest {
        serde_json::from_str(
            r#"{
                "name": "Strength Programme",
                "price": 105.0,
                "duration_label": "12 Weeks",
                "file_url": "https://cdn.example.com/programme.pdf"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_licence_duration() {
        let product = sample_product("105.00");
        assert_eq!(product.licence_duration().map(|d| d.days()), Some(28));

        let mut unlimited = product.clone();
        unlimited.duration_days = None;
        assert!(unlimited.licence_duration().is_none());
    }

    #[test]
    fn test_display_price_derived() {
        let product = sample_product("105.00");
        let rate = Decimal::from_str("10.5").unwrap();
        assert_eq!(product.display_price(Currency::Ghs, rate), Decimal::from_str("105.00").unwrap());
        assert_eq!(product.display_price(Currency::Usd, rate), Decimal::from_str("10.00").unwrap());
    }

    #[test]
    fn test_display_price_fixed_usd() {
        let mut product = sample_product("105.00");
        product.usd_price = Some(Decimal::from_str("9.99").unwrap());
        let rate = Decimal::from_str("10.5").unwrap();
        assert_eq!(product.display_price(Currency::Usd, rate), Decimal::from_str("9.99").unwrap());
    }

    #[test]
    fn test_create_request_defaults_and_duration() {
        let request = create_request();
        assert!(request.is_active);
        assert!(request.validate().is_ok());
        assert!(request.validate_prices().is_ok());
        assert_eq!(request.resolved_duration_days(), Some(84));
    }

    #[test]
    fn test_create_request_explicit_days_win() {
        let mut request = create_request();
        request.duration_days = Some(10);
        assert_eq!(request.resolved_duration_days(), Some(10));
    }

    #[test]
    fn test_create_request_rejects_negative_price() {
        let mut request = create_request();
        request.price = Decimal::from_str("-1").unwrap();
        assert!(request.validate_prices().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_file_url() {
        let mut request = create_request();
        request.file_url = "not a url".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_duration_untouched() {
        let request = UpdateProductRequest::default();
        assert_eq!(request.resolved_duration_days(), None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_product_response_hides_file_url() {
        let response = ProductResponse::from(sample_product("50"));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("file_url"));
        assert!(json.contains("\"name\":\"Strength Programme\""));
    }
}
