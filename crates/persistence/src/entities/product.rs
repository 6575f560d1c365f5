//! Product entity (database row mapping).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Product;

/// Database row mapping for the products table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
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

impl From<ProductEntity> for Product {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            usd_price: entity.usd_price,
            duration_label: entity.duration_label,
            duration_days: entity.duration_days,
            image_url: entity.image_url,
            preview_url: entity.preview_url,
            file_url: entity.file_url,
            is_active: entity.is_active,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Column values for inserting or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub usd_price: Option<Decimal>,
    pub duration_label: Option<String>,
    pub duration_days: Option<i32>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub file_url: String,
    pub is_active: bool,
    pub sort_order: Option<i32>,
}
