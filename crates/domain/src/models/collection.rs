//! Collection domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{slugify, validate_not_blank};
use uuid::Uuid;
use validator::Validate;

use crate::models::product::ProductResponse;

/// Message returned when a slug is already taken.
pub const SLUG_TAKEN_MESSAGE: &str =
    "This URL (slug) is already taken. Please choose a different one.";

/// A curated group of products reachable by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Collection {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a collection.
///
/// When `slug` is omitted it is derived from the title.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub product_ids: Vec<Uuid>,
}

impl CreateCollectionRequest {
    /// The URL-safe slug to store.
    pub fn resolved_slug(&self) -> Result<String, String> {
        let source = self
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.title);
        normalize_slug(source)
    }
}

/// Request payload for updating a collection (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCollectionRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateCollectionRequest {
    pub fn resolved_slug(&self) -> Result<Option<String>, String> {
        self.slug.as_deref().map(normalize_slug).transpose()
    }
}

fn normalize_slug(source: &str) -> Result<String, String> {
    let slug = slugify(source);
    if slug.is_empty() {
        Err("Slug must contain at least one letter or digit".to_string())
    } else {
        Ok(slug)
    }
}

/// Replaces the full product membership of a collection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetCollectionProductsRequest {
    #[validate(length(max = 500, message = "At most 500 products per collection"))]
    pub product_ids: Vec<Uuid>,
}

/// Toggles whether an entry is publicly visible.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Public or admin view of a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectionResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Collection> for CollectionResponse {
    fn from(c: Collection) -> Self {
        Self {
            id: c.id,
            title: c.title,
            slug: c.slug,
            description: c.description,
            image_url: c.image_url,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

/// A collection together with its active products.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetailResponse {
    #[serde(flatten)]
    pub collection: CollectionResponse,
    pub products: Vec<ProductResponse>,
}

/// Admin view including product membership.
#[derive(Debug, Clone, Serialize)]
pub struct AdminCollectionResponse {
    #[serde(flatten)]
    pub collection: CollectionResponse,
    pub product_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(title: &str, slug: Option<&str>) -> CreateCollectionRequest {
        CreateCollectionRequest {
            title: title.to_string(),
            slug: slug.map(str::to_string),
            description: None,
            image_url: None,
            is_active: true,
            product_ids: Vec::new(),
        }
    }

    #[test]
    fn test_slug_derived_from_title() {
        let request = create_request("Summer Shred 2024", None);
        assert_eq!(request.resolved_slug().unwrap(), "summer-shred-2024");
    }

    #[test]
    fn test_explicit_slug_is_normalized() {
        let request = create_request("Anything", Some("  Beginner Plans "));
        assert_eq!(request.resolved_slug().unwrap(), "beginner-plans");
    }

    #[test]
    fn test_blank_slug_falls_back_to_title() {
        let request = create_request("Cardio", Some("   "));
        assert_eq!(request.resolved_slug().unwrap(), "cardio");
    }

    #[test]
    fn test_unusable_slug_rejected() {
        let request = create_request("!!!", None);
        assert!(request.resolved_slug().is_err());
    }

    #[test]
    fn test_update_slug_optional() {
        let request = UpdateCollectionRequest::default();
        assert_eq!(request.resolved_slug().unwrap(), None);

        let request = UpdateCollectionRequest {
            slug: Some("New Name".to_string()),
            ..Default::default()
        };
        assert_eq!(request.resolved_slug().unwrap(), Some("new-name".to_string()));
    }

    #[test]
    fn test_create_request_deserialization_defaults() {
        let request: CreateCollectionRequest =
            serde_json::from_str(r#"{"title": "Home Workouts"}"#).unwrap();
        assert!(request.is_active);
        assert!(request.product_ids.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_detail_response_flattens_collection() {
        let detail = CollectionDetailResponse {
            collection: CollectionResponse {
                id: Uuid::new_v4(),
                title: "Home".to_string(),
                slug: "home".to_string(),
                description: None,
                image_url: None,
                is_active: true,
                created_at: Utc::now(),
            },
            products: Vec::new(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["slug"], "home");
        assert!(json["products"].as_array().unwrap().is_empty());
    }
}
