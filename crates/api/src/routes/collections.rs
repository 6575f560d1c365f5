//! Public collection pages.

use axum::{
    extract::{Path, State},
    Json,
};
use persistence::repositories::CollectionRepository;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::collection::{CollectionDetailResponse, CollectionResponse};
use domain::models::{Collection, Product};

/// List active collections, newest first.
///
/// GET /api/v1/collections
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionResponse>>, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    let collections = repo
        .list_active()
        .await?
        .into_iter()
        .map(|e| Collection::from(e).into())
        .collect();

    Ok(Json(collections))
}

/// A collection with its active products in membership order.
///
/// GET /api/v1/collections/:slug
pub async fn get_collection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CollectionDetailResponse>, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .find_active_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Collection not found".to_string()))?
        .into();

    let products = repo
        .active_products(collection.id)
        .await?
        .into_iter()
        .map(|e| Product::from(e).into())
        .collect();

    Ok(Json(CollectionDetailResponse {
        collection: collection.into(),
        products,
    }))
}
