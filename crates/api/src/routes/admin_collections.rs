//! Admin collection management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::{CollectionRepository, NewCollection};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::collection::{
    AdminCollectionResponse, CreateCollectionRequest, SetActiveRequest,
    SetCollectionProductsRequest, UpdateCollectionRequest,
};
use domain::models::Collection;

async fn with_products(
    repo: &CollectionRepository,
    collection: Collection,
) -> Result<AdminCollectionResponse, ApiError> {
    let product_ids = repo.product_ids(collection.id).await?;
    Ok(AdminCollectionResponse {
        collection: collection.into(),
        product_ids,
    })
}

fn not_found() -> ApiError {
    ApiError::NotFound("Collection not found".to_string())
}

/// GET /api/v1/admin/collections
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminCollectionResponse>>, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    let mut collections = Vec::new();
    for entity in repo.list_all().await? {
        collections.push(with_products(&repo, entity.into()).await?);
    }
    Ok(Json(collections))
}

/// GET /api/v1/admin/collections/:collection_id
pub async fn get_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<AdminCollectionResponse>, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .find_by_id(collection_id)
        .await?
        .ok_or_else(not_found)?
        .into();
    Ok(Json(with_products(&repo, collection).await?))
}

/// Create a collection with its initial products.
///
/// POST /api/v1/admin/collections
pub async fn create_collection(
    State(state): State<AppState>,
    Json(request): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<AdminCollectionResponse>), ApiError> {
    request.validate()?;
    let slug = request.resolved_slug().map_err(ApiError::Validation)?;

    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .create(
            &NewCollection {
                title: request.title.trim(),
                slug: &slug,
                description: request.description.as_deref(),
                image_url: request.image_url.as_deref(),
                is_active: request.is_active,
            },
            &request.product_ids,
        )
        .await?
        .into();

    info!(collection_id = %collection.id, slug = %collection.slug, "Collection created");

    let response = with_products(&repo, collection).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/v1/admin/collections/:collection_id
pub async fn update_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
    Json(request): Json<UpdateCollectionRequest>,
) -> Result<Json<AdminCollectionResponse>, ApiError> {
    request.validate()?;
    let slug = request.resolved_slug().map_err(ApiError::Validation)?;

    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .update(
            collection_id,
            request.title.as_deref().map(str::trim),
            slug.as_deref(),
            request.description.as_deref(),
            request.image_url.as_deref(),
            request.is_active,
        )
        .await?
        .ok_or_else(not_found)?
        .into();

    info!(collection_id = %collection.id, "Collection updated");
    Ok(Json(with_products(&repo, collection).await?))
}

/// PUT /api/v1/admin/collections/:collection_id/status
pub async fn set_collection_status(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<AdminCollectionResponse>, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .set_active(collection_id, request.is_active)
        .await?
        .ok_or_else(not_found)?
        .into();

    info!(collection_id = %collection.id, is_active = collection.is_active, "Collection status changed");
    Ok(Json(with_products(&repo, collection).await?))
}

/// Replace the product membership, keeping the given order.
///
/// PUT /api/v1/admin/collections/:collection_id/products
pub async fn set_collection_products(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
    Json(request): Json<SetCollectionProductsRequest>,
) -> Result<Json<AdminCollectionResponse>, ApiError> {
    request.validate()?;

    let repo = CollectionRepository::new(state.pool.clone());
    let collection: Collection = repo
        .find_by_id(collection_id)
        .await?
        .ok_or_else(not_found)?
        .into();

    repo.replace_products(collection.id, &request.product_ids).await?;

    info!(
        collection_id = %collection.id,
        products = request.product_ids.len(),
        "Collection products replaced"
    );
    Ok(Json(with_products(&repo, collection).await?))
}

/// DELETE /api/v1/admin/collections/:collection_id
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CollectionRepository::new(state.pool.clone());
    if !repo.delete(collection_id).await? {
        return Err(not_found());
    }

    info!(collection_id = %collection_id, "Collection deleted");
    Ok(StatusCode::NO_CONTENT)
}
