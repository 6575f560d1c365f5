//! Admin product management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::entities::ProductInput;
use persistence::repositories::ProductRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::move_response;
use domain::models::product::{CreateProductRequest, UpdateProductRequest};
use domain::models::Product;
use domain::services::{MoveRequest, MoveResponse};

/// Every product, including hidden ones, with file locations.
///
/// GET /api/v1/admin/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    let products = repo.list_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(products))
}

/// Create a product. The licence length is parsed from the label unless given.
///
/// POST /api/v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    request.validate()?;
    request.validate_prices().map_err(ApiError::Validation)?;

    let input = ProductInput {
        name: request.name.trim().to_string(),
        description: request.description.clone(),
        price: request.price,
        usd_price: request.usd_price,
        duration_label: request.duration_label.clone(),
        duration_days: request.resolved_duration_days(),
        image_url: request.image_url.clone(),
        preview_url: request.preview_url.clone(),
        file_url: request.file_url.trim().to_string(),
        is_active: request.is_active,
        sort_order: request.sort_order,
    };

    let repo = ProductRepository::new(state.pool.clone());
    let product: Product = repo.create(&input).await?.into();

    info!(
        product_id = %product.id,
        duration_days = ?product.duration_days,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial update of a product.
///
/// PUT /api/v1/admin/products/:product_id
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    request.validate()?;
    request.validate_prices().map_err(ApiError::Validation)?;

    let repo = ProductRepository::new(state.pool.clone());
    let product: Product = repo
        .update(product_id, &request, request.resolved_duration_days())
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?
        .into();

    info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// Hide a product. Purchased copies stay downloadable.
///
/// DELETE /api/v1/admin/products/:product_id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    if !repo.soft_delete(product_id).await? {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    info!(product_id = %product_id, "Product deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// Swap a product with its neighbour.
///
/// POST /api/v1/admin/products/:product_id/move
pub async fn move_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    let outcome = repo.move_product(product_id, request.direction).await?;
    move_response(product_id, request.direction, outcome, "Product not found")
}
