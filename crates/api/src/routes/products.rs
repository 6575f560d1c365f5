//! Public product catalogue.

use axum::{
    extract::{Path, State},
    Json,
};
use persistence::repositories::ProductRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::product::{ListProductsResponse, ProductResponse};
use domain::models::Product;

/// List active products in display order.
///
/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ListProductsResponse>, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    let products: Vec<ProductResponse> = repo
        .list_active()
        .await?
        .into_iter()
        .map(|e| Product::from(e).into())
        .collect();

    let total = products.len() as i64;
    Ok(Json(ListProductsResponse { products, total }))
}

/// Get one active product.
///
/// GET /api/v1/products/:product_id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    let product: Product = repo
        .find_active_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?
        .into();

    Ok(Json(product.into()))
}
