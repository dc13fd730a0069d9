//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::{CreateProductInput, Product, UpdateProductInput};

use crate::error::AppResult;
use crate::services::ProductService;
use crate::AppState;

fn service(state: &AppState) -> ProductService {
    ProductService::new(state.db.clone(), state.config.ledger.low_stock_threshold)
}

/// Add a product to the catalog
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let product = service(&state).create_product(input).await?;
    Ok(Json(product))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = service(&state).list_products().await?;
    Ok(Json(products))
}

/// Products at or below their low-stock threshold
pub async fn list_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = service(&state).low_stock_products().await?;
    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = service(&state).get_product(product_id).await?;
    Ok(Json(product))
}

/// Edit product master data
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let product = service(&state).update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    service(&state).delete_product(product_id).await?;
    Ok(Json(()))
}
