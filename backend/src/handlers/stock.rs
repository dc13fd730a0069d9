//! HTTP handlers for stock adjustment endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::{
    AddStockInput, StockMovement, StockTransfer, TransferStockInput, UpdateStockLevelInput,
};

use crate::error::AppResult;
use crate::services::StockService;
use crate::AppState;

/// Query parameters for the movement ledger
#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub product_id: Option<Uuid>,
}

/// Record a stock entry
pub async fn add_stock(
    State(state): State<AppState>,
    Json(input): Json<AddStockInput>,
) -> AppResult<Json<StockMovement>> {
    let movement = StockService::new(state.db).add_stock(input).await?;
    Ok(Json(movement))
}

/// Set a location to an absolute quantity
pub async fn update_stock_level(
    State(state): State<AppState>,
    Json(input): Json<UpdateStockLevelInput>,
) -> AppResult<Json<Option<StockMovement>>> {
    let movement = StockService::new(state.db).update_stock_level(input).await?;
    Ok(Json(movement))
}

/// Transfer stock between locations
pub async fn transfer_stock(
    State(state): State<AppState>,
    Json(input): Json<TransferStockInput>,
) -> AppResult<Json<StockTransfer>> {
    let transfer = StockService::new(state.db).transfer_stock(input).await?;
    Ok(Json(transfer))
}

/// Movement ledger, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let movements = StockService::new(state.db)
        .list_movements(query.product_id)
        .await?;
    Ok(Json(movements))
}

/// List all transfers
pub async fn list_transfers(State(state): State<AppState>) -> AppResult<Json<Vec<StockTransfer>>> {
    let transfers = StockService::new(state.db).list_transfers().await?;
    Ok(Json(transfers))
}
