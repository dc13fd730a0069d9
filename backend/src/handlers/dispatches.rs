//! HTTP handlers for the dispatch log

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::Dispatch;

use crate::error::AppResult;
use crate::services::DispatchService;
use crate::AppState;

/// Query parameters for the dispatch log
#[derive(Debug, Deserialize)]
pub struct DispatchQuery {
    pub location: Option<String>,
}

/// List dispatches, optionally filtered by origin location
pub async fn list_dispatches(
    State(state): State<AppState>,
    Query(query): Query<DispatchQuery>,
) -> AppResult<Json<Vec<Dispatch>>> {
    let dispatches = DispatchService::new(state.db)
        .list_dispatches(query.location)
        .await?;
    Ok(Json(dispatches))
}

/// Dispatches belonging to one invoice
pub async fn get_invoice_dispatches(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Vec<Dispatch>>> {
    let dispatches = DispatchService::new(state.db)
        .get_by_invoice(invoice_id)
        .await?;
    Ok(Json(dispatches))
}
