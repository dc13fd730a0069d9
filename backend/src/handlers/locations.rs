//! HTTP handlers for the location registry

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use shared::{Location, UpsertLocationInput};

use crate::error::AppResult;
use crate::services::LocationService;
use crate::AppState;

/// Query parameters for listing locations
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Restrict to locations eligible for dispatch selection
    pub active: Option<bool>,
}

/// Advisory next invoice number for a location
#[derive(Debug, Serialize)]
pub struct ProposedInvoiceNo {
    pub invoice_no: String,
}

/// List locations
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<Location>>> {
    let service = LocationService::new(state.db);
    let locations = if query.active.unwrap_or(false) {
        service.active_locations().await?
    } else {
        service.list_locations().await?
    };
    Ok(Json(locations))
}

/// Register or edit a location
pub async fn upsert_location(
    State(state): State<AppState>,
    Json(input): Json<UpsertLocationInput>,
) -> AppResult<Json<Location>> {
    let location = LocationService::new(state.db).upsert_location(input).await?;
    Ok(Json(location))
}

/// Advisory `prefix-counter` invoice number for a location
pub async fn next_invoice_no(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ProposedInvoiceNo>> {
    let invoice_no = LocationService::new(state.db)
        .propose_invoice_no(&name)
        .await?;
    Ok(Json(ProposedInvoiceNo { invoice_no }))
}
