//! HTTP handlers for maintenance jobs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::ReconciliationService;
use crate::AppState;

/// Result of a backfill run
#[derive(Debug, Serialize)]
pub struct BackfillResult {
    /// Invoices that had dispatch rows regenerated
    pub processed: u64,
}

/// Regenerate missing dispatch records and invoice summaries
pub async fn backfill_dispatches(State(state): State<AppState>) -> AppResult<Json<BackfillResult>> {
    let processed = ReconciliationService::new(state.db)
        .backfill_dispatches()
        .await?;
    Ok(Json(BackfillResult { processed }))
}
