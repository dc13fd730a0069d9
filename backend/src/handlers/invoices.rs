//! HTTP handlers for invoice endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::{Invoice, InvoiceItem, IssueInvoiceInput};

use crate::error::AppResult;
use crate::services::InvoiceService;
use crate::AppState;

fn service(state: &AppState) -> InvoiceService {
    InvoiceService::new(state.db.clone(), state.config.ledger_policy())
}

/// Issue an invoice, consuming stock from the dispatch location
pub async fn issue_invoice(
    State(state): State<AppState>,
    Json(input): Json<IssueInvoiceInput>,
) -> AppResult<Json<Invoice>> {
    let invoice = service(&state).issue_invoice(input).await?;
    Ok(Json(invoice))
}

/// List all invoices
pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = service(&state).list_invoices().await?;
    Ok(Json(invoices))
}

/// Get an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Invoice>> {
    let invoice = service(&state).get_invoice(invoice_id).await?;
    Ok(Json(invoice))
}

/// Get the line items of an invoice
pub async fn get_invoice_items(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Vec<InvoiceItem>>> {
    let items = service(&state).get_invoice_items(invoice_id).await?;
    Ok(Json(items))
}
