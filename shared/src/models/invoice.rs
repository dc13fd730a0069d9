//! Invoice models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::QuantityInput;

/// Transport details attached to an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransportDetails {
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub mode: String,
    /// When true the transport amount is added on top of the taxed total;
    /// when false it is treated as already included in item pricing.
    /// Transport is never taxed either way.
    #[serde(default)]
    pub is_extra: bool,
}

/// Denormalized line snapshot stored on the invoice for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub product_name: String,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// An issued sales invoice. Immutable once created, except for the
/// items_summary backfill on historical rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    /// Globally unique, enforced by the store inside the issuance transaction.
    pub invoice_no: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub from_location: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub taxable_value: Decimal,
    pub transport: TransportDetails,
    /// Missing on invoices issued before the summary was introduced; the
    /// reconciliation job backfills it from the items.
    pub items_summary: Option<Vec<ItemSummary>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One invoice line, created only alongside its parent invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One requested invoice line.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceLineInput {
    pub product_id: Uuid,
    pub quantity: QuantityInput,
    pub price: Decimal,
}

/// Input for issuing an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueInvoiceInput {
    /// Leave empty to have the engine assign `prefix-counter` from the
    /// dispatch location.
    #[serde(default)]
    pub invoice_no: Option<String>,
    pub customer_id: Option<Uuid>,
    pub from_location: String,
    pub lines: Vec<InvoiceLineInput>,
    #[serde(default)]
    pub transport: Option<TransportDetails>,
}
