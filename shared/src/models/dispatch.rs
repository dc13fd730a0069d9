//! Dispatch record models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TransportDetails;

/// A read-oriented record of goods leaving a location against an invoice.
///
/// Created exactly once per invoice line at issuance time, or later by the
/// reconciliation job for historical invoices; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub invoice_no: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub location: String,
    pub transport: TransportDetails,
    /// Issuance time of the invoice, not the time the row was written.
    pub created_at: DateTime<Utc>,
}
