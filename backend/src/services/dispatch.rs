//! Dispatch log queries
//!
//! Dispatches are a derived, read-oriented projection of invoice lines.
//! Rows are created by the invoice engine at issuance time (or by the
//! reconciliation job for historical gaps); this service only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{Dispatch, TransportDetails};

use crate::error::{AppError, AppResult};

/// Read-side service over the dispatch log
#[derive(Clone)]
pub struct DispatchService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct DispatchRow {
    id: Uuid,
    invoice_id: Uuid,
    invoice_no: String,
    product_id: Uuid,
    product_name: String,
    quantity: Decimal,
    location: String,
    transport: Json<TransportDetails>,
    created_at: DateTime<Utc>,
}

impl From<DispatchRow> for Dispatch {
    fn from(row: DispatchRow) -> Self {
        Dispatch {
            id: row.id,
            invoice_id: row.invoice_id,
            invoice_no: row.invoice_no,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            location: row.location,
            transport: row.transport.0,
            created_at: row.created_at,
        }
    }
}

impl DispatchService {
    /// Create a new DispatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List dispatches, newest first, optionally filtered by origin location.
    pub async fn list_dispatches(&self, location: Option<String>) -> AppResult<Vec<Dispatch>> {
        let rows = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT id, invoice_id, invoice_no, product_id, product_name,
                   quantity, location, transport, created_at
            FROM dispatches
            WHERE $1::text IS NULL OR location = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(location)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Dispatch::from).collect())
    }

    /// Dispatches belonging to one invoice. An unknown invoice is an error,
    /// distinct from a known invoice whose dispatches have not been
    /// backfilled yet.
    pub async fn get_by_invoice(&self, invoice_id: Uuid) -> AppResult<Vec<Dispatch>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
                .bind(invoice_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        let rows = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT id, invoice_id, invoice_no, product_id, product_name,
                   quantity, location, transport, created_at
            FROM dispatches
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Dispatch::from).collect())
    }
}
