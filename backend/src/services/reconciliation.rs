//! Reconciliation job
//!
//! Idempotent batch repair for historical invoices: regenerates missing
//! dispatch rows from the invoice items (keeping the invoice's original
//! timestamp) and backfills a missing items summary. Each invoice is
//! repaired independently and outside any cross-invoice transaction, so
//! the job is safe to retry or interrupt; one invoice's failure never
//! aborts the batch.

use sqlx::types::Json;
use sqlx::PgPool;

use shared::ItemSummary;

use crate::error::AppResult;
use crate::services::invoice::{InvoiceItemRow, InvoiceRow};

/// Batch repair service for derived invoice records
#[derive(Clone)]
pub struct ReconciliationService {
    db: PgPool,
}

impl ReconciliationService {
    /// Create a new ReconciliationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Scan all invoices and create dispatch rows for those with none.
    /// Returns the number of invoices backfilled.
    pub async fn backfill_dispatches(&self) -> AppResult<u64> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, customer_id, customer_name, from_location,
                   subtotal, tax_amount, total_amount, taxable_value,
                   transport, items_summary, status, created_at
            FROM invoices
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        tracing::info!(invoices = invoices.len(), "starting dispatch backfill");

        let mut processed = 0u64;
        for invoice in &invoices {
            match self.backfill_invoice(invoice).await {
                Ok(true) => processed += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        invoice_no = %invoice.invoice_no,
                        error = %err,
                        "dispatch backfill failed for invoice; continuing"
                    );
                }
            }
        }

        tracing::info!(processed, "dispatch backfill finished");
        Ok(processed)
    }

    /// Repair a single invoice. Returns true when dispatch rows were missing.
    async fn backfill_invoice(&self, invoice: &InvoiceRow) -> AppResult<bool> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM dispatches WHERE invoice_id = $1",
        )
        .bind(invoice.id)
        .fetch_one(&self.db)
        .await?;

        let mut backfilled = false;
        if existing == 0 {
            let items = self.invoice_items(invoice).await?;
            for item in &items {
                sqlx::query(
                    r#"
                    INSERT INTO dispatches (
                        invoice_id, invoice_no, product_id, product_name,
                        quantity, location, transport, created_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(invoice.id)
                .bind(&invoice.invoice_no)
                .bind(item.product_id)
                .bind(&item.product_name)
                .bind(item.quantity)
                .bind(&invoice.from_location)
                .bind(&invoice.transport)
                // Keep the original issuance date, not "now"
                .bind(invoice.created_at)
                .execute(&self.db)
                .await?;
            }
            backfilled = true;
        }

        if invoice.items_summary.is_none() {
            let items = self.invoice_items(invoice).await?;
            let summary: Vec<ItemSummary> = items
                .iter()
                .map(|item| ItemSummary {
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect();

            sqlx::query("UPDATE invoices SET items_summary = $1 WHERE id = $2")
                .bind(Json(&summary))
                .bind(invoice.id)
                .execute(&self.db)
                .await?;
        }

        Ok(backfilled)
    }

    async fn invoice_items(&self, invoice: &InvoiceRow) -> AppResult<Vec<InvoiceItemRow>> {
        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, product_id, product_name, quantity, price, created_at
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice.id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }
}
