//! Invoice issuance engine
//!
//! Validates an order and commits the whole issuance in one database
//! transaction: stock decrement, invoice, line items, movement ledger rows,
//! dispatch records, and the location's invoice counter. Failure at any
//! point leaves zero rows behind.
//!
//! Invoice-number uniqueness is enforced by the store itself: the UNIQUE
//! constraint on `invoices.invoice_no` rejects a concurrent duplicate
//! inside the transaction. The pre-check before the transaction only
//! exists to give callers a friendlier error in the common case.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use shared::{
    apply_location_delta, compute_invoice_totals, location_total, round_mass,
    validate_location_name, Invoice, InvoiceItem, IssueInvoiceInput, ItemSummary, LedgerPolicy,
    LocationMap, MovementType, TransportDetails,
};

use crate::error::{AppError, AppResult};

/// The invoice issuance engine
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
    policy: LedgerPolicy,
}

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub invoice_no: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub from_location: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub taxable_value: Decimal,
    pub transport: Json<TransportDetails>,
    pub items_summary: Option<Json<Vec<ItemSummary>>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            invoice_no: row.invoice_no,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            from_location: row.from_location,
            subtotal: row.subtotal,
            tax_amount: row.tax_amount,
            total_amount: row.total_amount,
            taxable_value: row.taxable_value,
            transport: row.transport.0,
            items_summary: row.items_summary.map(|summary| summary.0),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceItemRow {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct LocationCounterRow {
    invoice_prefix: String,
    next_invoice_number: i64,
    active: bool,
}

#[derive(Debug, FromRow)]
struct LockedProductRow {
    id: Uuid,
    name: String,
    locations: Json<LocationMap>,
}

/// A validated line ready to be written.
#[derive(Debug)]
struct StagedLine {
    product_id: Uuid,
    product_name: String,
    quantity: Decimal,
    price: Decimal,
}

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool, policy: LedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Issue a sales invoice, consuming stock from the dispatch location.
    pub async fn issue_invoice(&self, input: IssueInvoiceInput) -> AppResult<Invoice> {
        validate_location_name(&input.from_location)
            .map_err(|msg| AppError::field("from_location", msg))?;
        if input.lines.is_empty() {
            return Err(AppError::ValidationError(
                "At least one invoice line is required".to_string(),
            ));
        }

        // Coerce every quantity up front so a malformed line fails fast,
        // before anything is locked.
        let mut parsed_lines: Vec<(Uuid, Decimal, Decimal)> = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let qty = round_mass(
                line.quantity
                    .parse()
                    .map_err(|msg| AppError::field("quantity", msg))?,
            );
            if qty < Decimal::ZERO {
                return Err(AppError::ValidationError(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            parsed_lines.push((line.product_id, qty, line.price));
        }

        let requested_no = input
            .invoice_no
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let manual_no = self.policy.manual_invoice_no && !requested_no.is_empty();

        // Friendly pre-check for caller-supplied numbers. Racy on its own;
        // the UNIQUE constraint inside the transaction is what actually
        // guarantees uniqueness.
        if manual_no {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_no = $1)",
            )
            .bind(&requested_no)
            .fetch_one(&self.db)
            .await?;

            if exists {
                return Err(AppError::DuplicateEntry(format!(
                    "Invoice number \"{}\" already exists",
                    requested_no
                )));
            }
        }

        let mut tx = self.db.begin().await?;

        // Lock the dispatch location, derive the number when needed, and
        // advance the counter in the same transaction as the invoice write.
        let location = sqlx::query_as::<_, LocationCounterRow>(
            r#"
            SELECT invoice_prefix, next_invoice_number, active
            FROM locations
            WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(&input.from_location)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        if !location.active {
            return Err(AppError::ValidationError(format!(
                "Dispatch location \"{}\" is inactive",
                input.from_location
            )));
        }

        let invoice_no = if manual_no {
            requested_no
        } else {
            format!(
                "{}-{}",
                location.invoice_prefix, location.next_invoice_number
            )
        };

        sqlx::query(
            "UPDATE locations SET next_invoice_number = next_invoice_number + 1 WHERE name = $1",
        )
        .bind(&input.from_location)
        .execute(&mut *tx)
        .await?;

        let customer_name = match input.customer_id {
            Some(customer_id) => {
                sqlx::query_scalar::<_, String>("SELECT name FROM customers WHERE id = $1")
                    .bind(customer_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Customer".to_string()))?
            }
            None => "Unknown".to_string(),
        };

        // Lock every referenced product row; two operations touching the
        // same product contend on the row, not on individual map keys.
        let mut product_ids: Vec<Uuid> = parsed_lines.iter().map(|(id, _, _)| *id).collect();
        product_ids.sort();
        product_ids.dedup();

        let locked = sqlx::query_as::<_, LockedProductRow>(
            "SELECT id, name, locations FROM products WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut stock: BTreeMap<Uuid, (String, LocationMap)> = locked
            .into_iter()
            .map(|row| (row.id, (row.name, row.locations.0)))
            .collect();

        // Validate and stage every line against the evolving maps, so
        // repeated products accumulate instead of overwriting each other.
        let mut staged: Vec<StagedLine> = Vec::with_capacity(parsed_lines.len());
        let mut items_summary: Vec<ItemSummary> = Vec::with_capacity(parsed_lines.len());

        for (product_id, qty, price) in &parsed_lines {
            let (name, locations) = stock
                .get_mut(product_id)
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let available = location_total(locations);
            if *qty > Decimal::ZERO && available < *qty && !self.policy.allow_negative_stock {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient global stock for {}. Available: {}, Requested: {}",
                    name, available, qty
                )));
            }

            apply_location_delta(locations, &input.from_location, -*qty);

            staged.push(StagedLine {
                product_id: *product_id,
                product_name: name.clone(),
                quantity: *qty,
                price: *price,
            });
            items_summary.push(ItemSummary {
                product_name: name.clone(),
                quantity: *qty,
                price: *price,
            });
        }

        let transport = input.transport.unwrap_or_default();
        let totals = compute_invoice_totals(&items_summary, &transport, &self.policy);

        let invoice = sqlx::query_as::<_, InvoiceRow>(
            r#"
            INSERT INTO invoices (
                invoice_no, customer_id, customer_name, from_location,
                subtotal, tax_amount, total_amount, taxable_value,
                transport, items_summary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, invoice_no, customer_id, customer_name, from_location,
                      subtotal, tax_amount, total_amount, taxable_value,
                      transport, items_summary, status, created_at
            "#,
        )
        .bind(&invoice_no)
        .bind(input.customer_id)
        .bind(&customer_name)
        .bind(&input.from_location)
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total_amount)
        .bind(totals.taxable_value)
        .bind(Json(&transport))
        .bind(Json(&items_summary))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| duplicate_or_db(e, &invoice_no))?;

        for line in &staged {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, product_id, product_name, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(invoice.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO stock_movements (
                    product_id, product_name, location, change_qty,
                    movement_type, reason, related_invoice_id, transport
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(&input.from_location)
            .bind(-line.quantity)
            .bind(MovementType::Invoice.as_str())
            .bind(format!("Invoice #{}", invoice_no))
            .bind(invoice.id)
            .bind(Json(&transport))
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO dispatches (
                    invoice_id, invoice_no, product_id, product_name,
                    quantity, location, transport
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(invoice.id)
            .bind(&invoice_no)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(&input.from_location)
            .bind(Json(&transport))
            .execute(&mut *tx)
            .await?;
        }

        // Apply the staged stock decrements, one write per product,
        // cached total recomputed from the full map.
        for (product_id, (_, locations)) in &stock {
            sqlx::query(
                r#"
                UPDATE products
                SET locations = $1, stock_qty = $2, updated_at = now()
                WHERE id = $3
                "#,
            )
            .bind(Json(locations))
            .bind(location_total(locations))
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            invoice_no = %invoice.invoice_no,
            from_location = %invoice.from_location,
            lines = staged.len(),
            "invoice issued"
        );

        Ok(invoice.into())
    }

    /// Get an invoice by ID
    pub async fn get_invoice(&self, invoice_id: Uuid) -> AppResult<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, customer_id, customer_name, from_location,
                   subtotal, tax_amount, total_amount, taxable_value,
                   transport, items_summary, status, created_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        Ok(row.into())
    }

    /// List all invoices, newest first
    pub async fn list_invoices(&self) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, customer_id, customer_name, from_location,
                   subtotal, tax_amount, total_amount, taxable_value,
                   transport, items_summary, status, created_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    /// Get the line items of an invoice
    pub async fn get_invoice_items(&self, invoice_id: Uuid) -> AppResult<Vec<InvoiceItem>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
                .bind(invoice_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, product_id, product_name, quantity, price, created_at
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InvoiceItem::from).collect())
    }
}

/// Map a unique-constraint violation on the invoice number to the same
/// conflict error the pre-check produces.
fn duplicate_or_db(err: sqlx::Error, invoice_no: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::DuplicateEntry(
            format!("Invoice number \"{}\" already exists", invoice_no),
        ),
        _ => AppError::DatabaseError(err),
    }
}
