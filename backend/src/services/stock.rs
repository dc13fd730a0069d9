//! Stock adjustment service
//!
//! Direct stock mutation: entries, absolute corrections, and inter-location
//! transfers. Each operation is a single database transaction that locks the
//! product row, rewrites the whole locations map, recomputes the cached
//! total from it, and appends the movement rows that explain the change.
//! Blind increments are never applied; the map is always read then written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{
    apply_location_delta, correction_delta, location_total, round_mass, stock_at,
    validate_location_name, AddStockInput, LocationMap, MovementType, StockMovement,
    StockTransfer, TransferStockInput, TransportDetails, UpdateStockLevelInput,
};

use crate::error::{AppError, AppResult};

/// Service for direct stock mutation
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct StockProductRow {
    id: Uuid,
    name: String,
    locations: Json<LocationMap>,
}

#[derive(Debug, FromRow)]
pub(crate) struct MovementRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub location: String,
    pub change_qty: Decimal,
    pub movement_type: String,
    pub reason: String,
    pub related_invoice_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub transport: Option<Json<TransportDetails>>,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn movement_from_row(row: MovementRow) -> AppResult<StockMovement> {
    let movement_type = MovementType::parse(&row.movement_type).ok_or_else(|| {
        AppError::Internal(format!("Unknown movement type: {}", row.movement_type))
    })?;

    Ok(StockMovement {
        id: row.id,
        product_id: row.product_id,
        product_name: row.product_name,
        location: row.location,
        change_qty: row.change_qty,
        movement_type,
        reason: row.reason,
        related_invoice_id: row.related_invoice_id,
        reference_id: row.reference_id,
        transport: row.transport.map(|transport| transport.0),
        created_at: row.created_at,
    })
}

#[derive(Debug, FromRow)]
struct TransferRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    from_location: String,
    to_location: String,
    quantity: Decimal,
    created_at: DateTime<Utc>,
}

impl From<TransferRow> for StockTransfer {
    fn from(row: TransferRow) -> Self {
        StockTransfer {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            from_location: row.from_location,
            to_location: row.to_location,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a stock entry. The delta may be negative for dashboard-driven
    /// corrections.
    pub async fn add_stock(&self, input: AddStockInput) -> AppResult<StockMovement> {
        let qty = round_mass(
            input
                .quantity
                .parse()
                .map_err(|msg| AppError::field("quantity", msg))?,
        );
        validate_location_name(&input.location)
            .map_err(|msg| AppError::field("location", msg))?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, StockProductRow>(
            "SELECT id, name, locations FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut locations = product.locations.0;
        apply_location_delta(&mut locations, &input.location, qty);
        let total = location_total(&locations);

        sqlx::query(
            r#"
            UPDATE products
            SET locations = $1, stock_qty = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(Json(&locations))
        .bind(total)
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

        let movement = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (product_id, product_name, location, change_qty, movement_type, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_id, product_name, location, change_qty, movement_type,
                      reason, related_invoice_id, reference_id, transport, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&input.location)
        .bind(qty)
        .bind(MovementType::StockEntry.as_str())
        .bind(input.reason.unwrap_or_else(|| "Stock Entry".to_string()))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        movement_from_row(movement)
    }

    /// Set a location to an absolute quantity and log the delta.
    ///
    /// Returns `None` when the target equals the current quantity: a true
    /// no-op writes no movement row.
    pub async fn update_stock_level(
        &self,
        input: UpdateStockLevelInput,
    ) -> AppResult<Option<StockMovement>> {
        let target = round_mass(
            input
                .new_quantity
                .parse()
                .map_err(|msg| AppError::field("new_quantity", msg))?,
        );
        if target < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Stock cannot be negative".to_string(),
            ));
        }
        validate_location_name(&input.location)
            .map_err(|msg| AppError::field("location", msg))?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, StockProductRow>(
            "SELECT id, name, locations FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut locations = product.locations.0;
        let current = stock_at(&locations, &input.location);
        let delta = correction_delta(current, target);

        if delta.is_zero() {
            // Nothing written yet; dropping the transaction rolls it back.
            return Ok(None);
        }

        locations.insert(input.location.clone(), target);
        let total = location_total(&locations);

        sqlx::query(
            r#"
            UPDATE products
            SET locations = $1, stock_qty = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(Json(&locations))
        .bind(total)
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

        let movement = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (product_id, product_name, location, change_qty, movement_type, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_id, product_name, location, change_qty, movement_type,
                      reason, related_invoice_id, reference_id, transport, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&input.location)
        .bind(delta)
        .bind(MovementType::StockCorrection.as_str())
        .bind(input.reason.unwrap_or_else(|| "Stock Correction".to_string()))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        movement_from_row(movement).map(Some)
    }

    /// Move stock between two locations of the same product.
    ///
    /// Requires sufficient stock at the source; there is no negative-stock
    /// override for transfers. The global total is conserved by
    /// construction and still recomputed from the map.
    pub async fn transfer_stock(&self, input: TransferStockInput) -> AppResult<StockTransfer> {
        let qty = round_mass(
            input
                .quantity
                .parse()
                .map_err(|msg| AppError::field("quantity", msg))?,
        );
        if qty <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Transfer quantity must be greater than zero".to_string(),
            ));
        }
        if input.from_location == input.to_location {
            return Err(AppError::ValidationError(
                "Source and destination cannot be the same".to_string(),
            ));
        }
        validate_location_name(&input.from_location)
            .map_err(|msg| AppError::field("from_location", msg))?;
        validate_location_name(&input.to_location)
            .map_err(|msg| AppError::field("to_location", msg))?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, StockProductRow>(
            "SELECT id, name, locations FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut locations = product.locations.0;
        let from_stock = stock_at(&locations, &input.from_location);
        if from_stock < qty {
            return Err(AppError::InsufficientStock(format!(
                "Insufficient stock at {}. Available: {} mts",
                input.from_location, from_stock
            )));
        }

        apply_location_delta(&mut locations, &input.from_location, -qty);
        apply_location_delta(&mut locations, &input.to_location, qty);
        let total = location_total(&locations);

        sqlx::query(
            r#"
            UPDATE products
            SET locations = $1, stock_qty = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(Json(&locations))
        .bind(total)
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

        let transfer = sqlx::query_as::<_, TransferRow>(
            r#"
            INSERT INTO stock_transfers (product_id, product_name, from_location, to_location, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, product_name, from_location, to_location, quantity, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&input.from_location)
        .bind(&input.to_location)
        .bind(qty)
        .fetch_one(&mut *tx)
        .await?;

        // Two ledger legs, both keyed to the transfer record
        sqlx::query(
            r#"
            INSERT INTO stock_movements (product_id, product_name, location, change_qty, movement_type, reason, reference_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&input.from_location)
        .bind(-qty)
        .bind(MovementType::TransferOut.as_str())
        .bind("Transfer Out")
        .bind(transfer.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO stock_movements (product_id, product_name, location, change_qty, movement_type, reason, reference_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&input.to_location)
        .bind(qty)
        .bind(MovementType::TransferIn.as_str())
        .bind("Transfer In")
        .bind(transfer.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transfer.into())
    }

    /// Movement history, newest first, optionally filtered by product.
    pub async fn list_movements(
        &self,
        product_id: Option<Uuid>,
    ) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, product_id, product_name, location, change_qty, movement_type,
                   reason, related_invoice_id, reference_id, transport, created_at
            FROM stock_movements
            WHERE $1::uuid IS NULL OR product_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    /// List all transfers, newest first.
    pub async fn list_transfers(&self) -> AppResult<Vec<StockTransfer>> {
        let rows = sqlx::query_as::<_, TransferRow>(
            r#"
            SELECT id, product_id, product_name, from_location, to_location, quantity, created_at
            FROM stock_transfers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockTransfer::from).collect())
    }
}
