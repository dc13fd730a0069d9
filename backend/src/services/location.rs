//! Dispatch location registry
//!
//! Locations carry the invoice-number prefix and per-location counter. The
//! number a location would assign next is advisory; the invoice engine's
//! transaction is what enforces uniqueness and advances the counter.

use sqlx::{FromRow, PgPool};

use shared::{Location, LocationType, UpsertLocationInput};

use crate::error::{AppError, AppResult};

/// Service for the dispatch location registry
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct LocationRow {
    name: String,
    location_type: String,
    active: bool,
    invoice_prefix: String,
    next_invoice_number: i64,
}

fn location_from_row(row: LocationRow) -> AppResult<Location> {
    let location_type = LocationType::parse(&row.location_type).ok_or_else(|| {
        AppError::Internal(format!("Unknown location type: {}", row.location_type))
    })?;

    Ok(Location {
        name: row.name,
        location_type,
        active: row.active,
        invoice_prefix: row.invoice_prefix,
        next_invoice_number: row.next_invoice_number,
    })
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List every registered location
    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT name, location_type, active, invoice_prefix, next_invoice_number
            FROM locations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(location_from_row).collect()
    }

    /// Locations eligible for dispatch selection
    pub async fn active_locations(&self) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT name, location_type, active, invoice_prefix, next_invoice_number
            FROM locations
            WHERE active
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(location_from_row).collect()
    }

    /// Register a location or update its registry fields. The counter is
    /// never reset here; it only moves forward, inside invoice issuance.
    pub async fn upsert_location(&self, input: UpsertLocationInput) -> AppResult<Location> {
        if input.name.trim().is_empty() {
            return Err(AppError::field("name", "Location name is required"));
        }

        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (name, location_type, active, invoice_prefix)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE
            SET location_type = EXCLUDED.location_type,
                active = EXCLUDED.active,
                invoice_prefix = EXCLUDED.invoice_prefix
            RETURNING name, location_type, active, invoice_prefix, next_invoice_number
            "#,
        )
        .bind(input.name.trim())
        .bind(input.location_type.as_str())
        .bind(input.active.unwrap_or(true))
        .bind(input.invoice_prefix.unwrap_or_else(|| "INV".to_string()))
        .fetch_one(&self.db)
        .await?;

        location_from_row(row)
    }

    /// The advisory `prefix-counter` number this location would assign next.
    pub async fn propose_invoice_no(&self, name: &str) -> AppResult<String> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT name, location_type, active, invoice_prefix, next_invoice_number
            FROM locations
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        let location = location_from_row(row)?;
        Ok(location.proposed_invoice_no())
    }
}
