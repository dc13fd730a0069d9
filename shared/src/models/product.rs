//! Product and per-location stock models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::ledger::LocationMap;

/// A product in the catalog, with its per-location stock map.
///
/// `stock_qty` is a cached total and must always equal the sum of the
/// `locations` values; only the stock service and the invoice engine
/// mutate either field, and they always recompute the total from the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub hsn: String,
    pub price: Decimal,
    pub stock_qty: Decimal,
    pub locations: LocationMap,
    pub low_stock_threshold: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether total stock has fallen to or below the alert threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_qty <= self.low_stock_threshold
    }
}

/// Input for adding a product to the catalog.
///
/// Stock always starts at zero with an empty locations map; quantities
/// arrive only through stock entries.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    pub hsn: Option<String>,
    pub price: Decimal,
    pub low_stock_threshold: Option<Decimal>,
}

/// Input for editing product master data. Stock fields are not editable
/// here; corrections go through the stock service so they land in the
/// movement ledger.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    pub hsn: Option<String>,
    pub price: Decimal,
    pub low_stock_threshold: Option<Decimal>,
}
