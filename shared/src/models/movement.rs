//! Stock movement ledger and transfer models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::QuantityInput;

use super::TransportDetails;

/// Why a quantity changed. Stored as the ledger's type tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementType {
    #[serde(rename = "INVOICE")]
    Invoice,
    #[serde(rename = "Transfer In")]
    TransferIn,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    #[serde(rename = "Stock Entry")]
    StockEntry,
    #[serde(rename = "Stock Correction")]
    StockCorrection,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Invoice => "INVOICE",
            MovementType::TransferIn => "Transfer In",
            MovementType::TransferOut => "Transfer Out",
            MovementType::StockEntry => "Stock Entry",
            MovementType::StockCorrection => "Stock Correction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INVOICE" => Some(MovementType::Invoice),
            "Transfer In" => Some(MovementType::TransferIn),
            "Transfer Out" => Some(MovementType::TransferOut),
            "Stock Entry" => Some(MovementType::StockEntry),
            "Stock Correction" => Some(MovementType::StockCorrection),
            _ => None,
        }
    }
}

/// One append-only ledger entry. Movements are never updated or deleted;
/// together they exhaustively explain every change to a product's
/// per-location stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub location: String,
    /// Signed delta applied to the location.
    pub change_qty: Decimal,
    pub movement_type: MovementType,
    pub reason: String,
    pub related_invoice_id: Option<Uuid>,
    /// Transfer id when the movement is one leg of a transfer.
    pub reference_id: Option<Uuid>,
    /// The invoice's transport snapshot on INVOICE movements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportDetails>,
    pub created_at: DateTime<Utc>,
}

/// A completed inter-location transfer, paired with its two movement legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransfer {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub from_location: String,
    pub to_location: String,
    pub quantity: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for a stock entry. The delta may be negative for dashboard-driven
/// corrections.
#[derive(Debug, Clone, Deserialize)]
pub struct AddStockInput {
    pub product_id: Uuid,
    pub location: String,
    pub quantity: QuantityInput,
    pub reason: Option<String>,
}

/// Input for setting a location to an absolute quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockLevelInput {
    pub product_id: Uuid,
    pub location: String,
    pub new_quantity: QuantityInput,
    pub reason: Option<String>,
}

/// Input for an inter-location transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferStockInput {
    pub product_id: Uuid,
    pub from_location: String,
    pub to_location: String,
    pub quantity: QuantityInput,
}
