//! Dispatch location registry models

use serde::{Deserialize, Serialize};

/// Kinds of stock-holding sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Warehouse,
    Plant,
    Yard,
    Store,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Warehouse => "warehouse",
            LocationType::Plant => "plant",
            LocationType::Yard => "yard",
            LocationType::Store => "store",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warehouse" => Some(LocationType::Warehouse),
            "plant" => Some(LocationType::Plant),
            "yard" => Some(LocationType::Yard),
            "store" => Some(LocationType::Store),
            _ => None,
        }
    }
}

/// A dispatch location. The name doubles as the key of every product's
/// per-location stock map, so it is unique and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub location_type: LocationType,
    /// Inactive locations are excluded from dispatch selection.
    pub active: bool,
    pub invoice_prefix: String,
    /// Per-location monotonic counter feeding the `prefix-counter` proposal.
    pub next_invoice_number: i64,
}

impl Location {
    /// The advisory invoice number this location would assign next.
    pub fn proposed_invoice_no(&self) -> String {
        format!("{}-{}", self.invoice_prefix, self.next_invoice_number)
    }
}

/// Input for registering or editing a location.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertLocationInput {
    pub name: String,
    pub location_type: LocationType,
    pub active: Option<bool>,
    pub invoice_prefix: Option<String>,
}
