//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger policy flags, passed explicitly into every ledger operation.
///
/// There is deliberately no ambient settings object: the backend
/// materializes one of these from configuration and hands it to the
/// services that need it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerPolicy {
    /// Allow invoice issuance to drive global stock below zero.
    pub allow_negative_stock: bool,
    /// Flat tax rate applied to the product subtotal, in percent.
    pub tax_rate: Decimal,
    /// Round the invoice grand total to a whole amount.
    pub round_off: bool,
    /// When false, the engine always derives the invoice number from the
    /// dispatch location's prefix and counter.
    pub manual_invoice_no: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            allow_negative_stock: false,
            tax_rate: Decimal::from(18),
            round_off: true,
            manual_invoice_no: true,
        }
    }
}
