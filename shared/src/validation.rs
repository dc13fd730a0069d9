//! Validation utilities for the ChemStock platform
//!
//! Quantities arrive as either JSON numbers or user-typed strings; the
//! coercion rules here turn both into exact decimals and refuse anything
//! malformed instead of silently reading it as zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity as received over the wire.
///
/// Form posts send strings ("1,250.5"), API clients send numbers; both are
/// accepted and funneled through [`parse_quantity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(Decimal),
    Text(String),
}

impl QuantityInput {
    pub fn parse(&self) -> Result<Decimal, &'static str> {
        match self {
            QuantityInput::Number(value) => Ok(*value),
            QuantityInput::Text(raw) => parse_quantity(raw),
        }
    }
}

impl From<Decimal> for QuantityInput {
    fn from(value: Decimal) -> Self {
        QuantityInput::Number(value)
    }
}

/// Coerce a user-entered quantity string to a decimal.
///
/// Thousands separators are stripped. An empty string, more than one decimal
/// point, or any other malformed input is a validation error.
pub fn parse_quantity(raw: &str) -> Result<Decimal, &'static str> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err("Quantity is required");
    }
    if cleaned.matches('.').count() > 1 {
        return Err("Invalid numeric quantity");
    }
    Decimal::from_str(&cleaned).map_err(|_| "Invalid numeric quantity")
}

/// Validate a location name is present.
pub fn validate_location_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Location is required");
    }
    Ok(())
}

/// Validate an invoice number is present.
pub fn validate_invoice_no(invoice_no: &str) -> Result<(), &'static str> {
    if invoice_no.trim().is_empty() {
        return Err("Invoice number is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain_quantity() {
        assert_eq!(parse_quantity("4.5"), Ok(dec("4.5")));
        assert_eq!(parse_quantity("0"), Ok(dec("0")));
    }

    #[test]
    fn test_parse_strips_thousands_separators() {
        assert_eq!(parse_quantity("1,250.5"), Ok(dec("1250.5")));
        assert_eq!(parse_quantity("12,34"), Ok(dec("1234")));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_quantity("  7.0  "), Ok(dec("7.0")));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_multiple_decimal_points() {
        assert!(parse_quantity("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("4.5mts").is_err());
    }

    #[test]
    fn test_parse_keeps_sign() {
        // Sign policy belongs to the caller; a correction delta may be negative.
        assert_eq!(parse_quantity("-3.5"), Ok(dec("-3.5")));
    }

    #[test]
    fn test_quantity_input_number_and_text_agree() {
        let from_number = QuantityInput::Number(dec("9.5")).parse();
        let from_text = QuantityInput::Text("9.5".to_string()).parse();
        assert_eq!(from_number, from_text);
    }

    #[test]
    fn test_validate_location_name() {
        assert!(validate_location_name("Warehouse A").is_ok());
        assert!(validate_location_name(" ").is_err());
    }

    #[test]
    fn test_validate_invoice_no() {
        assert!(validate_invoice_no("INV-100").is_ok());
        assert!(validate_invoice_no("").is_err());
    }
}
