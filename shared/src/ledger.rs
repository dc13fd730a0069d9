//! Ledger arithmetic shared by the stock services and the invoice engine
//!
//! Stock quantities are metric tons held to one decimal place. All rounding
//! happens here, at a single point, so repeated add/subtract cycles cannot
//! drift and every caller agrees on the stored precision.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{ItemSummary, TransportDetails};
use crate::types::LedgerPolicy;

/// Per-location stock map for a product. Keys are location names.
///
/// A `BTreeMap` keeps serialization order stable, which matters for the
/// JSONB column the map round-trips through.
pub type LocationMap = BTreeMap<String, Decimal>;

/// Decimal places for mass quantities (metric tons).
pub const MASS_DECIMALS: u32 = 1;

/// Decimal places for money amounts.
pub const MONEY_DECIMALS: u32 = 2;

/// Round a mass quantity to the ledger precision.
pub fn round_mass(qty: Decimal) -> Decimal {
    qty.round_dp_with_strategy(MASS_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a money amount.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Stock held at one location, zero when the location has no entry yet.
pub fn stock_at(locations: &LocationMap, location: &str) -> Decimal {
    locations.get(location).copied().unwrap_or(Decimal::ZERO)
}

/// Sum of every per-location quantity.
///
/// This is the only valid source for a product's cached `stock_qty`; the
/// cached total is always recomputed from the full map, never adjusted
/// incrementally.
pub fn location_total(locations: &LocationMap) -> Decimal {
    round_mass(locations.values().copied().sum())
}

/// Apply a signed delta to one location of the map and return the new
/// quantity at that location.
pub fn apply_location_delta(
    locations: &mut LocationMap,
    location: &str,
    delta: Decimal,
) -> Decimal {
    let current = stock_at(locations, location);
    let updated = round_mass(current + delta);
    locations.insert(location.to_string(), updated);
    updated
}

/// Delta a stock correction must log to move a location to an absolute
/// target quantity.
pub fn correction_delta(current: Decimal, target: Decimal) -> Decimal {
    round_mass(target - current)
}

/// Monetary breakdown of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Product value only.
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    /// Strictly the product value; transport is never taxed.
    pub taxable_value: Decimal,
}

/// Compute invoice totals from the line snapshot and the ledger policy.
///
/// Transport cost is added to the grand total only when the invoice marks it
/// as extra; either way it stays out of the taxable value.
pub fn compute_invoice_totals(
    lines: &[ItemSummary],
    transport: &TransportDetails,
    policy: &LedgerPolicy,
) -> InvoiceTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.quantity * line.price)
        .sum();
    let subtotal = round_money(subtotal);

    let tax_amount = round_money(subtotal * policy.tax_rate / Decimal::from(100));

    let mut total_amount = subtotal + tax_amount;
    if transport.is_extra {
        total_amount += transport.amount;
    }
    if policy.round_off {
        total_amount =
            total_amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    } else {
        total_amount = round_money(total_amount);
    }

    InvoiceTotals {
        subtotal,
        tax_amount,
        total_amount,
        taxable_value: subtotal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn summary(qty: &str, price: &str) -> ItemSummary {
        ItemSummary {
            product_name: "Caustic Soda".to_string(),
            quantity: dec(qty),
            price: dec(price),
        }
    }

    #[test]
    fn test_round_mass_one_decimal() {
        assert_eq!(round_mass(dec("4.05")), dec("4.1"));
        assert_eq!(round_mass(dec("4.04")), dec("4.0"));
        assert_eq!(round_mass(dec("-4.05")), dec("-4.1"));
    }

    #[test]
    fn test_location_total_sums_map() {
        let mut map = LocationMap::new();
        map.insert("Warehouse A".to_string(), dec("10.0"));
        map.insert("Factory".to_string(), dec("2.5"));
        assert_eq!(location_total(&map), dec("12.5"));
    }

    #[test]
    fn test_apply_delta_missing_location_starts_at_zero() {
        let mut map = LocationMap::new();
        let updated = apply_location_delta(&mut map, "Warehouse B", dec("3.0"));
        assert_eq!(updated, dec("3.0"));
        assert_eq!(stock_at(&map, "Warehouse B"), dec("3.0"));
    }

    #[test]
    fn test_apply_delta_decrement() {
        let mut map = LocationMap::new();
        map.insert("Warehouse A".to_string(), dec("10.0"));
        let updated = apply_location_delta(&mut map, "Warehouse A", dec("-4.0"));
        assert_eq!(updated, dec("6.0"));
        assert_eq!(location_total(&map), dec("6.0"));
    }

    #[test]
    fn test_correction_delta() {
        assert_eq!(correction_delta(dec("3.0"), dec("0")), dec("-3.0"));
        assert_eq!(correction_delta(dec("1.5"), dec("4.0")), dec("2.5"));
    }

    #[test]
    fn test_totals_default_policy() {
        // 4.0 mts at 1000 -> subtotal 4000, tax 18% = 720, total 4720
        let totals = compute_invoice_totals(
            &[summary("4.0", "1000")],
            &TransportDetails::default(),
            &LedgerPolicy::default(),
        );
        assert_eq!(totals.subtotal, dec("4000.00"));
        assert_eq!(totals.tax_amount, dec("720.00"));
        assert_eq!(totals.total_amount, dec("4720"));
        assert_eq!(totals.taxable_value, dec("4000.00"));
    }

    #[test]
    fn test_totals_transport_extra_untaxed() {
        let transport = TransportDetails {
            vehicle_number: "MH12AB1234".to_string(),
            amount: dec("500"),
            mode: "By Road".to_string(),
            is_extra: true,
        };
        let totals = compute_invoice_totals(
            &[summary("1.0", "1000")],
            &transport,
            &LedgerPolicy::default(),
        );
        // tax only on the product value
        assert_eq!(totals.tax_amount, dec("180.00"));
        assert_eq!(totals.total_amount, dec("1680"));
        assert_eq!(totals.taxable_value, dec("1000.00"));
    }

    #[test]
    fn test_totals_transport_included_not_added() {
        let transport = TransportDetails {
            vehicle_number: String::new(),
            amount: dec("500"),
            mode: "By Road".to_string(),
            is_extra: false,
        };
        let totals = compute_invoice_totals(
            &[summary("1.0", "1000")],
            &transport,
            &LedgerPolicy::default(),
        );
        assert_eq!(totals.total_amount, dec("1180"));
    }

    #[test]
    fn test_totals_round_off_disabled() {
        let policy = LedgerPolicy {
            round_off: false,
            ..LedgerPolicy::default()
        };
        let totals = compute_invoice_totals(
            &[summary("0.5", "999")],
            &TransportDetails::default(),
            &policy,
        );
        // 499.50 + 89.91 = 589.41, kept at money precision
        assert_eq!(totals.total_amount, dec("589.41"));
    }
}
