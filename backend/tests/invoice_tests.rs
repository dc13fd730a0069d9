//! Invoice issuance tests
//!
//! Tests for the invoice engine including:
//! - Monetary totals (tax, transport, round-off)
//! - Invoice numbering
//! - Line snapshot consistency

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    compute_invoice_totals, parse_quantity, round_money, ItemSummary, LedgerPolicy, Location,
    LocationType, TransportDetails,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn summary(name: &str, qty: &str, price: &str) -> ItemSummary {
    ItemSummary {
        product_name: name.to_string(),
        quantity: dec(qty),
        price: dec(price),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Tax applies to the product subtotal at the policy rate
    #[test]
    fn test_default_tax_rate() {
        let totals = compute_invoice_totals(
            &[summary("Caustic Soda", "4.0", "1000")],
            &TransportDetails::default(),
            &LedgerPolicy::default(),
        );

        assert_eq!(totals.subtotal, dec("4000.00"));
        assert_eq!(totals.tax_amount, dec("720.00"));
        assert_eq!(totals.total_amount, dec("4720"));
    }

    /// Custom tax rate flows through the policy
    #[test]
    fn test_custom_tax_rate() {
        let policy = LedgerPolicy {
            tax_rate: dec("5"),
            ..LedgerPolicy::default()
        };
        let totals = compute_invoice_totals(
            &[summary("Soda Ash", "2.0", "500")],
            &TransportDetails::default(),
            &policy,
        );

        assert_eq!(totals.tax_amount, dec("50.00"));
        assert_eq!(totals.total_amount, dec("1050"));
    }

    /// Transport marked extra is added to the total but never taxed
    #[test]
    fn test_transport_extra_untaxed() {
        let transport = TransportDetails {
            vehicle_number: "MH12AB1234".to_string(),
            amount: dec("750"),
            mode: "By Road".to_string(),
            is_extra: true,
        };
        let totals = compute_invoice_totals(
            &[summary("Caustic Soda", "1.0", "1000")],
            &transport,
            &LedgerPolicy::default(),
        );

        assert_eq!(totals.taxable_value, dec("1000.00"));
        assert_eq!(totals.tax_amount, dec("180.00"));
        assert_eq!(totals.total_amount, dec("1930"));
    }

    /// Transport included in the product price changes nothing
    #[test]
    fn test_transport_included_ignored() {
        let transport = TransportDetails {
            vehicle_number: "MH12AB1234".to_string(),
            amount: dec("750"),
            mode: "By Road".to_string(),
            is_extra: false,
        };
        let totals = compute_invoice_totals(
            &[summary("Caustic Soda", "1.0", "1000")],
            &transport,
            &LedgerPolicy::default(),
        );

        assert_eq!(totals.total_amount, dec("1180"));
    }

    /// Round-off keeps the grand total at whole currency units
    #[test]
    fn test_round_off_to_whole_units() {
        let totals = compute_invoice_totals(
            &[summary("HCl 33%", "0.5", "999")],
            &TransportDetails::default(),
            &LedgerPolicy::default(),
        );

        // 499.50 + 89.91 = 589.41 -> 589
        assert_eq!(totals.total_amount, dec("589"));
    }

    /// Disabling round-off keeps the exact money amount
    #[test]
    fn test_round_off_disabled() {
        let policy = LedgerPolicy {
            round_off: false,
            ..LedgerPolicy::default()
        };
        let totals = compute_invoice_totals(
            &[summary("HCl 33%", "0.5", "999")],
            &TransportDetails::default(),
            &policy,
        );

        assert_eq!(totals.total_amount, dec("589.41"));
    }

    /// Zero-quantity lines contribute nothing but stay in the snapshot
    #[test]
    fn test_zero_quantity_line() {
        let lines = [
            summary("Caustic Soda", "2.0", "1000"),
            summary("Soda Ash", "0", "500"),
        ];
        let totals =
            compute_invoice_totals(&lines, &TransportDetails::default(), &LedgerPolicy::default());

        assert_eq!(totals.subtotal, dec("2000.00"));
        assert_eq!(lines.len(), 2);
    }

    /// Empty invoice totals are all zero
    #[test]
    fn test_empty_lines() {
        let totals = compute_invoice_totals(
            &[],
            &TransportDetails::default(),
            &LedgerPolicy::default(),
        );

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    /// Proposed invoice numbers follow `prefix-counter`
    #[test]
    fn test_proposed_invoice_number_format() {
        let location = Location {
            name: "Warehouse A".to_string(),
            location_type: LocationType::Warehouse,
            active: true,
            invoice_prefix: "INV".to_string(),
            next_invoice_number: 42,
        };

        assert_eq!(location.proposed_invoice_no(), "INV-42");
    }

    /// A fresh location proposes number 1
    #[test]
    fn test_proposed_invoice_number_starts_at_one() {
        let location = Location {
            name: "Store Front".to_string(),
            location_type: LocationType::Store,
            active: true,
            invoice_prefix: "SF".to_string(),
            next_invoice_number: 1,
        };

        assert_eq!(location.proposed_invoice_no(), "SF-1");
    }

    /// Quantities typed with thousands separators parse exactly
    #[test]
    fn test_line_quantity_coercion() {
        assert_eq!(parse_quantity("1,250.5"), Ok(dec("1250.5")));
        assert!(parse_quantity("four").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for line quantities at ledger precision (0.1 to 1000.0 mts)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for unit prices (0.01 to 100000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn line_strategy() -> impl Strategy<Value = ItemSummary> {
        (quantity_strategy(), price_strategy()).prop_map(|(quantity, price)| ItemSummary {
            product_name: "Caustic Soda".to_string(),
            quantity,
            price,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Subtotal equals the rounded sum of quantity * price over all lines
        #[test]
        fn prop_subtotal_is_line_sum(
            lines in prop::collection::vec(line_strategy(), 1..10)
        ) {
            let totals = compute_invoice_totals(
                &lines,
                &TransportDetails::default(),
                &LedgerPolicy::default(),
            );

            let expected: Decimal = lines.iter().map(|l| l.quantity * l.price).sum();
            prop_assert_eq!(totals.subtotal, round_money(expected));
        }

        /// Taxable value never includes transport
        #[test]
        fn prop_taxable_value_is_subtotal(
            lines in prop::collection::vec(line_strategy(), 1..10),
            transport_amount in price_strategy(),
            is_extra in any::<bool>()
        ) {
            let transport = TransportDetails {
                vehicle_number: String::new(),
                amount: transport_amount,
                mode: "By Road".to_string(),
                is_extra,
            };
            let totals = compute_invoice_totals(&lines, &transport, &LedgerPolicy::default());

            prop_assert_eq!(totals.taxable_value, totals.subtotal);
        }

        /// Tax is always the policy rate applied to the subtotal
        #[test]
        fn prop_tax_from_subtotal(
            lines in prop::collection::vec(line_strategy(), 1..10)
        ) {
            let policy = LedgerPolicy::default();
            let totals = compute_invoice_totals(&lines, &TransportDetails::default(), &policy);

            let expected = round_money(totals.subtotal * policy.tax_rate / dec("100"));
            prop_assert_eq!(totals.tax_amount, expected);
        }

        /// With round-off enabled the grand total has no fractional part
        #[test]
        fn prop_round_off_yields_whole_total(
            lines in prop::collection::vec(line_strategy(), 1..10)
        ) {
            let totals = compute_invoice_totals(
                &lines,
                &TransportDetails::default(),
                &LedgerPolicy::default(),
            );

            prop_assert_eq!(totals.total_amount, totals.total_amount.trunc());
        }

        /// Extra transport raises the pre-rounding total by exactly its amount
        #[test]
        fn prop_extra_transport_additive(
            lines in prop::collection::vec(line_strategy(), 1..10),
            transport_amount in price_strategy()
        ) {
            let policy = LedgerPolicy {
                round_off: false,
                ..LedgerPolicy::default()
            };
            let without = compute_invoice_totals(&lines, &TransportDetails::default(), &policy);
            let transport = TransportDetails {
                vehicle_number: String::new(),
                amount: transport_amount,
                mode: "By Road".to_string(),
                is_extra: true,
            };
            let with = compute_invoice_totals(&lines, &transport, &policy);

            prop_assert_eq!(with.total_amount, round_money(without.total_amount + transport_amount));
        }

        /// Totals are deterministic for the same inputs
        #[test]
        fn prop_totals_deterministic(
            lines in prop::collection::vec(line_strategy(), 1..10)
        ) {
            let first = compute_invoice_totals(
                &lines,
                &TransportDetails::default(),
                &LedgerPolicy::default(),
            );
            let second = compute_invoice_totals(
                &lines,
                &TransportDetails::default(),
                &LedgerPolicy::default(),
            );

            prop_assert_eq!(first, second);
        }

        /// Proposed numbers always carry the prefix and counter
        #[test]
        fn prop_invoice_number_format(counter in 1i64..1_000_000) {
            let location = Location {
                name: "Warehouse A".to_string(),
                location_type: LocationType::Warehouse,
                active: true,
                invoice_prefix: "INV".to_string(),
                next_invoice_number: counter,
            };
            let proposed = location.proposed_invoice_no();

            prop_assert!(proposed.starts_with("INV-"));
            prop_assert_eq!(proposed["INV-".len()..].parse::<i64>().unwrap(), counter);
        }
    }
}
