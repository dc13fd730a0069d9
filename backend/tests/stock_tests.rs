//! Stock ledger tests
//!
//! Tests for per-location stock arithmetic including:
//! - Location map deltas and the cached total
//! - Transfer conservation
//! - Stock correction deltas
//! - Quantity coercion

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    apply_location_delta, correction_delta, location_total, parse_quantity, round_mass, stock_at,
    LocationMap, MovementType, QuantityInput, StockMovement, TransportDetails,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn map(entries: &[(&str, &str)]) -> LocationMap {
    entries
        .iter()
        .map(|(name, qty)| (name.to_string(), dec(qty)))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A stock entry adds to one location and the total follows
    #[test]
    fn test_stock_entry_increments_location() {
        let mut locations = map(&[("Warehouse A", "10.0"), ("Factory", "2.5")]);

        let updated = apply_location_delta(&mut locations, "Warehouse A", dec("4.0"));

        assert_eq!(updated, dec("14.0"));
        assert_eq!(location_total(&locations), dec("16.5"));
    }

    /// Entries into an unknown location create it at the delta
    #[test]
    fn test_stock_entry_new_location() {
        let mut locations = LocationMap::new();

        apply_location_delta(&mut locations, "Warehouse B", dec("3.5"));

        assert_eq!(stock_at(&locations, "Warehouse B"), dec("3.5"));
        assert_eq!(location_total(&locations), dec("3.5"));
    }

    /// Quantities are held to one decimal place
    #[test]
    fn test_mass_precision() {
        let mut locations = map(&[("Warehouse A", "1.0")]);

        let updated = apply_location_delta(&mut locations, "Warehouse A", dec("0.25"));

        // midpoint rounds away from zero
        assert_eq!(updated, dec("1.3"));
    }

    /// A transfer moves quantity between locations without changing the total
    #[test]
    fn test_transfer_conserves_total() {
        let mut locations = map(&[("Warehouse A", "10.0"), ("Store Front", "1.0")]);
        let before = location_total(&locations);

        apply_location_delta(&mut locations, "Warehouse A", dec("-4.0"));
        apply_location_delta(&mut locations, "Store Front", dec("4.0"));

        assert_eq!(location_total(&locations), before);
        assert_eq!(stock_at(&locations, "Warehouse A"), dec("6.0"));
        assert_eq!(stock_at(&locations, "Store Front"), dec("5.0"));
    }

    /// Insufficient stock at the source is detectable before moving anything
    #[test]
    fn test_transfer_insufficient_source() {
        let locations = map(&[("Warehouse A", "3.0")]);
        let requested = dec("4.0");

        let available = stock_at(&locations, "Warehouse A");
        assert!(available < requested);
    }

    /// A correction logs exactly the delta that reaches the target
    #[test]
    fn test_correction_delta_reaches_target() {
        let mut locations = map(&[("Factory", "7.5")]);

        let delta = correction_delta(stock_at(&locations, "Factory"), dec("5.0"));
        apply_location_delta(&mut locations, "Factory", delta);

        assert_eq!(delta, dec("-2.5"));
        assert_eq!(stock_at(&locations, "Factory"), dec("5.0"));
    }

    /// Correcting to the current quantity is a no-op delta
    #[test]
    fn test_correction_delta_zero() {
        assert_eq!(correction_delta(dec("4.0"), dec("4.0")), Decimal::ZERO);
    }

    /// Correcting an empty location to a target starts from zero
    #[test]
    fn test_correction_from_empty_location() {
        let locations = LocationMap::new();
        let delta = correction_delta(stock_at(&locations, "Yard"), dec("6.0"));

        assert_eq!(delta, dec("6.0"));
    }

    /// Number and string quantity inputs coerce to the same value
    #[test]
    fn test_quantity_input_coercion() {
        let from_number = QuantityInput::Number(dec("12.5")).parse();
        let from_text = QuantityInput::Text(" 12.5 ".to_string()).parse();

        assert_eq!(from_number, from_text);
        assert!(QuantityInput::Text("12.5.0".to_string()).parse().is_err());
    }

    /// Invoice movements carry the invoice's transport snapshot; direct
    /// stock adjustments have none
    #[test]
    fn test_movement_transport_snapshot() {
        use chrono::Utc;
        use uuid::Uuid;

        let movement = |movement_type, transport| StockMovement {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Caustic Soda".to_string(),
            location: "Warehouse A".to_string(),
            change_qty: dec("-4.0"),
            movement_type,
            reason: "Invoice #INV-7".to_string(),
            related_invoice_id: Some(Uuid::new_v4()),
            reference_id: None,
            transport,
            created_at: Utc::now(),
        };

        let transport = TransportDetails {
            vehicle_number: "MH12AB1234".to_string(),
            amount: dec("500"),
            mode: "By Road".to_string(),
            is_extra: true,
        };

        let invoice_leg = movement(MovementType::Invoice, Some(transport.clone()));
        let serialized = serde_json::to_value(&invoice_leg).unwrap();
        assert_eq!(
            serialized["transport"]["vehicle_number"],
            serde_json::json!("MH12AB1234")
        );

        let entry = movement(MovementType::StockEntry, None);
        let serialized = serde_json::to_value(&entry).unwrap();
        assert!(serialized.get("transport").is_none());
    }

    /// Movement type tags survive the text round-trip
    #[test]
    fn test_movement_type_tags() {
        let types = [
            MovementType::Invoice,
            MovementType::TransferIn,
            MovementType::TransferOut,
            MovementType::StockEntry,
            MovementType::StockCorrection,
        ];

        for movement_type in types {
            assert_eq!(MovementType::parse(movement_type.as_str()), Some(movement_type));
        }
        assert_eq!(MovementType::parse("Adjustment"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for quantities at ledger precision (0.1 to 1000.0 mts)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for signed deltas at ledger precision
    fn delta_strategy() -> impl Strategy<Value = Decimal> {
        (-10000i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    fn location_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("Warehouse A"),
            Just("Warehouse B"),
            Just("Store Front"),
            Just("Factory"),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The cached total always equals the sum of the map
        #[test]
        fn prop_total_is_map_sum(
            deltas in prop::collection::vec((location_strategy(), delta_strategy()), 1..30)
        ) {
            let mut locations = LocationMap::new();
            for (location, delta) in &deltas {
                apply_location_delta(&mut locations, location, *delta);
            }

            let sum: Decimal = locations.values().copied().sum();
            prop_assert_eq!(location_total(&locations), round_mass(sum));
        }

        /// Applying a delta then its negation restores the location
        #[test]
        fn prop_delta_reversible(
            initial in quantity_strategy(),
            delta in delta_strategy()
        ) {
            let mut locations = map(&[("Warehouse A", "0.0")]);
            locations.insert("Warehouse A".to_string(), initial);

            apply_location_delta(&mut locations, "Warehouse A", delta);
            apply_location_delta(&mut locations, "Warehouse A", -delta);

            prop_assert_eq!(stock_at(&locations, "Warehouse A"), initial);
        }

        /// Transfers conserve the product total
        #[test]
        fn prop_transfer_conservation(
            source_stock in quantity_strategy(),
            quantity in quantity_strategy()
        ) {
            prop_assume!(quantity <= source_stock);
            let mut locations = LocationMap::new();
            locations.insert("Warehouse A".to_string(), source_stock);
            let before = location_total(&locations);

            apply_location_delta(&mut locations, "Warehouse A", -quantity);
            apply_location_delta(&mut locations, "Store Front", quantity);

            prop_assert_eq!(location_total(&locations), before);
            prop_assert!(stock_at(&locations, "Warehouse A") >= Decimal::ZERO);
        }

        /// A correction delta always lands the location on its target
        #[test]
        fn prop_correction_lands_on_target(
            current in quantity_strategy(),
            target in quantity_strategy()
        ) {
            let mut locations = LocationMap::new();
            locations.insert("Factory".to_string(), current);

            let delta = correction_delta(current, target);
            apply_location_delta(&mut locations, "Factory", delta);

            prop_assert_eq!(stock_at(&locations, "Factory"), target);
        }

        /// Rounding is idempotent at ledger precision
        #[test]
        fn prop_round_mass_idempotent(quantity in delta_strategy()) {
            prop_assert_eq!(round_mass(quantity), round_mass(round_mass(quantity)));
        }

        /// Text and number inputs agree for any ledger-precision quantity
        #[test]
        fn prop_quantity_coercion_agrees(quantity in quantity_strategy()) {
            let from_number = QuantityInput::Number(quantity).parse().unwrap();
            let from_text = QuantityInput::Text(quantity.to_string()).parse().unwrap();

            prop_assert_eq!(from_number, from_text);
        }

        /// parse_quantity ignores thousands separators, never the value
        #[test]
        fn prop_parse_strips_separators(n in 1i64..1_000_000) {
            let quantity = Decimal::from(n);
            let grouped = format!("{n}")
                .as_bytes()
                .rchunks(3)
                .rev()
                .map(|chunk| std::str::from_utf8(chunk).unwrap())
                .collect::<Vec<_>>()
                .join(",");

            prop_assert_eq!(parse_quantity(&grouped), Ok(quantity));
        }
    }
}
