//! Stock ledger tests
//!
//! Exercises the quantity, status, and movement rules through pure
//! simulations of the service transitions:
//! - quantity is never negative after any operation sequence
//! - status always equals the classifier output
//! - every quantity change emits exactly one consistent movement

use proptest::prelude::*;
use shared::models::{classify_status, MovementType, StockStatus, DEFAULT_MIN_QUANTITY};
use shared::validation::validate_item_name;

/// Pure mirror of a stock item's ledger state.
#[derive(Debug, Clone)]
struct LedgerItem {
    quantity: i32,
    total_added: i32,
    issued: i32,
    min_quantity: i32,
    status: StockStatus,
}

#[derive(Debug, Clone)]
struct LedgerMovement {
    movement_type: MovementType,
    quantity_delta: i32,
    previous_quantity: i32,
    new_quantity: i32,
}

#[derive(Debug, Clone)]
struct Ledger {
    item: LedgerItem,
    movements: Vec<LedgerMovement>,
}

#[derive(Debug, Clone, PartialEq)]
enum LedgerError {
    Validation,
    InsufficientStock { available: i32 },
}

/// Mirror of `StockService::add_item`.
fn add_item(name: &str, quantity: i32, min_quantity: Option<i32>) -> Result<Ledger, LedgerError> {
    if validate_item_name(name).is_err() {
        return Err(LedgerError::Validation);
    }
    if quantity < 0 {
        return Err(LedgerError::Validation);
    }
    let min_quantity = min_quantity.unwrap_or(DEFAULT_MIN_QUANTITY);
    if min_quantity < 0 {
        return Err(LedgerError::Validation);
    }

    Ok(Ledger {
        item: LedgerItem {
            quantity,
            total_added: quantity,
            issued: 0,
            min_quantity,
            status: classify_status(quantity, min_quantity),
        },
        movements: vec![LedgerMovement {
            movement_type: MovementType::Added,
            quantity_delta: quantity,
            previous_quantity: 0,
            new_quantity: quantity,
        }],
    })
}

/// Mirror of `StockService::issue_item`.
fn issue(ledger: &mut Ledger, quantity: i32) -> Result<(), LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::Validation);
    }
    let current = ledger.item.quantity;
    if quantity > current {
        return Err(LedgerError::InsufficientStock { available: current });
    }

    let new_quantity = current - quantity;
    ledger.item.quantity = new_quantity;
    ledger.item.issued += quantity;
    ledger.item.status = classify_status(new_quantity, ledger.item.min_quantity);
    ledger.movements.push(LedgerMovement {
        movement_type: MovementType::Issued,
        quantity_delta: -quantity,
        previous_quantity: current,
        new_quantity,
    });
    Ok(())
}

/// Mirror of `StockService::return_item`. Leaves `issued` unchanged.
fn return_stock(ledger: &mut Ledger, quantity: i32) -> Result<(), LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::Validation);
    }
    let current = ledger.item.quantity;
    let new_quantity = current + quantity;
    ledger.item.quantity = new_quantity;
    ledger.item.total_added += quantity;
    ledger.item.status = classify_status(new_quantity, ledger.item.min_quantity);
    ledger.movements.push(LedgerMovement {
        movement_type: MovementType::Returned,
        quantity_delta: quantity,
        previous_quantity: current,
        new_quantity,
    });
    Ok(())
}

/// Mirror of the direct quantity override in `StockService::update_item`.
/// Bypasses the movement log.
fn override_quantity(ledger: &mut Ledger, quantity: i32) -> Result<(), LedgerError> {
    if quantity < 0 {
        return Err(LedgerError::Validation);
    }
    ledger.item.quantity = quantity;
    ledger.item.status = classify_status(quantity, ledger.item.min_quantity);
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// addItem("Shirt", 100, min 10): in stock with one added movement
    #[test]
    fn test_add_item_scenario() {
        let ledger = add_item("Shirt", 100, Some(10)).unwrap();

        assert_eq!(ledger.item.quantity, 100);
        assert_eq!(ledger.item.total_added, 100);
        assert_eq!(ledger.item.issued, 0);
        assert_eq!(ledger.item.status, StockStatus::InStock);
        assert_eq!(ledger.movements.len(), 1);

        let movement = &ledger.movements[0];
        assert_eq!(movement.movement_type, MovementType::Added);
        assert_eq!(movement.previous_quantity, 0);
        assert_eq!(movement.new_quantity, 100);
    }

    /// Issuing 95 of 100 with threshold 10 lands in low stock
    #[test]
    fn test_issue_into_low_stock() {
        let mut ledger = add_item("Shirt", 100, Some(10)).unwrap();
        issue(&mut ledger, 95).unwrap();

        assert_eq!(ledger.item.quantity, 5);
        assert_eq!(ledger.item.issued, 95);
        assert_eq!(ledger.item.status, StockStatus::LowStock);

        let movement = ledger.movements.last().unwrap();
        assert_eq!(movement.movement_type, MovementType::Issued);
        assert_eq!(movement.quantity_delta, -95);
        assert_eq!(movement.previous_quantity, 100);
        assert_eq!(movement.new_quantity, 5);
    }

    /// Over-issuing fails with the available quantity and changes nothing
    #[test]
    fn test_issue_insufficient_stock() {
        let mut ledger = add_item("Shirt", 100, Some(10)).unwrap();
        issue(&mut ledger, 95).unwrap();

        let result = issue(&mut ledger, 200);
        assert_eq!(result, Err(LedgerError::InsufficientStock { available: 5 }));

        assert_eq!(ledger.item.quantity, 5);
        assert_eq!(ledger.movements.len(), 2);
    }

    /// Returning stock leaves the cumulative issued counter unchanged
    #[test]
    fn test_return_does_not_decrement_issued() {
        let mut ledger = add_item("Shirt", 35, Some(10)).unwrap();
        issue(&mut ledger, 30).unwrap();
        assert_eq!(ledger.item.quantity, 5);
        assert_eq!(ledger.item.issued, 30);

        return_stock(&mut ledger, 50).unwrap();

        assert_eq!(ledger.item.quantity, 55);
        assert_eq!(ledger.item.issued, 30);
        assert_eq!(ledger.item.total_added, 85);
        assert_eq!(ledger.item.status, StockStatus::InStock);

        let movement = ledger.movements.last().unwrap();
        assert_eq!(movement.movement_type, MovementType::Returned);
        assert_eq!(movement.previous_quantity, 5);
        assert_eq!(movement.new_quantity, 55);
    }

    /// addItem(q) then issue(q) empties the item with exactly two movements
    #[test]
    fn test_add_then_issue_all() {
        let mut ledger = add_item("Chalk", 40, None).unwrap();
        issue(&mut ledger, 40).unwrap();

        assert_eq!(ledger.item.quantity, 0);
        assert_eq!(ledger.item.status, StockStatus::OutOfStock);
        assert_eq!(ledger.movements.len(), 2);
    }

    /// Issuing the same amount twice decrements twice
    #[test]
    fn test_issue_is_not_idempotent() {
        let mut ledger = add_item("Notebook", 50, None).unwrap();
        issue(&mut ledger, 10).unwrap();
        issue(&mut ledger, 10).unwrap();

        assert_eq!(ledger.item.quantity, 30);
        assert_eq!(ledger.item.issued, 20);
        assert_eq!(ledger.movements.len(), 3);
    }

    #[test]
    fn test_default_min_quantity_applied() {
        let ledger = add_item("Eraser", 5, None).unwrap();
        assert_eq!(ledger.item.min_quantity, DEFAULT_MIN_QUANTITY);
        assert_eq!(ledger.item.status, StockStatus::LowStock);
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        assert_eq!(add_item("", 10, None).unwrap_err(), LedgerError::Validation);
        assert_eq!(add_item("Pen", -1, None).unwrap_err(), LedgerError::Validation);
        assert_eq!(
            add_item("Pen", 10, Some(-1)).unwrap_err(),
            LedgerError::Validation
        );
    }

    #[test]
    fn test_issue_rejects_non_positive_quantity() {
        let mut ledger = add_item("Pen", 10, None).unwrap();
        assert_eq!(issue(&mut ledger, 0), Err(LedgerError::Validation));
        assert_eq!(issue(&mut ledger, -5), Err(LedgerError::Validation));
        assert_eq!(ledger.movements.len(), 1);
    }

    #[test]
    fn test_issue_to_zero_is_allowed() {
        let mut ledger = add_item("Pen", 1, None).unwrap();
        issue(&mut ledger, 1).unwrap();
        assert_eq!(ledger.item.quantity, 0);
        assert_eq!(ledger.item.status, StockStatus::OutOfStock);
    }

    /// Quantity overrides recompute status but write no movement
    #[test]
    fn test_override_bypasses_movement_log() {
        let mut ledger = add_item("Glue", 20, Some(10)).unwrap();
        override_quantity(&mut ledger, 3).unwrap();

        assert_eq!(ledger.item.quantity, 3);
        assert_eq!(ledger.item.status, StockStatus::LowStock);
        assert_eq!(ledger.movements.len(), 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        Issue(i32),
        Return(i32),
        Override(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i32..=50).prop_map(Op::Issue),
            (1i32..=50).prop_map(Op::Return),
            (0i32..=100).prop_map(Op::Override),
        ]
    }

    fn audited_op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i32..=50).prop_map(Op::Issue),
            (1i32..=50).prop_map(Op::Return),
        ]
    }

    fn apply(ledger: &mut Ledger, op: &Op) -> Result<(), LedgerError> {
        match op {
            Op::Issue(q) => issue(ledger, *q),
            Op::Return(q) => return_stock(ledger, *q),
            Op::Override(q) => override_quantity(ledger, *q),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Quantity stays non-negative and status matches the classifier
        /// after any sequence of operations.
        #[test]
        fn prop_quantity_never_negative(
            initial in 0i32..=100,
            min_quantity in 0i32..=20,
            ops in prop::collection::vec(op_strategy(), 0..30)
        ) {
            let mut ledger = add_item("Item", initial, Some(min_quantity)).unwrap();

            for op in &ops {
                // Failed operations must not change state, successful ones
                // must uphold the invariants.
                let _ = apply(&mut ledger, op);
                prop_assert!(ledger.item.quantity >= 0);
                prop_assert_eq!(
                    ledger.item.status,
                    classify_status(ledger.item.quantity, ledger.item.min_quantity)
                );
            }
        }

        /// Every movement is internally consistent and chains onto the
        /// previous one.
        #[test]
        fn prop_movement_chain_consistent(
            initial in 0i32..=100,
            ops in prop::collection::vec(audited_op_strategy(), 0..30)
        ) {
            let mut ledger = add_item("Item", initial, None).unwrap();
            for op in &ops {
                let before = ledger.item.quantity;
                let count_before = ledger.movements.len();
                if apply(&mut ledger, op).is_ok() {
                    // Exactly one movement per successful quantity change,
                    // anchored at the pre-operation quantity.
                    prop_assert_eq!(ledger.movements.len(), count_before + 1);
                    let movement = ledger.movements.last().unwrap();
                    prop_assert_eq!(movement.previous_quantity, before);
                    prop_assert_eq!(
                        movement.new_quantity,
                        movement.previous_quantity + movement.quantity_delta
                    );
                } else {
                    prop_assert_eq!(ledger.movements.len(), count_before);
                    prop_assert_eq!(ledger.item.quantity, before);
                }
            }
        }

        /// Without overrides, replaying the movement log reconstructs the
        /// current quantity exactly.
        #[test]
        fn prop_movement_replay_reconstructs_quantity(
            initial in 0i32..=100,
            ops in prop::collection::vec(audited_op_strategy(), 0..30)
        ) {
            let mut ledger = add_item("Item", initial, None).unwrap();
            for op in &ops {
                let _ = apply(&mut ledger, op);
            }

            let replayed: i32 = ledger.movements.iter().map(|m| m.quantity_delta).sum();
            prop_assert_eq!(replayed, ledger.item.quantity);
        }

        /// Cumulative counters never decrease.
        #[test]
        fn prop_counters_monotonic(
            initial in 0i32..=100,
            ops in prop::collection::vec(op_strategy(), 0..30)
        ) {
            let mut ledger = add_item("Item", initial, None).unwrap();
            for op in &ops {
                let issued_before = ledger.item.issued;
                let added_before = ledger.item.total_added;
                let _ = apply(&mut ledger, op);
                prop_assert!(ledger.item.issued >= issued_before);
                prop_assert!(ledger.item.total_added >= added_before);
            }
        }

        /// The classifier is total and consistent with its thresholds.
        #[test]
        fn prop_classifier_boundaries(quantity in 0i32..=1000, min_quantity in 0i32..=100) {
            let status = classify_status(quantity, min_quantity);
            if quantity == 0 {
                prop_assert_eq!(status, StockStatus::OutOfStock);
            } else if quantity <= min_quantity {
                prop_assert_eq!(status, StockStatus::LowStock);
            } else {
                prop_assert_eq!(status, StockStatus::InStock);
            }
        }
    }
}
