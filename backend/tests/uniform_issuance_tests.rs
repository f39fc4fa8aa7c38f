//! Uniform ledger and issued-record tests
//!
//! Exercises the issuance record reconciliation rules through pure
//! simulations of the service transitions:
//! - editing a record applies `original - new` back to remaining stock and
//!   may never drive it negative
//! - deleting a record restores its quantity to the item
//! - live record quantities plus remaining stock always equal the total

use std::collections::BTreeMap;

use proptest::prelude::*;
use shared::models::{classify_status, MovementType, StockStatus, DEFAULT_MIN_QUANTITY};
use shared::validation::validate_student_name;

#[derive(Debug, Clone)]
struct LedgerMovement {
    movement_type: MovementType,
    quantity_delta: i32,
    previous_quantity: i32,
    new_quantity: i32,
}

/// Pure mirror of a uniform item with its issued records.
#[derive(Debug, Clone)]
struct UniformLedger {
    total_quantity: i32,
    remaining_quantity: i32,
    min_quantity: i32,
    status: StockStatus,
    records: BTreeMap<u32, i32>,
    movements: Vec<LedgerMovement>,
    next_record_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum LedgerError {
    Validation,
    NotFound,
    InsufficientStock { available: i32 },
}

/// Mirror of `UniformService::add_item`.
fn add_uniform(quantity: i32) -> Result<UniformLedger, LedgerError> {
    if quantity < 0 {
        return Err(LedgerError::Validation);
    }
    Ok(UniformLedger {
        total_quantity: quantity,
        remaining_quantity: quantity,
        min_quantity: DEFAULT_MIN_QUANTITY,
        status: classify_status(quantity, DEFAULT_MIN_QUANTITY),
        records: BTreeMap::new(),
        movements: vec![LedgerMovement {
            movement_type: MovementType::Added,
            quantity_delta: quantity,
            previous_quantity: 0,
            new_quantity: quantity,
        }],
        next_record_id: 0,
    })
}

/// Mirror of `IssuanceService::issue`. Returns the new record id.
fn issue_uniform(ledger: &mut UniformLedger, student: &str, quantity: i32) -> Result<u32, LedgerError> {
    if validate_student_name(student).is_err() {
        return Err(LedgerError::Validation);
    }
    if quantity <= 0 {
        return Err(LedgerError::Validation);
    }
    let remaining = ledger.remaining_quantity;
    if quantity > remaining {
        return Err(LedgerError::InsufficientStock { available: remaining });
    }

    let new_remaining = remaining - quantity;
    ledger.remaining_quantity = new_remaining;
    ledger.status = classify_status(new_remaining, ledger.min_quantity);
    ledger.movements.push(LedgerMovement {
        movement_type: MovementType::Issued,
        quantity_delta: -quantity,
        previous_quantity: remaining,
        new_quantity: new_remaining,
    });

    let record_id = ledger.next_record_id;
    ledger.next_record_id += 1;
    ledger.records.insert(record_id, quantity);
    Ok(record_id)
}

/// Mirror of `IssuanceService::update_record` for a quantity change.
fn edit_record(ledger: &mut UniformLedger, record_id: u32, new_quantity: i32) -> Result<(), LedgerError> {
    if new_quantity <= 0 {
        return Err(LedgerError::Validation);
    }
    let original = *ledger.records.get(&record_id).ok_or(LedgerError::NotFound)?;

    if new_quantity != original {
        let remaining = ledger.remaining_quantity;
        let adjustment = original - new_quantity;
        let new_remaining = remaining + adjustment;
        if new_remaining < 0 {
            return Err(LedgerError::InsufficientStock { available: remaining });
        }

        ledger.remaining_quantity = new_remaining;
        ledger.status = classify_status(new_remaining, ledger.min_quantity);
        ledger.movements.push(LedgerMovement {
            movement_type: MovementType::Adjusted,
            quantity_delta: adjustment,
            previous_quantity: remaining,
            new_quantity: new_remaining,
        });
    }

    ledger.records.insert(record_id, new_quantity);
    Ok(())
}

/// Mirror of `IssuanceService::delete_record`.
fn delete_record(ledger: &mut UniformLedger, record_id: u32) -> Result<(), LedgerError> {
    let quantity = ledger.records.remove(&record_id).ok_or(LedgerError::NotFound)?;

    let remaining = ledger.remaining_quantity;
    let new_remaining = remaining + quantity;
    ledger.remaining_quantity = new_remaining;
    ledger.status = classify_status(new_remaining, ledger.min_quantity);
    ledger.movements.push(LedgerMovement {
        movement_type: MovementType::Returned,
        quantity_delta: quantity,
        previous_quantity: remaining,
        new_quantity: new_remaining,
    });
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Editing a record from 10 to 4 on remaining 20 restores 6; deleting the
    /// edited record restores the remaining 4.
    #[test]
    fn test_edit_then_delete_reconciliation() {
        let mut ledger = add_uniform(30).unwrap();
        let record = issue_uniform(&mut ledger, "Jordan Lee", 10).unwrap();
        assert_eq!(ledger.remaining_quantity, 20);

        edit_record(&mut ledger, record, 4).unwrap();
        assert_eq!(ledger.remaining_quantity, 26);

        delete_record(&mut ledger, record).unwrap();
        assert_eq!(ledger.remaining_quantity, 30);
        assert!(ledger.records.is_empty());
    }

    /// Raising a record's quantity draws the extra units from stock.
    #[test]
    fn test_edit_increase_draws_from_stock() {
        let mut ledger = add_uniform(20).unwrap();
        let record = issue_uniform(&mut ledger, "Sam Park", 5).unwrap();
        assert_eq!(ledger.remaining_quantity, 15);

        edit_record(&mut ledger, record, 12).unwrap();
        assert_eq!(ledger.remaining_quantity, 8);

        let movement = ledger.movements.last().unwrap();
        assert_eq!(movement.movement_type, MovementType::Adjusted);
        assert_eq!(movement.quantity_delta, -7);
    }

    /// An edit that would drive the item negative fails and changes nothing.
    #[test]
    fn test_edit_never_goes_negative() {
        let mut ledger = add_uniform(10).unwrap();
        let record = issue_uniform(&mut ledger, "Sam Park", 8).unwrap();
        assert_eq!(ledger.remaining_quantity, 2);

        let result = edit_record(&mut ledger, record, 20);
        assert_eq!(result, Err(LedgerError::InsufficientStock { available: 2 }));

        assert_eq!(ledger.remaining_quantity, 2);
        assert_eq!(ledger.records[&record], 8);
    }

    /// An unchanged quantity writes no reconciliation movement.
    #[test]
    fn test_edit_same_quantity_emits_no_movement() {
        let mut ledger = add_uniform(10).unwrap();
        let record = issue_uniform(&mut ledger, "Sam Park", 4).unwrap();
        let count = ledger.movements.len();

        edit_record(&mut ledger, record, 4).unwrap();
        assert_eq!(ledger.movements.len(), count);
    }

    #[test]
    fn test_issue_insufficient_stock() {
        let mut ledger = add_uniform(3).unwrap();
        let result = issue_uniform(&mut ledger, "Jordan Lee", 5);
        assert_eq!(result, Err(LedgerError::InsufficientStock { available: 3 }));
        assert_eq!(ledger.remaining_quantity, 3);
        assert!(ledger.records.is_empty());
    }

    #[test]
    fn test_issue_rejects_bad_input() {
        let mut ledger = add_uniform(10).unwrap();
        assert_eq!(issue_uniform(&mut ledger, "", 1), Err(LedgerError::Validation));
        assert_eq!(issue_uniform(&mut ledger, "Sam", 0), Err(LedgerError::Validation));
    }

    #[test]
    fn test_edit_rejects_missing_record() {
        let mut ledger = add_uniform(10).unwrap();
        assert_eq!(edit_record(&mut ledger, 42, 5), Err(LedgerError::NotFound));
    }

    /// Issuing the remaining stock empties the item.
    #[test]
    fn test_issue_all_remaining() {
        let mut ledger = add_uniform(6).unwrap();
        issue_uniform(&mut ledger, "Jordan Lee", 6).unwrap();
        assert_eq!(ledger.remaining_quantity, 0);
        assert_eq!(ledger.status, StockStatus::OutOfStock);
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
        Edit { slot: u32, quantity: i32 },
        Delete { slot: u32 },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i32..=20).prop_map(Op::Issue),
            ((0u32..10), (1i32..=20)).prop_map(|(slot, quantity)| Op::Edit { slot, quantity }),
            (0u32..10).prop_map(|slot| Op::Delete { slot }),
        ]
    }

    /// Map a proptest slot onto a live record id, if any.
    fn pick_record(ledger: &UniformLedger, slot: u32) -> Option<u32> {
        if ledger.records.is_empty() {
            return None;
        }
        let index = slot as usize % ledger.records.len();
        ledger.records.keys().nth(index).copied()
    }

    fn apply(ledger: &mut UniformLedger, op: &Op) -> Result<(), LedgerError> {
        match op {
            Op::Issue(quantity) => issue_uniform(ledger, "Student", *quantity).map(|_| ()),
            Op::Edit { slot, quantity } => match pick_record(ledger, *slot) {
                Some(record_id) => edit_record(ledger, record_id, *quantity),
                None => Ok(()),
            },
            Op::Delete { slot } => match pick_record(ledger, *slot) {
                Some(record_id) => delete_record(ledger, record_id),
                None => Ok(()),
            },
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Remaining stock never goes negative and status always matches the
        /// classifier, across any record lifecycle.
        #[test]
        fn prop_remaining_never_negative(
            initial in 0i32..=60,
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut ledger = add_uniform(initial).unwrap();
            for op in &ops {
                let _ = apply(&mut ledger, op);
                prop_assert!(ledger.remaining_quantity >= 0);
                prop_assert_eq!(
                    ledger.status,
                    classify_status(ledger.remaining_quantity, ledger.min_quantity)
                );
            }
        }

        /// Issued records and remaining stock conserve the total: every unit
        /// is either on hand or accounted to a live record.
        #[test]
        fn prop_units_conserved(
            initial in 0i32..=60,
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut ledger = add_uniform(initial).unwrap();
            for op in &ops {
                let _ = apply(&mut ledger, op);
                let outstanding: i32 = ledger.records.values().sum();
                prop_assert_eq!(outstanding + ledger.remaining_quantity, ledger.total_quantity);
            }
        }

        /// Replaying the movement log reconstructs the remaining quantity.
        #[test]
        fn prop_movement_replay_reconstructs_remaining(
            initial in 0i32..=60,
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut ledger = add_uniform(initial).unwrap();
            for op in &ops {
                let _ = apply(&mut ledger, op);
            }

            let replayed: i32 = ledger.movements.iter().map(|m| m.quantity_delta).sum();
            prop_assert_eq!(replayed, ledger.remaining_quantity);

            for movement in &ledger.movements {
                prop_assert_eq!(
                    movement.new_quantity,
                    movement.previous_quantity + movement.quantity_delta
                );
            }
        }
    }
}
