//! Property-based tests for the plan grid
//!
//! Tests invariants:
//! - Every configured chain has at least one row after any operation sequence
//! - Cell edits are isolated to their (row, month, field)
//! - Edits against unknown rows change nothing

use proptest::prelude::*;

use crate::core::collaborators::SequentialIds;
use crate::core::promo::{CellEdit, ChainConfig, Month, Plan};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

#[derive(Debug, Clone)]
enum RowOp {
    Add(usize),
    /// Remove the row at `index % rows.len()` of chain `chain`.
    Remove { chain: usize, index: usize },
}

fn arb_row_op() -> impl Strategy<Value = RowOp> {
    prop_oneof![
        (0usize..4).prop_map(RowOp::Add),
        (0usize..4, 0usize..8).prop_map(|(chain, index)| RowOp::Remove { chain, index }),
    ]
}

fn arb_month() -> impl Strategy<Value = Month> {
    proptest::sample::select(Month::ALL.to_vec())
}

fn arb_edit() -> impl Strategy<Value = CellEdit> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}".prop_map(CellEdit::Pkg),
        "[0-9.$]{0,8}".prop_map(CellEdit::Cost),
        "[0-9./$]{0,8}".prop_map(CellEdit::Srp),
        "[a-z \n]{0,40}".prop_map(CellEdit::Notes),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// No sequence of adds and removes leaves a chain without rows
    #[test]
    fn prop_chains_never_empty(ops in prop::collection::vec(arb_row_op(), 0..40)) {
        let chains = ChainConfig::defaults();
        let ids = SequentialIds::new("r");
        let mut plan = Plan::fresh(&chains, &ids);

        for op in ops {
            match op {
                RowOp::Add(chain) => {
                    plan.add_row(&chains[chain].id, &ids);
                }
                RowOp::Remove { chain, index } => {
                    let chain_id = &chains[chain].id;
                    let rows = plan.rows(chain_id);
                    let row_id = rows[index % rows.len()].id.clone();
                    prop_assert!(plan.remove_row(chain_id, &row_id, &ids));
                }
            }
            for chain in &chains {
                prop_assert!(!plan.rows(&chain.id).is_empty(), "{} has no rows", chain.id);
            }
        }
    }

    /// Editing one cell leaves every other cell untouched
    #[test]
    fn prop_update_cell_is_isolated(
        target_chain in 0usize..4,
        month in arb_month(),
        edit in arb_edit(),
    ) {
        let chains = ChainConfig::defaults();
        let ids = SequentialIds::new("r");
        let mut plan = Plan::fresh(&chains, &ids);
        for chain in &chains {
            plan.add_row(&chain.id, &ids);
        }
        let before = plan.clone();

        let chain_id = chains[target_chain].id.clone();
        let row_id = plan.rows(&chain_id)[1].id.clone();
        prop_assert!(plan.update_cell(&chain_id, &row_id, month, edit));

        for chain in &chains {
            for (row_before, row_after) in before.rows(&chain.id).iter().zip(plan.rows(&chain.id)) {
                for m in Month::ALL {
                    if chain.id == chain_id && row_after.id == row_id && m == month {
                        continue;
                    }
                    prop_assert_eq!(row_before.entry(m), row_after.entry(m));
                }
            }
        }
    }

    /// Edits addressed to a missing row are rejected and change nothing
    #[test]
    fn prop_unknown_row_edit_is_noop(month in arb_month(), edit in arb_edit()) {
        let chains = ChainConfig::defaults();
        let ids = SequentialIds::new("r");
        let mut plan = Plan::fresh(&chains, &ids);
        let before = plan.clone();

        prop_assert!(!plan.update_cell("motomart", "no-such-row", month, edit));
        prop_assert_eq!(plan, before);
    }
}
