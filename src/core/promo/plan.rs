//! The plan aggregate: chain id → ordered promotion rows.
//!
//! Transitions mutate in place and report whether anything happened. Unknown
//! chain or row ids are no-ops, never errors. Once [`Plan::ensure_chains`] has
//! run for a chain configuration, no transition leaves a configured chain
//! without a row.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{CellEdit, ChainConfig, ChainPromotionRow, LibraryPromotion, Month};
use crate::core::collaborators::IdGenerator;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    chains: IndexMap<String, Vec<ChainPromotionRow>>,
}

impl Plan {
    /// One blank row per configured chain.
    pub fn fresh(chains: &[ChainConfig], ids: &dyn IdGenerator) -> Self {
        let mut plan = Plan::default();
        plan.ensure_chains(chains, ids);
        plan
    }

    /// Give every configured chain at least one row. Returns true if any row was added.
    pub fn ensure_chains(&mut self, chains: &[ChainConfig], ids: &dyn IdGenerator) -> bool {
        let mut changed = false;
        for chain in chains {
            let rows = self.chains.entry(chain.id.clone()).or_default();
            if rows.is_empty() {
                rows.push(ChainPromotionRow::empty(ids.next_id()));
                changed = true;
            }
        }
        changed
    }

    pub fn rows(&self, chain_id: &str) -> &[ChainPromotionRow] {
        self.chains.get(chain_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row(&self, chain_id: &str, row_id: &str) -> Option<&ChainPromotionRow> {
        self.rows(chain_id).iter().find(|r| r.id == row_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Overwrite one field of one (row, month) entry.
    ///
    /// Returns false when the row does not exist in that chain.
    pub fn update_cell(&mut self, chain_id: &str, row_id: &str, month: Month, edit: CellEdit) -> bool {
        let Some(row) = self
            .chains
            .get_mut(chain_id)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == row_id))
        else {
            return false;
        };
        row.months.entry(month).or_default().apply(edit);
        true
    }

    /// Append an empty row and return its id. Unknown chains start empty.
    pub fn add_row(&mut self, chain_id: &str, ids: &dyn IdGenerator) -> String {
        let id = ids.next_id();
        self.chains
            .entry(chain_id.to_string())
            .or_default()
            .push(ChainPromotionRow::empty(id.clone()));
        id
    }

    /// Remove a row; a chain left empty gets one fresh empty row.
    pub fn remove_row(&mut self, chain_id: &str, row_id: &str, ids: &dyn IdGenerator) -> bool {
        let Some(rows) = self.chains.get_mut(chain_id) else {
            return false;
        };
        let before = rows.len();
        rows.retain(|r| r.id != row_id);
        let removed = rows.len() != before;
        if rows.is_empty() {
            rows.push(ChainPromotionRow::empty(ids.next_id()));
            return true;
        }
        removed
    }

    /// Copy a template's pkg, cost and srp into a cell. Notes and status are kept.
    pub fn apply_library_promo(
        &mut self,
        chain_id: &str,
        row_id: &str,
        month: Month,
        promo: &LibraryPromotion,
    ) -> bool {
        self.update_cell(chain_id, row_id, month, CellEdit::Pkg(promo.pkg.clone()))
            && self.update_cell(chain_id, row_id, month, CellEdit::Cost(promo.cost.clone()))
            && self.update_cell(chain_id, row_id, month, CellEdit::Srp(promo.srp.clone()))
    }

    pub fn total_rows(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }
}
