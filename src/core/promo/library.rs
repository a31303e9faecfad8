//! Promotion library: a small catalog of reusable templates.
//!
//! Inserts are deduplicated on the pair (trimmed lower-cased pkg, trimmed srp).
//! Rejected candidates leave the library untouched and are not errors for the
//! user; the reason is returned only so callers can log it.

use serde::{Deserialize, Serialize};

use super::types::LibraryPromotion;
use crate::core::collaborators::IdGenerator;

/// Shortest normalized pkg the library accepts.
pub const MIN_PKG_LEN: usize = 2;

/// A template about to be inserted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryCandidate {
    pub name: String,
    pub pkg: String,
    pub cost: String,
    pub srp: String,
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Same normalized pkg and srp as an existing entry.
    Duplicate,
    /// Normalized pkg shorter than [`MIN_PKG_LEN`].
    KeyTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    entries: Vec<LibraryPromotion>,
}

fn normalize_pkg(pkg: &str) -> String {
    pkg.trim().to_lowercase()
}

impl Library {
    pub fn entries(&self) -> &[LibraryPromotion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LibraryPromotion> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Insert a candidate with its own name. Returns the new entry id.
    pub fn add(&mut self, candidate: LibraryCandidate, ids: &dyn IdGenerator) -> Result<String, Rejected> {
        let pkg_key = normalize_pkg(&candidate.pkg);
        let srp_key = candidate.srp.trim();

        if pkg_key.chars().count() < MIN_PKG_LEN {
            return Err(Rejected::KeyTooShort);
        }
        if self
            .entries
            .iter()
            .any(|p| normalize_pkg(&p.pkg) == pkg_key && p.srp.trim() == srp_key)
        {
            return Err(Rejected::Duplicate);
        }

        let id = ids.next_id();
        self.entries.push(LibraryPromotion {
            id: id.clone(),
            name: candidate.name,
            pkg: candidate.pkg,
            cost: candidate.cost,
            srp: candidate.srp,
        });
        Ok(id)
    }

    /// Insert a template captured from a grid cell; its name is the trimmed pkg.
    pub fn capture(
        &mut self,
        pkg: &str,
        cost: &str,
        srp: &str,
        ids: &dyn IdGenerator,
    ) -> Result<String, Rejected> {
        let pkg = pkg.trim();
        self.add(
            LibraryCandidate {
                name: pkg.to_string(),
                pkg: pkg.to_string(),
                cost: cost.to_string(),
                srp: srp.to_string(),
            },
            ids,
        )
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p.id != id);
        self.entries.len() != before
    }
}
