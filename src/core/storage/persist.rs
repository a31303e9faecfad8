//! Loading the three aggregates from a [`KeyValueStore`] and writing them back
//! when they change.

use serde::de::DeserializeOwned;

use super::error::StorageResult;
use super::kv::KeyValueStore;
use crate::core::collaborators::{Clock, IdGenerator};
use crate::core::promo::{ChainConfig, History, Library, Plan};
use crate::core::workspace::{StateChange, StateObserver, Workspace};

pub const PLAN_KEY: &str = "promo_planning_data";
pub const HISTORY_KEY: &str = "promo_planning_history";
pub const LIBRARY_KEY: &str = "promo_library";

/// Everything read from the store at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub plan: Plan,
    pub history: History,
    pub library: Library,
}

/// Read one blob. Absent, unreadable and malformed values all yield the default.
pub fn load_blob<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::debug!("No stored value for '{key}', using default");
            return T::default();
        }
        Err(e) => {
            log::warn!("Failed to read '{key}': {e}. Using default");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Stored value for '{key}' is malformed: {e}. Using default");
            T::default()
        }
    }
}

pub fn load_state<S: KeyValueStore + ?Sized>(store: &S) -> LoadedState {
    LoadedState {
        plan: load_blob(store, PLAN_KEY),
        history: load_blob(store, HISTORY_KEY),
        library: load_blob(store, LIBRARY_KEY),
    }
}

/// Serializes each changed aggregate to its own key.
pub struct PersistenceObserver<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceObserver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn write<T: serde::Serialize>(&mut self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }
}

impl<S: KeyValueStore> StateObserver for PersistenceObserver<S> {
    fn on_change(&mut self, change: StateChange<'_>) -> StorageResult<()> {
        match change {
            StateChange::Plan(plan) => self.write(PLAN_KEY, plan),
            StateChange::History(history) => self.write(HISTORY_KEY, history),
            StateChange::Library(library) => self.write(LIBRARY_KEY, library),
        }
    }
}

/// Load state from `store`, wire persistence, and normalize chain coverage.
///
/// The plan is written back only when normalization had to add rows, so an
/// untouched store is never rewritten just by opening it.
pub fn compose<S>(
    chains: Vec<ChainConfig>,
    store: S,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
) -> Workspace
where
    S: KeyValueStore + 'static,
{
    let LoadedState {
        plan,
        history,
        library,
    } = load_state(&store);
    log::info!(
        "Loaded {} rows, {} sessions, {} library entries",
        plan.total_rows(),
        history.len(),
        library.len()
    );

    let mut workspace = Workspace::new(chains, plan, history, library, ids, clock);
    workspace.attach(Box::new(PersistenceObserver::new(store)));
    workspace.ensure_chain_coverage();
    workspace
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::core::collaborators::{FixedClock, SequentialIds};
    use crate::core::promo::{CellEdit, Month, PromotionStatus};
    use crate::core::storage::MemoryStore;

    fn clock() -> Box<FixedClock> {
        Box::new(FixedClock(Local.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()))
    }

    fn open(store: &MemoryStore) -> Workspace {
        compose(
            ChainConfig::defaults(),
            store.clone(),
            Box::new(SequentialIds::new("row")),
            clock(),
        )
    }

    #[test]
    fn test_first_run_writes_fresh_plan_only() {
        let store = MemoryStore::new();
        let ws = open(&store);
        assert_eq!(ws.plan().total_rows(), 4);
        assert!(store.contains(PLAN_KEY));
        assert!(!store.contains(HISTORY_KEY));
        assert!(!store.contains(LIBRARY_KEY));
    }

    #[test]
    fn test_covered_plan_is_not_rewritten() {
        let store = MemoryStore::new();
        drop(open(&store));
        let before = store.raw(PLAN_KEY);
        let ws = open(&store);
        assert_eq!(store.raw(PLAN_KEY), before);
        assert_eq!(ws.plan().total_rows(), 4);
    }

    #[test]
    fn test_malformed_blobs_fail_closed() {
        let store = MemoryStore::with_entries([
            (PLAN_KEY, "{not json"),
            (HISTORY_KEY, "42"),
            (LIBRARY_KEY, r#"{"oops": true}"#),
        ]);
        let ws = open(&store);
        assert_eq!(ws.plan().total_rows(), 4);
        assert!(ws.history().is_empty());
        assert!(ws.library().is_empty());
        // Untouched aggregates keep their stored bytes.
        assert_eq!(store.raw(HISTORY_KEY).as_deref(), Some("42"));
    }

    #[test]
    fn test_partial_entries_read_with_defaults() {
        let store = MemoryStore::with_entries([(
            PLAN_KEY,
            r#"{"motomart":[{"id":"r1","months":{"MARCH":{"pkg":"Cola 2L","status":"WAITING"}}}]}"#,
        )]);
        let ws = open(&store);
        let entry = ws.plan().row("motomart", "r1").unwrap().entry(Month::March);
        assert_eq!(entry.pkg, "Cola 2L");
        assert_eq!(entry.cost, "");
        assert_eq!(entry.status, PromotionStatus::Waiting);
        // Missing chains were filled in and persisted.
        assert_eq!(ws.plan().total_rows(), 4);
        let stored: Plan = serde_json::from_str(&store.raw(PLAN_KEY).unwrap()).unwrap();
        assert_eq!(&stored, ws.plan());
    }

    #[test]
    fn test_edits_round_trip_through_store() {
        let store = MemoryStore::new();
        let mut ws = open(&store);
        let row = ws.plan().rows("rhodes")[0].id.clone();
        ws.update_cell("rhodes", &row, Month::June, CellEdit::Srp("2.49".into()));
        ws.capture_to_library("Monster 16oz", "1.50", "2.49").unwrap();

        let loaded = load_state(&store);
        assert_eq!(&loaded.plan, ws.plan());
        assert_eq!(&loaded.library, ws.library());
        assert!(loaded.history.is_empty());
    }
}
