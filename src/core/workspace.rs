//! State container for the three aggregates (plan, history, library).
//!
//! All edits go through [`Workspace`]. After a transition commits, every
//! attached [`StateObserver`] is told which aggregate changed. Observers are
//! attached once at composition time (see `storage::persist::compose`); the
//! transitions themselves know nothing about persistence.

use crate::core::collaborators::{Clock, ConfirmPrompt, IdGenerator};
use crate::core::promo::{
    CellEdit, ChainConfig, History, Library, LibraryCandidate, Month, Plan, Rejected, SavedSession,
};
use crate::core::storage::StorageError;

pub const ARCHIVE_PROMPT: &str = "Archive current plan and start fresh?";
pub const RESTORE_PROMPT: &str = "Restore this version?";

/// Which aggregate changed, borrowed at its new value.
#[derive(Debug, Clone, Copy)]
pub enum StateChange<'a> {
    Plan(&'a Plan),
    History(&'a History),
    Library(&'a Library),
}

pub trait StateObserver {
    fn on_change(&mut self, change: StateChange<'_>) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregate {
    Plan,
    History,
    Library,
}

pub struct Workspace {
    chains: Vec<ChainConfig>,
    plan: Plan,
    history: History,
    library: Library,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn StateObserver>>,
    failures: Vec<StorageError>,
}

impl Workspace {
    /// Build a workspace around already-loaded aggregates. No observers yet.
    pub fn new(
        chains: Vec<ChainConfig>,
        plan: Plan,
        history: History,
        library: Library,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            chains,
            plan,
            history,
            library,
            ids,
            clock,
            observers: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Empty history and library, fresh plan.
    pub fn empty(chains: Vec<ChainConfig>, ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        let plan = Plan::fresh(&chains, ids.as_ref());
        Self::new(chains, plan, History::default(), Library::default(), ids, clock)
    }

    pub fn attach(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Drain persistence failures recorded since the last call.
    pub fn take_failures(&mut self) -> Vec<StorageError> {
        std::mem::take(&mut self.failures)
    }

    // ── Plan transitions ────────────────────────────────────────────────

    /// Make sure every configured chain has a row. Notifies only if rows were added.
    pub fn ensure_chain_coverage(&mut self) -> bool {
        let changed = self.plan.ensure_chains(&self.chains, self.ids.as_ref());
        if changed {
            log::info!("Plan normalized: added empty rows for uncovered chains");
            self.notify(Aggregate::Plan);
        }
        changed
    }

    pub fn update_cell(&mut self, chain_id: &str, row_id: &str, month: Month, edit: CellEdit) -> bool {
        let changed = self.plan.update_cell(chain_id, row_id, month, edit);
        if changed {
            self.notify(Aggregate::Plan);
        } else {
            log::debug!("update_cell ignored: row {row_id} not found in {chain_id}");
        }
        changed
    }

    /// Append an empty row to a chain and return its id.
    pub fn add_row(&mut self, chain_id: &str) -> String {
        let id = self.plan.add_row(chain_id, self.ids.as_ref());
        log::debug!("Added row {id} to {chain_id}");
        self.notify(Aggregate::Plan);
        id
    }

    pub fn remove_row(&mut self, chain_id: &str, row_id: &str) -> bool {
        let changed = self.plan.remove_row(chain_id, row_id, self.ids.as_ref());
        if changed {
            log::debug!("Removed row {row_id} from {chain_id}");
            self.notify(Aggregate::Plan);
        }
        changed
    }

    /// Copy a library template's pkg, cost and srp into one cell.
    pub fn apply_library_promo(&mut self, chain_id: &str, row_id: &str, month: Month, promo_id: &str) -> bool {
        let Some(promo) = self.library.get(promo_id) else {
            return false;
        };
        let changed = self.plan.apply_library_promo(chain_id, row_id, month, promo);
        if changed {
            self.notify(Aggregate::Plan);
        }
        changed
    }

    // ── Sessions ────────────────────────────────────────────────────────

    /// Archive the whole plan into history and start over with a fresh plan.
    ///
    /// Nothing changes unless `prompt` confirms [`ARCHIVE_PROMPT`].
    pub fn archive_and_reset(&mut self, prompt: &dyn ConfirmPrompt) -> Option<&SavedSession> {
        if !prompt.confirm(ARCHIVE_PROMPT) {
            return None;
        }
        let fresh = Plan::fresh(&self.chains, self.ids.as_ref());
        let archived = std::mem::replace(&mut self.plan, fresh);
        let session = SavedSession::archive(archived, self.ids.as_ref(), self.clock.as_ref());
        log::info!("Archived plan as '{}' ({})", session.name, session.id);
        self.history.prepend(session);

        self.notify(Aggregate::History);
        self.notify(Aggregate::Plan);
        self.history.latest()
    }

    /// Replace the current plan with a copy of an archived session's data.
    ///
    /// No-op if the session id is unknown or `prompt` declines [`RESTORE_PROMPT`].
    pub fn restore_session(&mut self, session_id: &str, prompt: &dyn ConfirmPrompt) -> bool {
        let Some(session) = self.history.get(session_id) else {
            log::warn!("restore_session: unknown session {session_id}");
            return false;
        };
        if !prompt.confirm(RESTORE_PROMPT) {
            return false;
        }
        log::info!("Restoring '{}' ({})", session.name, session.id);
        self.plan = session.data.clone();
        self.plan.ensure_chains(&self.chains, self.ids.as_ref());
        self.notify(Aggregate::Plan);
        true
    }

    // ── Library ─────────────────────────────────────────────────────────

    /// Insert a manually entered template.
    pub fn add_to_library(&mut self, candidate: LibraryCandidate) -> Result<String, Rejected> {
        let result = self.library.add(candidate, self.ids.as_ref());
        self.after_library_insert(&result);
        result
    }

    /// Insert a template captured from a grid cell (name = trimmed pkg).
    pub fn capture_to_library(&mut self, pkg: &str, cost: &str, srp: &str) -> Result<String, Rejected> {
        let result = self.library.capture(pkg, cost, srp, self.ids.as_ref());
        self.after_library_insert(&result);
        result
    }

    pub fn delete_from_library(&mut self, id: &str) -> bool {
        let changed = self.library.delete(id);
        if changed {
            self.notify(Aggregate::Library);
        }
        changed
    }

    fn after_library_insert(&mut self, result: &Result<String, Rejected>) {
        match result {
            Ok(id) => {
                log::debug!("Library entry {id} added");
                self.notify(Aggregate::Library);
            }
            Err(reason) => log::debug!("Library candidate dropped: {reason:?}"),
        }
    }

    // ── Observers ───────────────────────────────────────────────────────

    fn notify(&mut self, which: Aggregate) {
        let change = match which {
            Aggregate::Plan => StateChange::Plan(&self.plan),
            Aggregate::History => StateChange::History(&self.history),
            Aggregate::Library => StateChange::Library(&self.library),
        };
        for observer in &mut self.observers {
            if let Err(e) = observer.on_change(change) {
                log::error!("Persisting {which:?} failed: {e}");
                self.failures.push(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{Local, TimeZone};

    use super::*;
    use crate::core::collaborators::{Answered, FixedClock, SequentialIds};
    use crate::core::promo::PromotionStatus;

    /// Records which aggregates were announced.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl StateObserver for Recorder {
        fn on_change(&mut self, change: StateChange<'_>) -> Result<(), StorageError> {
            let name = match change {
                StateChange::Plan(_) => "plan",
                StateChange::History(_) => "history",
                StateChange::Library(_) => "library",
            };
            self.0.borrow_mut().push(name);
            Ok(())
        }
    }

    struct Failing;

    impl StateObserver for Failing {
        fn on_change(&mut self, _change: StateChange<'_>) -> Result<(), StorageError> {
            Err(StorageError::write(
                "promo_planning_data",
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ))
        }
    }

    fn workspace() -> (Workspace, Recorder) {
        let clock = FixedClock(Local.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap());
        let mut ws = Workspace::empty(
            ChainConfig::defaults(),
            Box::new(SequentialIds::new("id")),
            Box::new(clock),
        );
        let recorder = Recorder::default();
        ws.attach(Box::new(recorder.clone()));
        (ws, recorder)
    }

    fn first_row(ws: &Workspace, chain: &str) -> String {
        ws.plan().rows(chain)[0].id.clone()
    }

    #[test]
    fn test_update_cell_notifies_plan() {
        let (mut ws, rec) = workspace();
        let r0 = first_row(&ws, "motomart");
        assert!(ws.update_cell("motomart", &r0, Month::January, CellEdit::Pkg("Cola 2L".into())));
        assert_eq!(*rec.0.borrow(), ["plan"]);
    }

    #[test]
    fn test_noop_does_not_notify() {
        let (mut ws, rec) = workspace();
        assert!(!ws.update_cell("motomart", "ghost", Month::January, CellEdit::Cost("1".into())));
        assert!(!ws.remove_row("motomart", "ghost"));
        assert!(!ws.delete_from_library("ghost"));
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn test_archive_declined_changes_nothing() {
        let (mut ws, rec) = workspace();
        let r0 = first_row(&ws, "rhodes");
        ws.update_cell("rhodes", &r0, Month::April, CellEdit::Pkg("Gatorade".into()));
        let before = ws.plan().clone();

        assert!(ws.archive_and_reset(&Answered(false)).is_none());
        assert_eq!(ws.plan(), &before);
        assert!(ws.history().is_empty());
        assert_eq!(rec.0.borrow().len(), 1);
    }

    #[test]
    fn test_archive_snapshots_and_resets() {
        let (mut ws, rec) = workspace();
        let r0 = first_row(&ws, "rhodes");
        ws.update_cell("rhodes", &r0, Month::April, CellEdit::Status(PromotionStatus::Approved));
        let before = ws.plan().clone();

        let session = ws.archive_and_reset(&|msg: &str| msg == ARCHIVE_PROMPT).cloned().unwrap();
        assert_eq!(session.data, before);
        assert_eq!(session.name, "Promo Plan - 10/14/2026");
        assert_eq!(ws.history().latest(), Some(&session));

        for chain in ChainConfig::defaults() {
            let rows = ws.plan().rows(&chain.id);
            assert_eq!(rows.len(), 1);
            assert!(rows[0].is_empty());
        }
        assert_eq!(*rec.0.borrow(), ["plan", "history", "plan"]);
    }

    #[test]
    fn test_restore_is_a_copy() {
        let (mut ws, _) = workspace();
        let r0 = first_row(&ws, "hucks");
        ws.update_cell("hucks", &r0, Month::December, CellEdit::Pkg("Eggnog".into()));
        let session_id = ws.archive_and_reset(&Answered(true)).unwrap().id.clone();

        assert!(ws.restore_session(&session_id, &Answered(true)));
        let stored = ws.history().get(&session_id).unwrap().data.clone();
        assert_eq!(ws.plan(), &stored);

        ws.update_cell("hucks", &r0, Month::December, CellEdit::Pkg("Cider".into()));
        let after = &ws.history().get(&session_id).unwrap().data;
        assert_eq!(after, &stored);
        assert_eq!(after.row("hucks", &r0).unwrap().entry(Month::December).pkg, "Eggnog");
    }

    #[test]
    fn test_restore_declined_or_unknown() {
        let (mut ws, _) = workspace();
        let session_id = ws.archive_and_reset(&Answered(true)).unwrap().id.clone();
        let current = ws.plan().clone();
        assert!(!ws.restore_session(&session_id, &Answered(false)));
        assert!(!ws.restore_session("ghost", &Answered(true)));
        assert_eq!(ws.plan(), &current);
    }

    #[test]
    fn test_library_paths() {
        let (mut ws, rec) = workspace();
        let manual = ws
            .add_to_library(LibraryCandidate {
                name: "Summer Soda".into(),
                pkg: "1L CSD".into(),
                cost: "0.75".into(),
                srp: "1.29".into(),
            })
            .unwrap();
        assert_eq!(ws.library().get(&manual).unwrap().name, "Summer Soda");
        assert_eq!(ws.capture_to_library("1l csd", "", "1.29"), Err(Rejected::Duplicate));
        assert!(ws.capture_to_library("Red Bull 8oz", "", "").is_ok());
        assert_eq!(ws.library().len(), 2);
        assert!(ws.delete_from_library(&manual));
        assert_eq!(*rec.0.borrow(), ["library", "library", "library"]);
    }

    #[test]
    fn test_apply_library_promo_by_id() {
        let (mut ws, _) = workspace();
        let id = ws.capture_to_library("Takis", "1.10", "1.99").unwrap();
        let r0 = first_row(&ws, "buchheits");
        assert!(ws.apply_library_promo("buchheits", &r0, Month::August, &id));
        let entry = ws.plan().row("buchheits", &r0).unwrap().entry(Month::August).clone();
        assert_eq!((entry.pkg.as_str(), entry.cost.as_str(), entry.srp.as_str()), ("Takis", "1.10", "1.99"));
        assert!(!ws.apply_library_promo("buchheits", &r0, Month::August, "ghost"));
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let (mut ws, _) = workspace();
        ws.attach(Box::new(Failing));
        let id = ws.add_row("motomart");
        assert!(ws.plan().row("motomart", &id).is_some());
        let failures = ws.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(ws.take_failures().is_empty());
    }
}
