//! Archived plan snapshots, newest first. Sessions are never edited or deleted.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::plan::Plan;
use crate::core::collaborators::{Clock, IdGenerator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: String,
    /// Creation instant, epoch milliseconds.
    pub timestamp: i64,
    pub name: String,
    pub data: Plan,
}

impl SavedSession {
    /// Snapshot `plan` (by value) stamped with the clock's current instant.
    pub fn archive(plan: Plan, ids: &dyn IdGenerator, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id: ids.next_id(),
            timestamp: now.timestamp_millis(),
            name: format!("Promo Plan - {}", now.format("%m/%d/%Y")),
            data: plan,
        }
    }

    /// Local date-time of creation, e.g. `10/14/2026, 9:30:00 AM`.
    pub fn display_time(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(dt) => dt.format("%m/%d/%Y, %-I:%M:%S %p").to_string(),
            None => "unknown time".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    sessions: Vec<SavedSession>,
}

impl History {
    pub fn sessions(&self) -> &[SavedSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn latest(&self) -> Option<&SavedSession> {
        self.sessions.first()
    }

    pub fn prepend(&mut self, session: SavedSession) {
        self.sessions.insert(0, session);
    }
}
