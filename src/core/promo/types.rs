//! Data model for the promotional calendar.
//!
//! Every field is opaque text: cost and retail price are never parsed as numbers.
//! Month entries are sparse. An absent entry behaves exactly like
//! [`PromoEntry::EMPTY`], which is what [`ChainPromotionRow::entry`] hands back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Status ──────────────────────────────────────────────────────────────────

/// Approval state of a single promotion entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionStatus {
    #[default]
    None,
    Waiting,
    Approved,
    Denied,
}

impl PromotionStatus {
    pub fn label(self) -> &'static str {
        match self {
            PromotionStatus::None => "None",
            PromotionStatus::Waiting => "Waiting",
            PromotionStatus::Approved => "Approved",
            PromotionStatus::Denied => "Denied",
        }
    }

    /// One-letter marker used in plain-text output.
    pub fn marker(self) -> Option<char> {
        match self {
            PromotionStatus::None => None,
            PromotionStatus::Waiting => Some('W'),
            PromotionStatus::Approved => Some('A'),
            PromotionStatus::Denied => Some('D'),
        }
    }
}

// ── Months ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Upper-case name, identical to the persisted key.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "JANUARY",
            Month::February => "FEBRUARY",
            Month::March => "MARCH",
            Month::April => "APRIL",
            Month::May => "MAY",
            Month::June => "JUNE",
            Month::July => "JULY",
            Month::August => "AUGUST",
            Month::September => "SEPTEMBER",
            Month::October => "OCTOBER",
            Month::November => "NOVEMBER",
            Month::December => "DECEMBER",
        }
    }

    pub fn short(self) -> &'static str {
        &self.name()[..3]
    }
}

// ── Chains ──────────────────────────────────────────────────────────────────

/// A retail account tracked on the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub id: String,
    pub name: String,
}

impl ChainConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The four accounts the planner ships with.
    pub fn defaults() -> Vec<ChainConfig> {
        vec![
            ChainConfig::new("motomart", "MOTOMART"),
            ChainConfig::new("rhodes", "RHODES"),
            ChainConfig::new("buchheits", "BUCHHEIT'S"),
            ChainConfig::new("hucks", "HUCK'S"),
        ]
    }
}

// ── Entries ─────────────────────────────────────────────────────────────────

/// Field set for one (chain, row, month) cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoEntry {
    pub pkg: String,
    pub cost: String,
    pub srp: String,
    pub notes: String,
    pub status: PromotionStatus,
}

impl PromoEntry {
    /// Canonical all-default entry.
    pub const EMPTY: PromoEntry = PromoEntry {
        pkg: String::new(),
        cost: String::new(),
        srp: String::new(),
        notes: String::new(),
        status: PromotionStatus::None,
    };

    /// Shared `'static` instance of [`PromoEntry::EMPTY`].
    pub fn empty_ref() -> &'static PromoEntry {
        &EMPTY_ENTRY
    }

    /// Overwrite exactly the field named by `edit`.
    pub fn apply(&mut self, edit: CellEdit) {
        match edit {
            CellEdit::Pkg(value) => self.pkg = value,
            CellEdit::Cost(value) => self.cost = value,
            CellEdit::Srp(value) => self.srp = value,
            CellEdit::Notes(value) => self.notes = value,
            CellEdit::Status(status) => self.status = status,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

static EMPTY_ENTRY: PromoEntry = PromoEntry::EMPTY;

/// A single-field edit of a [`PromoEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEdit {
    Pkg(String),
    Cost(String),
    Srp(String),
    Notes(String),
    Status(PromotionStatus),
}

// ── Rows ────────────────────────────────────────────────────────────────────

/// One promotion line of a chain, spanning all twelve months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPromotionRow {
    pub id: String,
    #[serde(default)]
    pub months: BTreeMap<Month, PromoEntry>,
}

impl ChainPromotionRow {
    pub fn empty(id: String) -> Self {
        Self {
            id,
            months: BTreeMap::new(),
        }
    }

    /// Entry for `month`, or [`PromoEntry::EMPTY`] when none was ever written.
    pub fn entry(&self, month: Month) -> &PromoEntry {
        self.months.get(&month).unwrap_or(PromoEntry::empty_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.months.values().all(PromoEntry::is_empty)
    }
}

// ── Library ─────────────────────────────────────────────────────────────────

/// Reusable promotion template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryPromotion {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pkg: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub srp: String,
}
