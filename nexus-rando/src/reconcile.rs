//! Score-store reconciliation of key types against the current door layout.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::keys::KeyRemap;
use crate::select::SlotAssignment;

/// Stored personal best for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Completion grade.
    pub thorough: i32,
    /// Style grade.
    pub finesse: i32,
    pub time: f32,
    pub key_type: i32,
}

/// Host-provided persistence for per-level scores.
pub trait ScoreStore {
    /// Stored record for `level`, or `None` when it was never completed.
    fn lookup(&self, level: &str) -> Option<ScoreRecord>;

    /// Overwrite the stored record for `level`.
    fn set(&mut self, level: &str, record: ScoreRecord);
}

/// A key-type rewrite issued during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCorrection {
    pub level: String,
    pub from: i32,
    pub to: i32,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Levels with a stored record.
    pub checked: usize,
    /// Levels that were never completed.
    pub missing: usize,
    pub corrections: Vec<KeyCorrection>,
}

impl ReconcileReport {
    #[must_use]
    pub fn writes(&self) -> usize {
        self.corrections.len()
    }
}

/// Rewrite stored key types so each level holds its expected key.
///
/// `expected` yields `(level, stored key value)` pairs with any remap already
/// applied. Only the key type is ever changed; levels without a record are
/// skipped.
pub fn reconcile_keys<'a, S>(
    expected: impl IntoIterator<Item = (&'a str, i32)>,
    store: &mut S,
) -> ReconcileReport
where
    S: ScoreStore + ?Sized,
{
    let mut report = ReconcileReport::default();
    for (level, key_type) in expected {
        let Some(record) = store.lookup(level) else {
            report.missing += 1;
            continue;
        };
        report.checked += 1;
        if record.key_type == key_type {
            continue;
        }
        log::info!(
            "correcting key type of {level:?} from {} to {key_type}",
            record.key_type
        );
        store.set(level, ScoreRecord { key_type, ..record });
        report.corrections.push(KeyCorrection {
            level: level.to_string(),
            from: record.key_type,
            to: key_type,
        });
    }
    report
}

/// Reconcile a seeded assignment table.
pub fn reconcile<S>(assignments: &[SlotAssignment], remap: KeyRemap, store: &mut S) -> ReconcileReport
where
    S: ScoreStore + ?Sized,
{
    reconcile_keys(
        assignments
            .iter()
            .map(|a| (a.level.as_str(), remap.stored_tier(a.tier))),
        store,
    )
}

/// In-memory score store keyed by level name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryScoreStore {
    records: BTreeMap<String, ScoreRecord>,
    #[serde(skip)]
    writes: usize,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping level names to records.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the records as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn insert(&mut self, level: impl Into<String>, record: ScoreRecord) {
        self.records.insert(level.into(), record);
    }

    #[must_use]
    pub fn get(&self, level: &str) -> Option<&ScoreRecord> {
        self.records.get(level)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes issued through [`ScoreStore::set`].
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryScoreStore {
    fn lookup(&self, level: &str) -> Option<ScoreRecord> {
        self.records.get(level).copied()
    }

    fn set(&mut self, level: &str, record: ScoreRecord) {
        self.writes += 1;
        self.records.insert(level.to_string(), record);
    }
}
