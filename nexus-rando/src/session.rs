//! Seed-scoped selection cache and the session tying catalog, doors, and
//! configuration together.
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::NexusConfig;
use crate::doors::{DoorId, SlotIndex};
use crate::error::{NexusError, Result};
use crate::keys::KeyTier;
use crate::reconcile::{ReconcileReport, ScoreStore, reconcile};
use crate::select::{SlotAssignment, check_slot_count, select};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    seed: String,
    catalog: u64,
    slots: usize,
}

/// Memo of the last computed assignment table.
#[derive(Debug, Clone, Default)]
pub struct SelectionCache {
    key: Option<CacheKey>,
    assignments: Vec<SlotAssignment>,
    computations: u64,
}

impl SelectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assignments for `seed`, computing them only when the seed, catalog,
    /// or slot count differ from the cached entry.
    ///
    /// # Errors
    ///
    /// Propagates selection errors; the cache is left empty in that case.
    pub fn get_or_select(
        &mut self,
        seed: &str,
        catalog: &Catalog,
        slots: usize,
    ) -> Result<&[SlotAssignment]> {
        let key = CacheKey {
            seed: seed.to_string(),
            catalog: catalog.fingerprint(),
            slots,
        };
        if self.key.as_ref() != Some(&key) {
            self.invalidate();
            self.assignments = select(seed, catalog, slots)?;
            self.computations += 1;
            log::info!("computed door mapping for seed {seed:?}");
            self.key = Some(key);
        }
        Ok(&self.assignments)
    }

    /// Drop the cached table.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.assignments.clear();
    }

    #[must_use]
    pub fn is_cached(&self, seed: &str) -> bool {
        self.key.as_ref().is_some_and(|key| key.seed == seed)
    }

    /// Number of times the selector actually ran.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.computations
    }
}

/// One door of the randomized nexus, ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPlan {
    pub slot: usize,
    pub door: DoorId,
    pub level: String,
    pub tier: KeyTier,
    pub author: String,
    /// Key-type value the score store should hold for this level.
    pub stored_key: i32,
}

/// Randomizer state for the lifetime of one nexus visit.
#[derive(Debug, Clone)]
pub struct NexusSession {
    catalog: Catalog,
    doors: SlotIndex,
    config: NexusConfig,
    seed: String,
    cache: SelectionCache,
}

impl NexusSession {
    /// Build a session, checking the door enumeration against the catalog.
    ///
    /// The session selects from `catalog` narrowed by `config.filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the door count does
    /// not match `config.slot_count`, or the filtered catalog is too small.
    pub fn new(catalog: Catalog, doors: SlotIndex, config: NexusConfig) -> Result<Self> {
        config.validate()?;
        if doors.len() != config.slot_count {
            return Err(NexusError::DoorCountMismatch {
                doors: doors.len(),
                slots: config.slot_count,
            });
        }
        let catalog = config.filter.apply(&catalog, config.slot_count)?;
        check_slot_count(&catalog, config.slot_count)?;
        Ok(Self {
            catalog,
            doors,
            config,
            seed: String::new(),
            cache: SelectionCache::new(),
        })
    }

    /// Session over the built-in catalog and the stock nexus doors.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn stock(config: NexusConfig) -> Result<Self> {
        Self::new(Catalog::builtin().clone(), SlotIndex::stock(), config)
    }

    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Whether a non-empty seed is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.seed.is_empty()
    }

    /// Switch to `seed`, discarding the cached table if it changed.
    /// Returns `true` when the seed changed.
    pub fn set_seed(&mut self, seed: impl Into<String>) -> bool {
        let seed = seed.into();
        if seed == self.seed {
            return false;
        }
        log::debug!("seed changed from {:?} to {seed:?}", self.seed);
        self.seed = seed;
        self.cache.invalidate();
        true
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn doors(&self) -> &SlotIndex {
        &self.doors
    }

    #[must_use]
    pub const fn config(&self) -> &NexusConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &SelectionCache {
        &self.cache
    }

    /// Assignment table for the active seed, or `None` with no seed set.
    ///
    /// # Errors
    ///
    /// Propagates selection errors.
    pub fn assignments(&mut self) -> Result<Option<&[SlotAssignment]>> {
        if self.seed.is_empty() {
            return Ok(None);
        }
        self.cache
            .get_or_select(&self.seed, &self.catalog, self.config.slot_count)
            .map(Some)
    }

    /// Assignment for one slot.
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::SlotOutOfRange`] for a slot outside the table.
    pub fn assignment(&mut self, slot: usize) -> Result<Option<&SlotAssignment>> {
        let Some(assignments) = self.assignments()? else {
            return Ok(None);
        };
        let len = assignments.len();
        assignments
            .get(slot)
            .map(Some)
            .ok_or(NexusError::SlotOutOfRange { index: slot, len })
    }

    /// Assignment for the slot a door occupies.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown door or a misaligned table.
    pub fn assignment_for_door(&mut self, door: DoorId) -> Result<Option<&SlotAssignment>> {
        let slot = self.doors.slot_of(door)?;
        self.assignment(slot)
    }

    /// Correct stored key types for the active seed.
    ///
    /// # Errors
    ///
    /// Propagates selection errors.
    pub fn reconcile<S>(&mut self, store: &mut S) -> Result<Option<ReconcileReport>>
    where
        S: ScoreStore + ?Sized,
    {
        let remap = self.config.remap();
        let Some(assignments) = self.assignments()? else {
            return Ok(None);
        };
        Ok(Some(reconcile(assignments, remap, store)))
    }

    /// Full door plan for the active seed.
    ///
    /// # Errors
    ///
    /// Propagates selection errors.
    pub fn plan(&mut self) -> Result<Option<Vec<SlotPlan>>> {
        if self.seed.is_empty() {
            return Ok(None);
        }
        let remap = self.config.remap();
        let assignments =
            self.cache
                .get_or_select(&self.seed, &self.catalog, self.config.slot_count)?;
        let plan = assignments
            .iter()
            .zip(self.doors.doors())
            .map(|(assignment, &door)| SlotPlan {
                slot: assignment.slot,
                door,
                level: assignment.level.clone(),
                tier: assignment.tier,
                author: self.catalog[assignment.catalog_index].author.clone(),
                stored_key: remap.stored_tier(assignment.tier),
            })
            .collect();
        Ok(Some(plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LevelRecord;
    use crate::reconcile::{MemoryScoreStore, ScoreRecord};

    fn small_catalog(count: u32) -> Catalog {
        Catalog::new(
            (0..count)
                .map(|k| LevelRecord::new(format!("L{k}"), [k % 3, k % 5, k % 7, 1, 0], f64::from(k)))
                .collect(),
        )
        .unwrap()
    }

    fn small_session() -> NexusSession {
        let config = NexusConfig {
            slot_count: 16,
            ..NexusConfig::default()
        };
        let doors = SlotIndex::new((100..116).map(DoorId).collect());
        NexusSession::new(small_catalog(30), doors, config).unwrap()
    }

    #[test]
    fn empty_seed_is_pass_through() {
        let mut session = small_session();
        assert!(!session.is_active());
        assert!(session.assignments().unwrap().is_none());
        assert!(session.plan().unwrap().is_none());
        let mut store = MemoryScoreStore::new();
        assert!(session.reconcile(&mut store).unwrap().is_none());
        assert_eq!(session.cache().computations(), 0);
    }

    #[test]
    fn same_seed_hits_cache() {
        let mut session = small_session();
        assert!(session.set_seed("ABC"));
        let first = session.assignments().unwrap().unwrap().to_vec();
        assert!(!session.set_seed("ABC"));
        let second = session.assignments().unwrap().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(session.cache().computations(), 1);
        assert!(session.cache().is_cached("ABC"));
    }

    #[test]
    fn new_seed_invalidates_cache() {
        let mut session = small_session();
        session.set_seed("ABC");
        session.assignments().unwrap();
        session.set_seed("XYZ");
        assert!(!session.cache().is_cached("ABC"));
        session.assignments().unwrap();
        assert_eq!(session.cache().computations(), 2);
        assert!(session.cache().is_cached("XYZ"));
    }

    #[test]
    fn door_lookups_follow_enumeration() {
        let mut session = small_session();
        session.set_seed("DOOR");
        let by_slot = session.assignment(3).unwrap().unwrap().clone();
        let by_door = session.assignment_for_door(DoorId(103)).unwrap().unwrap();
        assert_eq!(by_door, &by_slot);
        assert!(matches!(
            session.assignment(16),
            Err(NexusError::SlotOutOfRange { index: 16, len: 16 })
        ));
        assert!(matches!(
            session.assignment_for_door(DoorId(7)),
            Err(NexusError::UnknownDoor { .. })
        ));
    }

    #[test]
    fn construction_checks_alignment() {
        let config = NexusConfig {
            slot_count: 16,
            ..NexusConfig::default()
        };
        let doors = SlotIndex::new((0..15).map(DoorId).collect());
        assert!(matches!(
            NexusSession::new(small_catalog(30), doors, config.clone()),
            Err(NexusError::DoorCountMismatch { doors: 15, slots: 16 })
        ));
        let doors = SlotIndex::new((0..16).map(DoorId).collect());
        assert!(matches!(
            NexusSession::new(small_catalog(10), doors, config),
            Err(NexusError::CatalogTooSmall { .. })
        ));
    }

    #[test]
    fn config_filter_narrows_the_session_catalog() {
        let mut config = NexusConfig {
            slot_count: 16,
            ..NexusConfig::default()
        };
        config.filter.min_difficulty = 1000;
        config.filter.banned_levels = vec!["L29".to_string()];
        let doors = SlotIndex::new((100..116).map(DoorId).collect());
        let mut session = NexusSession::new(small_catalog(30), doors, config.clone()).unwrap();
        // 29 levels survive the ban; the window pinned to the top keeps L13..L28.
        assert_eq!(session.catalog().len(), 16);
        assert_eq!(session.catalog()[0].name, "L13");
        session.set_seed("TOP");
        let assignments = session.assignments().unwrap().unwrap();
        assert!(assignments.iter().all(|a| a.level != "L29"));

        config.filter.blocked_authors = vec![String::new()];
        config.filter.required_authors = vec!["nobody".to_string()];
        let doors = SlotIndex::new((100..116).map(DoorId).collect());
        assert!(matches!(
            NexusSession::new(small_catalog(30), doors, config),
            Err(NexusError::CatalogTooSmall { catalog: 0, slots: 16 })
        ));
    }

    #[test]
    fn reconcile_uses_session_seed() {
        let mut session = small_session();
        session.set_seed("KEYS");
        let plan = session.plan().unwrap().unwrap();
        let mut store = MemoryScoreStore::new();
        for entry in &plan {
            store.insert(
                entry.level.clone(),
                ScoreRecord {
                    thorough: 1,
                    finesse: 1,
                    time: 1.0,
                    key_type: 0,
                },
            );
        }
        let report = session.reconcile(&mut store).unwrap().unwrap();
        // Stored zero only matches nothing: wood slots expect 4, others 1..3.
        assert_eq!(report.writes(), 16);
        for entry in &plan {
            assert_eq!(store.get(&entry.level).unwrap().key_type, entry.stored_key);
        }
        let again = session.reconcile(&mut store).unwrap().unwrap();
        assert_eq!(again.writes(), 0);
    }
}
