//! Nexus scripts: swap the scene's level doors for their randomized
//! counterparts and keep stored key types in line with the new layout.
use std::collections::HashMap;

use crate::config::{LevelInfo, NexusConfig};
use crate::doors::DoorId;
use crate::error::Result;
use crate::host::{DoorEntity, NewDoor, SceneHost, Steppable};
use crate::keys::KeyRemap;
use crate::reconcile::{ReconcileReport, ScoreStore, reconcile_keys};
use crate::session::NexusSession;
use crate::widgets::AuthorPlacard;

/// Doors reported by the host that still need processing, plus the
/// first-frame sweep flag.
#[derive(Debug, Clone)]
struct DoorQueue {
    first_frame: bool,
    pending: Vec<DoorId>,
}

impl DoorQueue {
    const fn new() -> Self {
        Self {
            first_frame: true,
            pending: Vec::new(),
        }
    }

    /// Doors to process this frame: queued additions, then every known door
    /// on the first frame after a load.
    fn drain(&mut self, known: &[DoorId]) -> Vec<DoorId> {
        let mut doors = std::mem::take(&mut self.pending);
        if self.first_frame {
            self.first_frame = false;
            doors.extend_from_slice(known);
        }
        doors
    }
}

/// Seeded nexus: every template door leads to the level the selector
/// assigned to its slot.
#[derive(Debug, Clone)]
pub struct SeededNexus {
    session: NexusSession,
    queue: DoorQueue,
}

impl SeededNexus {
    #[must_use]
    pub const fn new(session: NexusSession) -> Self {
        Self {
            session,
            queue: DoorQueue::new(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &NexusSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut NexusSession {
        &mut self.session
    }

    /// Reconcile stored key types when the nexus loads.
    ///
    /// # Errors
    ///
    /// Propagates selection errors.
    pub fn on_level_start<S>(&mut self, store: &mut S) -> Result<Option<ReconcileReport>>
    where
        S: ScoreStore + ?Sized,
    {
        self.session.reconcile(store)
    }

    /// Queue a freshly added entity if it is one of the nexus doors.
    pub fn entity_on_add(&mut self, id: DoorId) {
        if self.session.doors().contains(id) {
            self.queue.pending.push(id);
        }
    }

    /// Re-run the full door sweep on the next step.
    pub const fn checkpoint_load(&mut self) {
        self.queue.first_frame = true;
    }

    fn process_door(&mut self, host: &mut dyn SceneHost, door: &DoorEntity) {
        // Only template doors (no level set) are rewritten.
        if !door.is_level_door() || !door.file_name.is_empty() {
            return;
        }
        let (level, catalog_index) = match self.session.assignment_for_door(door.id) {
            Ok(Some(assignment)) => (assignment.level.clone(), assignment.catalog_index),
            Ok(None) => return,
            Err(err) => {
                log::warn!("skipping door {}: {err}", door.id);
                return;
            }
        };
        log::debug!("door {} -> {level}", door.id);
        host.replace_door(
            door.id,
            NewDoor {
                x: door.x,
                y: door.y,
                layer: door.layer,
                file_name: level,
                door_set: door.door_set,
                display_name: String::new(),
            },
        );

        let author = &self.session.catalog()[catalog_index].author;
        if !author.is_empty() {
            host.add_placard(AuthorPlacard::new(author.clone(), door.x, door.y));
        }
    }
}

impl Steppable for SeededNexus {
    fn step(&mut self, host: &mut dyn SceneHost) {
        let known = self.session.doors().doors().to_vec();
        for id in self.queue.drain(&known) {
            if let Some(door) = host.door(id) {
                self.process_door(host, &door);
            }
        }
    }
}

/// Manual nexus: each door is configured individually through
/// [`LevelInfo`] entries.
#[derive(Debug, Clone)]
pub struct ManualNexus {
    levels: Vec<LevelInfo>,
    index: HashMap<DoorId, usize>,
    remap: KeyRemap,
    queue: DoorQueue,
}

impl ManualNexus {
    #[must_use]
    pub fn new(levels: Vec<LevelInfo>, remap: KeyRemap) -> Self {
        let index = levels
            .iter()
            .enumerate()
            .map(|(i, info)| (info.door_id, i))
            .collect();
        Self {
            levels,
            index,
            remap,
            queue: DoorQueue::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &NexusConfig) -> Self {
        Self::new(config.levels.clone(), config.remap())
    }

    #[must_use]
    pub fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    /// Reconcile stored key types against each door's `key_get`.
    pub fn on_level_start<S>(&self, store: &mut S) -> ReconcileReport
    where
        S: ScoreStore + ?Sized,
    {
        let remap = self.remap;
        reconcile_keys(
            self.levels
                .iter()
                .filter(|info| !info.level.is_empty())
                .map(|info| (info.level.as_str(), remap.stored_key(info.key_get))),
            store,
        )
    }

    pub fn entity_on_add(&mut self, id: DoorId) {
        if self.index.contains_key(&id) {
            self.queue.pending.push(id);
        }
    }

    pub const fn checkpoint_load(&mut self) {
        self.queue.first_frame = true;
    }

    fn process_door(&mut self, host: &mut dyn SceneHost, door: &DoorEntity) {
        if !door.is_level_door() {
            return;
        }
        let Some(&i) = self.index.get(&door.id) else {
            return;
        };
        let info = &mut self.levels[i];

        if info.level.is_empty() {
            info.level.clone_from(&door.file_name);
        }
        if info.door_sprite == 0 {
            info.door_sprite = door.door_set;
        }
        if info.display_name.is_empty() {
            info.display_name.clone_from(&door.display_name);
        }

        if !info.author.is_empty() {
            let author = std::mem::take(&mut info.author);
            host.add_placard(AuthorPlacard::new(author, door.x, door.y));
        }

        if info.level == door.file_name
            && info.door_sprite == door.door_set
            && info.display_name == door.display_name
        {
            return;
        }

        host.replace_door(
            door.id,
            NewDoor {
                x: door.x,
                y: door.y,
                layer: door.layer,
                file_name: info.level.clone(),
                door_set: info.door_sprite,
                display_name: info.display_name.clone(),
            },
        );
    }
}

impl Steppable for ManualNexus {
    fn step(&mut self, host: &mut dyn SceneHost) {
        let known: Vec<DoorId> = self.levels.iter().map(|info| info.door_id).collect();
        for id in self.queue.drain(&known) {
            if let Some(door) = host.door(id) {
                self.process_door(host, &door);
            }
        }
    }
}
