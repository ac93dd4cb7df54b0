//! Nexus Randomizer Core
//!
//! Seeded selection of custom levels for the 64-door nexus hub. A seed string
//! deterministically picks levels from a ranked catalog, places them behind
//! doors by tile-set affinity, and fixes stored key types so progress matches
//! the new layout. Host integration goes through the traits in [`host`] and
//! [`reconcile::ScoreStore`].

pub mod catalog;
pub mod config;
pub mod doors;
pub mod error;
pub mod filter;
pub mod host;
pub mod keys;
pub mod nexus;
pub mod reconcile;
pub mod rng;
pub mod seed_entry;
pub mod select;
pub mod session;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use catalog::{Catalog, LevelRecord, TileSet, World};
pub use config::{LevelInfo, NexusConfig, NexusMode};
pub use doors::{DoorId, STOCK_DOORS, SlotIndex, StockDoor};
pub use error::{NexusError, Result};
pub use filter::{CatalogFilter, difficulty_window};
pub use host::{Activatable, Canvas, DoorEntity, Drawable, NewDoor, SceneHost, Steppable};
pub use keys::{KeyRemap, KeyTier, tier_for_slot};
pub use nexus::{ManualNexus, SeededNexus};
pub use reconcile::{
    KeyCorrection, MemoryScoreStore, ReconcileReport, ScoreRecord, ScoreStore, reconcile,
    reconcile_keys,
};
pub use rng::{NexusRng, fold_seed};
pub use seed_entry::{SeedEntry, SeedKey, random_seed};
pub use select::{SlotAssignment, select};
pub use session::{NexusSession, SelectionCache, SlotPlan};
pub use widgets::{AuthorPlacard, SeedDisplay, ToggleLayer};
