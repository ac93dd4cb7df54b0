//! Seeded level selection and world/key-tier placement.
//!
//! Selection runs in three passes over the rank-sorted catalog:
//! 1. reservoir-sample `slots` catalog positions with [`NexusRng`],
//! 2. sort the sampled positions so each block of 16 holds similar ranks,
//! 3. place each block into the worlds, four levels per world, letting every
//!    level take its most tiled world that still has room.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, LevelRecord, World};
use crate::error::{NexusError, Result};
use crate::keys::{KeyTier, tier_for_slot};
use crate::rng::NexusRng;

/// Slots handled together when placing levels into worlds.
pub const BLOCK_SLOTS: usize = 16;
/// Levels each world receives from a single block.
pub const WORLD_SLOTS_PER_BLOCK: usize = 4;

/// A catalog level placed behind one door slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: usize,
    pub level: String,
    pub tier: KeyTier,
    /// Position of the level in the rank-sorted catalog.
    pub catalog_index: usize,
}

/// Check that `slots` doors can be filled from `catalog`.
///
/// # Errors
///
/// Returns an error if `slots` is not a non-zero multiple of
/// [`BLOCK_SLOTS`] or the catalog holds fewer levels than `slots`.
pub fn check_slot_count(catalog: &Catalog, slots: usize) -> Result<()> {
    if slots == 0 || slots % BLOCK_SLOTS != 0 {
        return Err(NexusError::SlotCountNotMultiple { slots });
    }
    if catalog.len() < slots {
        return Err(NexusError::CatalogTooSmall {
            catalog: catalog.len(),
            slots,
        });
    }
    Ok(())
}

/// Select `slots` levels for `seed` and place them into door slots.
///
/// The result is a pure function of the seed text, the catalog contents, and
/// the slot count.
///
/// # Errors
///
/// See [`check_slot_count`].
pub fn select(seed: &str, catalog: &Catalog, slots: usize) -> Result<Vec<SlotAssignment>> {
    check_slot_count(catalog, slots)?;

    let mut rng = NexusRng::from_seed_text(seed);
    let mut indexes = reservoir_indexes(&mut rng, catalog.len(), slots);
    indexes.sort_unstable();
    log::debug!(
        "seed {seed:?}: sampled {slots} of {} levels using {} draws",
        catalog.len(),
        rng.draws()
    );

    Ok(place_by_world(catalog, &indexes))
}

/// Reservoir-sample `slots` positions out of `0..catalog_len`.
///
/// The reservoir starts as the first `slots` positions; each later position
/// `i` replaces a random entry when the unit draw does not exceed
/// `slots / (i + 1)`.
#[allow(clippy::cast_precision_loss)]
pub fn reservoir_indexes(rng: &mut NexusRng, catalog_len: usize, slots: usize) -> Vec<usize> {
    let mut indexes: Vec<usize> = (0..slots).collect();
    for i in slots..catalog_len {
        if rng.unit() > slots as f64 / (i + 1) as f64 {
            continue;
        }
        let victim = rng.below(slots);
        indexes[victim] = i;
    }
    indexes
}

/// Place sorted catalog positions into slots block by block.
///
/// World `w` owns slots `w * slots / 4 ..`; block `b` fills four slots of
/// every world starting at `b * 4`.
#[must_use]
pub fn place_by_world(catalog: &Catalog, indexes: &[usize]) -> Vec<SlotAssignment> {
    let slots = indexes.len();
    let world_span = slots / World::ALL.len();
    let mut placed: Vec<Option<usize>> = vec![None; slots];

    for (block, chunk) in indexes.chunks(BLOCK_SLOTS).enumerate() {
        let mut fill = [0usize; 4];
        for &index in chunk {
            let Some(world) = pick_world(&catalog[index], &fill) else {
                continue;
            };
            let w = world.index();
            let slot = w * world_span + block * WORLD_SLOTS_PER_BLOCK + fill[w];
            placed[slot] = Some(index);
            fill[w] += 1;
        }
        log::debug!("block {block} placed with world fill {fill:?}");
    }

    let assignments: Vec<SlotAssignment> = placed
        .into_iter()
        .enumerate()
        .filter_map(|(slot, index)| {
            index.map(|index| SlotAssignment {
                slot,
                level: catalog[index].name.clone(),
                tier: tier_for_slot(slot),
                catalog_index: index,
            })
        })
        .collect();
    debug_assert_eq!(assignments.len(), slots, "every slot receives a level");
    assignments
}

fn pick_world(level: &LevelRecord, fill: &[usize; 4]) -> Option<World> {
    level
        .world_preference()
        .into_iter()
        .find(|world| fill[world.index()] < WORLD_SLOTS_PER_BLOCK)
}
