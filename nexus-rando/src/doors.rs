//! Door enumeration for the stock nexus and the door-to-slot index.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::catalog::World;
use crate::error::{NexusError, Result};
use crate::keys::KeyTier;

/// Entity ID of a level door in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorId(pub u32);

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sprite family a door set is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSprite {
    World(World),
    Tutorial,
}

/// Sprite family and key tier for each door set value, indexed by door set.
/// Door set 0 is not a valid door.
pub const DOOR_SETS: [Option<(DoorSprite, KeyTier)>; 27] = [
    None,
    Some((DoorSprite::World(World::Mansion), KeyTier::Wood)),
    Some((DoorSprite::World(World::Mansion), KeyTier::Gold)),
    Some((DoorSprite::World(World::Mansion), KeyTier::Red)),
    Some((DoorSprite::World(World::Mansion), KeyTier::Wood)),
    Some((DoorSprite::World(World::Forest), KeyTier::Wood)),
    Some((DoorSprite::World(World::Forest), KeyTier::Gold)),
    Some((DoorSprite::World(World::Forest), KeyTier::Red)),
    Some((DoorSprite::World(World::Forest), KeyTier::Wood)),
    Some((DoorSprite::World(World::Forest), KeyTier::Wood)),
    Some((DoorSprite::World(World::Forest), KeyTier::Gold)),
    Some((DoorSprite::World(World::Forest), KeyTier::Red)),
    Some((DoorSprite::World(World::Forest), KeyTier::Wood)),
    Some((DoorSprite::World(World::City), KeyTier::Wood)),
    Some((DoorSprite::World(World::City), KeyTier::Gold)),
    Some((DoorSprite::World(World::City), KeyTier::Red)),
    Some((DoorSprite::World(World::City), KeyTier::Wood)),
    Some((DoorSprite::World(World::Laboratory), KeyTier::Wood)),
    Some((DoorSprite::World(World::Laboratory), KeyTier::Gold)),
    Some((DoorSprite::World(World::Laboratory), KeyTier::Red)),
    Some((DoorSprite::World(World::Laboratory), KeyTier::Wood)),
    Some((DoorSprite::Tutorial, KeyTier::Wood)),
    Some((DoorSprite::World(World::Mansion), KeyTier::Silver)),
    Some((DoorSprite::World(World::Forest), KeyTier::Silver)),
    Some((DoorSprite::World(World::City), KeyTier::Silver)),
    Some((DoorSprite::World(World::Laboratory), KeyTier::Silver)),
    Some((DoorSprite::World(World::Forest), KeyTier::Silver)),
];

/// Look up the sprite family and key tier drawn for a door set.
#[must_use]
pub fn door_set_info(door_set: i32) -> Option<(DoorSprite, KeyTier)> {
    usize::try_from(door_set)
        .ok()
        .and_then(|index| DOOR_SETS.get(index).copied().flatten())
}

/// A level door in the stock nexus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDoor {
    pub id: DoorId,
    /// Stock level the door leads to.
    pub level: &'static str,
    pub door_set: i32,
}

impl StockDoor {
    const fn new(id: u32, level: &'static str, door_set: i32) -> Self {
        Self {
            id: DoorId(id),
            level,
            door_set,
        }
    }
}

/// The 64 stock level doors in slot order: sixteen per world, each world
/// split into four key groups of four.
pub const STOCK_DOORS: [StockDoor; 64] = [
    StockDoor::new(1627, "downhill", 5),
    StockDoor::new(1629, "shadedgrove", 5),
    StockDoor::new(1640, "dahlia", 5),
    StockDoor::new(1644, "fields", 5),
    StockDoor::new(1631, "momentum", 23),
    StockDoor::new(1639, "fireflyforest", 23),
    StockDoor::new(1642, "tunnels", 23),
    StockDoor::new(1645, "momentum2", 23),
    StockDoor::new(1646, "suntemple", 10),
    StockDoor::new(1649, "ascent", 10),
    StockDoor::new(1650, "summit", 10),
    StockDoor::new(1651, "grasscave", 10),
    StockDoor::new(1652, "den", 11),
    StockDoor::new(1653, "autumnforest", 11),
    StockDoor::new(1647, "garden", 11),
    StockDoor::new(1648, "hyperdifficult", 11),
    StockDoor::new(1657, "atrium", 1),
    StockDoor::new(1655, "secretpassage", 1),
    StockDoor::new(1659, "alcoves", 1),
    StockDoor::new(1660, "mezzanine", 1),
    StockDoor::new(1663, "cave", 22),
    StockDoor::new(1661, "cliffsidecaves", 22),
    StockDoor::new(1665, "library", 22),
    StockDoor::new(1666, "courtyard", 22),
    StockDoor::new(1668, "precarious", 2),
    StockDoor::new(1671, "treasureroom", 2),
    StockDoor::new(1670, "arena", 2),
    StockDoor::new(1673, "ramparts", 2),
    StockDoor::new(1676, "moontemple", 3),
    StockDoor::new(1681, "observatory", 3),
    StockDoor::new(1680, "parapets", 3),
    StockDoor::new(1679, "brimstone", 3),
    StockDoor::new(1684, "vacantlot", 13),
    StockDoor::new(1685, "sprawl", 13),
    StockDoor::new(1686, "development", 13),
    StockDoor::new(1687, "abandoned", 13),
    StockDoor::new(1688, "park", 24),
    StockDoor::new(1690, "boxes", 24),
    StockDoor::new(1694, "chemworld", 24),
    StockDoor::new(1692, "factory", 24),
    StockDoor::new(1701, "tunnel", 14),
    StockDoor::new(1702, "basement", 14),
    StockDoor::new(1697, "scaffold", 14),
    StockDoor::new(1700, "cityrun", 14),
    StockDoor::new(1703, "clocktower", 15),
    StockDoor::new(1704, "concretetemple", 15),
    StockDoor::new(1705, "alley", 15),
    StockDoor::new(1706, "hideout", 15),
    StockDoor::new(1708, "control", 17),
    StockDoor::new(1709, "ferrofluid", 17),
    StockDoor::new(1710, "titan", 17),
    StockDoor::new(1711, "satellite", 17),
    StockDoor::new(1712, "vat", 25),
    StockDoor::new(1714, "venom", 25),
    StockDoor::new(1716, "security", 25),
    StockDoor::new(1715, "mary", 25),
    StockDoor::new(1717, "wiringfixed", 18),
    StockDoor::new(1720, "containment", 18),
    StockDoor::new(1719, "orb", 18),
    StockDoor::new(1723, "pod", 18),
    StockDoor::new(1726, "mary2", 19),
    StockDoor::new(1724, "coretemple", 19),
    StockDoor::new(1730, "abyss", 19),
    StockDoor::new(1728, "dome", 19),
];

/// Door IDs of [`STOCK_DOORS`] in slot order.
#[must_use]
pub fn stock_door_ids() -> Vec<DoorId> {
    STOCK_DOORS.iter().map(|door| door.id).collect()
}

/// Maps door IDs to their slot in the door enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotIndex {
    doors: Vec<DoorId>,
    slots: HashMap<DoorId, usize>,
}

impl SlotIndex {
    #[must_use]
    pub fn new(doors: Vec<DoorId>) -> Self {
        let slots = doors
            .iter()
            .enumerate()
            .map(|(slot, door)| (*door, slot))
            .collect();
        Self { doors, slots }
    }

    #[must_use]
    pub fn stock() -> Self {
        Self::new(stock_door_ids())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    #[must_use]
    pub fn contains(&self, door: DoorId) -> bool {
        self.slots.contains_key(&door)
    }

    /// Slot index for a door.
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::UnknownDoor`] when the door is not enumerated.
    pub fn slot_of(&self, door: DoorId) -> Result<usize> {
        self.slots
            .get(&door)
            .copied()
            .ok_or(NexusError::UnknownDoor { door })
    }

    #[must_use]
    pub fn doors(&self) -> &[DoorId] {
        &self.doors
    }
}
