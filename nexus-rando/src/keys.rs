//! Key tiers and the mapping onto the score store's key-type field.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key awarded for completing a level behind a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTier {
    Wood,
    Silver,
    Gold,
    Red,
}

impl KeyTier {
    pub const ALL: [Self; 4] = [Self::Wood, Self::Silver, Self::Gold, Self::Red];

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::Wood,
            1 => Self::Silver,
            2 => Self::Gold,
            _ => Self::Red,
        }
    }
}

impl fmt::Display for KeyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Wood => "wood",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Red => "red",
        };
        f.write_str(label)
    }
}

/// Key tier owned by a slot: slots come in runs of four per tier.
#[must_use]
pub const fn tier_for_slot(slot: usize) -> KeyTier {
    KeyTier::from_index(slot / 4)
}

/// `key_get` value meaning the level awards no key.
pub const KEY_GET_NONE: i32 = 4;

/// How an expected key value is rewritten before it is compared with the
/// score store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRemap {
    /// Tier 0 is stored as 4; tiers 1-3 are stored unchanged.
    #[default]
    Seeded,
    /// Per-level `key_get` values: 0 and 4 swap, 1-3 are unchanged.
    Manual,
}

impl KeyRemap {
    /// Key-type value the score store should hold for `key`.
    #[must_use]
    pub const fn stored_key(self, key: i32) -> i32 {
        match (self, key) {
            (_, 0) => 4,
            (Self::Manual, 4) => 0,
            (_, other) => other,
        }
    }

    /// Stored key-type value for a seeded slot tier.
    #[must_use]
    pub const fn stored_tier(self, tier: KeyTier) -> i32 {
        self.stored_key(tier.index() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_remap_only_moves_tier_zero() {
        let remap = KeyRemap::Seeded;
        assert_eq!(remap.stored_tier(KeyTier::Wood), 4);
        assert_eq!(remap.stored_tier(KeyTier::Silver), 1);
        assert_eq!(remap.stored_tier(KeyTier::Gold), 2);
        assert_eq!(remap.stored_tier(KeyTier::Red), 3);
    }

    #[test]
    fn manual_remap_swaps_zero_and_none() {
        let remap = KeyRemap::Manual;
        assert_eq!(remap.stored_key(0), 4);
        assert_eq!(remap.stored_key(KEY_GET_NONE), 0);
        for key in 1..4 {
            assert_eq!(remap.stored_key(key), key);
        }
        assert_eq!(KeyRemap::Seeded.stored_key(KEY_GET_NONE), KEY_GET_NONE);
    }

    #[test]
    fn tiers_repeat_every_sixteen_slots() {
        let tiers: Vec<_> = (0..20).map(tier_for_slot).collect();
        assert_eq!(tiers[0], KeyTier::Wood);
        assert_eq!(tiers[4], KeyTier::Silver);
        assert_eq!(tiers[11], KeyTier::Gold);
        assert_eq!(tiers[15], KeyTier::Red);
        assert_eq!(tiers[16], KeyTier::Wood);
    }
}
