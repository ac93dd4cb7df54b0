//! Randomizer configuration loaded from JSON.
use serde::{Deserialize, Serialize};

use crate::doors::DoorId;
use crate::error::{NexusError, Result};
use crate::filter::CatalogFilter;
use crate::keys::{KEY_GET_NONE, KeyRemap};
use crate::select::BLOCK_SLOTS;

/// Which door-rewriting strategy the nexus runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NexusMode {
    /// Levels come from the seeded selector.
    #[default]
    Seeded,
    /// Levels and keys come from per-door entries in [`NexusConfig::levels`].
    Manual,
}

impl NexusMode {
    #[must_use]
    pub const fn default_remap(self) -> KeyRemap {
        match self {
            Self::Seeded => KeyRemap::Seeded,
            Self::Manual => KeyRemap::Manual,
        }
    }
}

/// Per-door override used in manual mode. Empty or zero fields are filled
/// from the original door the first time it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub door_id: DoorId,
    /// 0 wood, 1 silver, 2 gold, 3 red, 4 none.
    #[serde(default = "LevelInfo::default_key_get")]
    pub key_get: i32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub door_sprite: i32,
    #[serde(default)]
    pub display_name: String,
}

impl LevelInfo {
    const fn default_key_get() -> i32 {
        KEY_GET_NONE
    }

    #[must_use]
    pub fn new(door_id: DoorId) -> Self {
        Self {
            door_id,
            key_get: KEY_GET_NONE,
            author: String::new(),
            level: String::new(),
            door_sprite: 0,
            display_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NexusConfig {
    #[serde(default)]
    pub mode: NexusMode,
    #[serde(default = "NexusConfig::default_slot_count")]
    pub slot_count: usize,
    #[serde(default = "NexusConfig::default_max_seed_len")]
    pub max_seed_len: usize,
    #[serde(default = "NexusConfig::default_random_seed_len")]
    pub random_seed_len: usize,
    /// Overrides the remap implied by `mode`.
    #[serde(default)]
    pub key_remap: Option<KeyRemap>,
    /// Narrows the catalog before seeded selection.
    #[serde(default)]
    pub filter: CatalogFilter,
    #[serde(default)]
    pub levels: Vec<LevelInfo>,
}

impl NexusConfig {
    const fn default_slot_count() -> usize {
        64
    }

    const fn default_max_seed_len() -> usize {
        10
    }

    const fn default_random_seed_len() -> usize {
        6
    }

    /// Parse and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 || self.slot_count % BLOCK_SLOTS != 0 {
            return Err(NexusError::InvalidConfig(format!(
                "slot_count {} must be a non-zero multiple of {BLOCK_SLOTS}",
                self.slot_count
            )));
        }
        if self.max_seed_len == 0 {
            return Err(NexusError::InvalidConfig(
                "max_seed_len must be at least 1".to_string(),
            ));
        }
        if self.random_seed_len == 0 || self.random_seed_len > self.max_seed_len {
            return Err(NexusError::InvalidConfig(format!(
                "random_seed_len {} must be between 1 and max_seed_len {}",
                self.random_seed_len, self.max_seed_len
            )));
        }
        if let Some(info) = self.levels.iter().find(|info| !(0..=4).contains(&info.key_get)) {
            return Err(NexusError::InvalidConfig(format!(
                "door {} has key_get {} outside 0..=4",
                info.door_id, info.key_get
            )));
        }
        self.filter.validate()
    }

    /// Remap rule in effect for this configuration.
    #[must_use]
    pub fn remap(&self) -> KeyRemap {
        self.key_remap.unwrap_or_else(|| self.mode.default_remap())
    }
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            mode: NexusMode::default(),
            slot_count: Self::default_slot_count(),
            max_seed_len: Self::default_max_seed_len(),
            random_seed_len: Self::default_random_seed_len(),
            key_remap: None,
            filter: CatalogFilter::default(),
            levels: Vec::new(),
        }
    }
}
