//! Error type shared by the catalog, selector, and host glue.
use thiserror::Error;

use crate::doors::DoorId;

/// Errors raised when randomizer inputs violate their preconditions.
#[derive(Debug, Error)]
pub enum NexusError {
    #[error("slot count {slots} must be a non-zero multiple of 16")]
    SlotCountNotMultiple { slots: usize },
    #[error("catalog holds {catalog} levels but {slots} slots need filling")]
    CatalogTooSmall { catalog: usize, slots: usize },
    #[error("level {name:?} appears more than once in the catalog")]
    DuplicateLevel { name: String },
    #[error("level {name:?} has a non-finite rank")]
    InvalidRank { name: String },
    #[error("levels {first:?} and {second:?} share a rank")]
    RankTie { first: String, second: String },
    #[error("door enumeration has {doors} doors but the assignment has {slots} slots")]
    DoorCountMismatch { doors: usize, slots: usize },
    #[error("slot {index} is outside the assignment table (len {len})")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("door {door} is not part of the door enumeration")]
    UnknownDoor { door: DoorId },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = NexusError> = std::result::Result<T, E>;
