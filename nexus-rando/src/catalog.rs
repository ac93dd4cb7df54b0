//! Catalog of custom levels ordered by difficulty rank.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hasher;
use std::sync::OnceLock;
use twox_hash::XxHash64;

use crate::error::{NexusError, Result};

const BUILTIN_CATALOG_DATA: &str = include_str!("../data/catalog.json");

/// Number of tile categories tracked per level.
pub const TILE_SETS: usize = 5;

/// Tile categories counted in a level, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileSet {
    Forest,
    Mansion,
    City,
    Laboratory,
    Virtual,
}

impl TileSet {
    pub const ALL: [Self; TILE_SETS] = [
        Self::Forest,
        Self::Mansion,
        Self::City,
        Self::Laboratory,
        Self::Virtual,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The four worlds a nexus is split into. Virtual tiles never pick a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum World {
    Forest,
    Mansion,
    City,
    Laboratory,
}

impl World {
    pub const ALL: [Self; 4] = [Self::Forest, Self::Mansion, Self::City, Self::Laboratory];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn tile_set(self) -> TileSet {
        match self {
            Self::Forest => TileSet::Forest,
            Self::Mansion => TileSet::Mansion,
            Self::City => TileSet::City,
            Self::Laboratory => TileSet::Laboratory,
        }
    }
}

/// A single custom level available to the randomizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub name: String,
    /// Tile counts indexed by [`TileSet`].
    pub tiles: [u32; TILE_SETS],
    /// Difficulty ranking key; lower is easier.
    pub rank: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
}

impl LevelRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, tiles: [u32; TILE_SETS], rank: f64) -> Self {
        Self {
            name: name.into(),
            tiles,
            rank,
            author: String::new(),
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub const fn tile_count(&self, tile_set: TileSet) -> u32 {
        self.tiles[tile_set.index()]
    }

    /// Worlds ordered by descending tile count. Equal counts keep the lower
    /// world first.
    #[must_use]
    pub fn world_preference(&self) -> [World; 4] {
        let mut worlds = World::ALL;
        worlds.sort_by(|a, b| {
            self.tile_count(b.tile_set())
                .cmp(&self.tile_count(a.tile_set()))
        });
        worlds
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    levels: Vec<LevelRecord>,
}

/// Immutable list of levels sorted strictly ascending by rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    levels: Vec<LevelRecord>,
    #[serde(skip)]
    fingerprint: u64,
}

impl Catalog {
    /// Build a catalog, sorting by rank.
    ///
    /// # Errors
    ///
    /// Returns an error if a name repeats, a rank is not finite, or two levels
    /// share a rank.
    pub fn new(mut levels: Vec<LevelRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(levels.len());
        for level in &levels {
            if !level.rank.is_finite() {
                return Err(NexusError::InvalidRank {
                    name: level.name.clone(),
                });
            }
            if !seen.insert(level.name.as_str()) {
                return Err(NexusError::DuplicateLevel {
                    name: level.name.clone(),
                });
            }
        }
        levels.sort_by(|a, b| a.rank.total_cmp(&b.rank));
        if let Some(pair) = levels.windows(2).find(|pair| pair[0].rank == pair[1].rank) {
            return Err(NexusError::RankTie {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
        Ok(Self::from_sorted(levels))
    }

    /// Wrap levels already known to be valid and in rank order.
    pub(crate) fn from_sorted(levels: Vec<LevelRecord>) -> Self {
        let fingerprint = digest(&levels);
        Self {
            levels,
            fingerprint,
        }
    }

    /// Parse a catalog from its JSON form `{"levels": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the levels are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.levels)
    }

    /// The embedded catalog shipped with the crate.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::from_json(BUILTIN_CATALOG_DATA).unwrap_or_else(|err| {
                log::error!("embedded catalog failed to load: {err}");
                Self::from_sorted(Vec::new())
            })
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelRecord> {
        self.levels.get(index)
    }

    #[must_use]
    pub fn levels(&self) -> &[LevelRecord] {
        &self.levels
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&LevelRecord> {
        self.levels.iter().find(|level| level.name == name)
    }

    /// Digest over names, tiles, and ranks in rank order, computed when the
    /// catalog is built. Authors do not contribute.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Copy of the catalog with authors taken from a `level -> author` map.
    ///
    /// Levels missing from the map keep their current author; names the
    /// catalog does not know are logged and ignored.
    #[must_use]
    pub fn with_authors(&self, authors: &BTreeMap<String, String>) -> Self {
        let mut levels = self.levels.clone();
        let mut applied = 0usize;
        for level in &mut levels {
            if let Some(author) = authors.get(&level.name) {
                level.author.clone_from(author);
                applied += 1;
            }
        }
        if applied < authors.len() {
            log::warn!(
                "{} author entries name levels outside the catalog",
                authors.len() - applied
            );
        }
        log::debug!("applied {applied} authors to {} levels", levels.len());
        Self {
            levels,
            fingerprint: self.fingerprint,
        }
    }
}

fn digest(levels: &[LevelRecord]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for level in levels {
        hasher.write(level.name.as_bytes());
        hasher.write_u8(0);
        for count in level.tiles {
            hasher.write_u32(count);
        }
        hasher.write_u64(level.rank.to_bits());
    }
    hasher.finish()
}

impl std::ops::Index<usize> for Catalog {
    type Output = LevelRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.levels[index]
    }
}
