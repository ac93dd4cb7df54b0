//! Narrowing the catalog before selection.
//!
//! Levels are first dropped by name and author, then a difficulty window cuts
//! a contiguous rank band out of what is left. The window is widened until it
//! holds at least one level per slot whenever the catalog allows it.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

use crate::catalog::{Catalog, LevelRecord};
use crate::error::{NexusError, Result};

/// Difficulty bounds are given in thousandths of the filtered catalog.
pub const DIFFICULTY_SCALE: u32 = 1000;

/// Level and author filters plus the difficulty window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    /// Start of the window, `0..=1000`.
    pub min_difficulty: u32,
    /// End of the window, `0..=1000`.
    pub max_difficulty: u32,
    /// Level names never selected.
    pub banned_levels: Vec<String>,
    /// Authors whose levels are never selected. Case-insensitive.
    pub blocked_authors: Vec<String>,
    /// When non-empty, only levels by these authors are selected.
    pub required_authors: Vec<String>,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            min_difficulty: 0,
            max_difficulty: DIFFICULTY_SCALE,
            banned_levels: Vec::new(),
            blocked_authors: Vec::new(),
            required_authors: Vec::new(),
        }
    }
}

fn author_key(author: &str) -> String {
    author.trim().to_lowercase()
}

fn author_set(authors: &[String]) -> HashSet<String> {
    authors
        .iter()
        .map(|author| author_key(author))
        .filter(|author| !author.is_empty())
        .collect()
}

impl CatalogFilter {
    /// Whether applying the filter leaves every catalog unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.min_difficulty == 0
            && self.max_difficulty >= DIFFICULTY_SCALE
            && self.banned_levels.is_empty()
            && author_set(&self.blocked_authors).is_empty()
            && author_set(&self.required_authors).is_empty()
    }

    /// # Errors
    ///
    /// Returns [`NexusError::InvalidConfig`] if a difficulty bound exceeds
    /// [`DIFFICULTY_SCALE`].
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("min_difficulty", self.min_difficulty),
            ("max_difficulty", self.max_difficulty),
        ] {
            if value > DIFFICULTY_SCALE {
                return Err(NexusError::InvalidConfig(format!(
                    "{field} {value} must be at most {DIFFICULTY_SCALE}"
                )));
            }
        }
        Ok(())
    }

    /// Filtered copy of `catalog` sized for a `slots`-door nexus.
    ///
    /// The result may still be smaller than `slots` when the name and author
    /// filters leave too few levels; selection reports that case.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn apply(&self, catalog: &Catalog, slots: usize) -> Result<Catalog> {
        self.validate()?;
        if self.is_identity() {
            return Ok(catalog.clone());
        }

        let banned: HashSet<&str> = self.banned_levels.iter().map(String::as_str).collect();
        let blocked = author_set(&self.blocked_authors);
        let required = author_set(&self.required_authors);
        let admits = |level: &LevelRecord| {
            if banned.contains(level.name.as_str()) {
                return false;
            }
            let author = author_key(&level.author);
            if !required.is_empty() && !required.contains(&author) {
                return false;
            }
            !blocked.contains(&author)
        };
        let kept: Vec<LevelRecord> = catalog
            .levels()
            .iter()
            .filter(|level| admits(*level))
            .cloned()
            .collect();

        let window = difficulty_window(
            kept.len(),
            self.min_difficulty,
            self.max_difficulty,
            slots,
        );
        log::info!(
            "catalog filter kept {} of {} levels, difficulty window {window:?}",
            kept.len(),
            catalog.len()
        );
        let levels = kept
            .into_iter()
            .skip(window.start)
            .take(window.len())
            .collect();
        Ok(Catalog::from_sorted(levels))
    }
}

/// Rank positions covered by the `min..max` per-mille window over `len`
/// levels.
///
/// Bounds round half to even and are clamped to `0..=len`; an inverted window
/// collapses onto its end. The window then grows by one level at each side
/// per step until it spans `slots` levels or the whole catalog.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn difficulty_window(len: usize, min: u32, max: u32, slots: usize) -> Range<usize> {
    let bound = |per_mille: u32| {
        let scaled = f64::from(per_mille) / f64::from(DIFFICULTY_SCALE) * len as f64;
        // non-negative and at most `len` before the clamp
        (scaled.round_ties_even() as usize).min(len)
    };
    let mut end = bound(max);
    let mut start = bound(min).min(end);
    while end - start < slots && (start > 0 || end < len) {
        if end < len {
            end += 1;
        }
        if start > 0 {
            start -= 1;
        }
    }
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authored(count: u32) -> Catalog {
        let levels = (0..count)
            .map(|k| {
                let author = match k % 3 {
                    0 => "Alpha",
                    1 => " beta ",
                    _ => "",
                };
                LevelRecord::new(format!("F{k:02}"), [1, 0, 0, 0, 0], f64::from(k))
                    .with_author(author)
            })
            .collect();
        Catalog::new(levels).unwrap()
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.levels().iter().map(|level| level.name.as_str()).collect()
    }

    #[test]
    fn window_rounds_half_to_even() {
        // 0.25 * 10 = 2.5 -> 2, 0.75 * 10 = 7.5 -> 8
        assert_eq!(difficulty_window(10, 250, 750, 4), 2..8);
        // 0.35 * 10 = 3.5 -> 4
        assert_eq!(difficulty_window(10, 350, 1000, 2), 4..10);
        assert_eq!(difficulty_window(200, 0, 1000, 64), 0..200);
    }

    #[test]
    fn window_widens_to_fit_the_slots() {
        assert_eq!(difficulty_window(200, 500, 500, 64), 68..132);
        // Pinned to the top, growth continues downwards only.
        assert_eq!(difficulty_window(200, 1000, 1000, 64), 136..200);
        // Inverted bounds collapse onto the end before widening.
        assert_eq!(difficulty_window(100, 900, 100, 16), 2..18);
    }

    #[test]
    fn window_stops_at_the_whole_catalog() {
        assert_eq!(difficulty_window(10, 400, 600, 64), 0..10);
        assert_eq!(difficulty_window(0, 0, 1000, 16), 0..0);
    }

    #[test]
    fn default_filter_is_identity() {
        let catalog = authored(30);
        let filter = CatalogFilter::default();
        assert!(filter.is_identity());
        assert_eq!(filter.apply(&catalog, 16).unwrap(), catalog);
    }

    #[test]
    fn banned_levels_and_blocked_authors_are_dropped() {
        let catalog = authored(12);
        let filter = CatalogFilter {
            banned_levels: vec!["F02".to_string(), "missing".to_string()],
            blocked_authors: vec!["BETA".to_string()],
            ..CatalogFilter::default()
        };
        let filtered = filter.apply(&catalog, 4).unwrap();
        assert_eq!(
            names(&filtered),
            ["F00", "F03", "F05", "F06", "F08", "F09", "F11"]
        );
        assert_ne!(filtered.fingerprint(), catalog.fingerprint());
    }

    #[test]
    fn required_authors_keep_only_their_levels() {
        let catalog = authored(9);
        let filter = CatalogFilter {
            required_authors: vec!["  alpha".to_string(), String::new()],
            ..CatalogFilter::default()
        };
        assert_eq!(names(&filter.apply(&catalog, 2).unwrap()), ["F00", "F03", "F06"]);
    }

    #[test]
    fn window_applies_after_filtering() {
        let catalog = authored(40);
        let filter = CatalogFilter {
            min_difficulty: 500,
            max_difficulty: 1000,
            banned_levels: (0..10).map(|k| format!("F{k:02}")).collect(),
            ..CatalogFilter::default()
        };
        // 30 remain; 0.5 * 30 = 15, so the window keeps F25..F39.
        let filtered = filter.apply(&catalog, 8).unwrap();
        assert_eq!(filtered.len(), 15);
        assert_eq!(filtered[0].name, "F25");
        assert_eq!(filtered[14].name, "F39");
    }

    #[test]
    fn validate_rejects_out_of_scale_bounds() {
        let filter = CatalogFilter {
            max_difficulty: 1001,
            ..CatalogFilter::default()
        };
        assert!(matches!(
            filter.apply(&authored(4), 4),
            Err(NexusError::InvalidConfig(message)) if message.contains("max_difficulty")
        ));
    }
}
