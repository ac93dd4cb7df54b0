//! On-screen keyboard state for typing a seed.
use rand::Rng;

use crate::config::NexusConfig;

/// Characters a seed may contain.
pub const SEED_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A key on the seed keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKey {
    Char(char),
    Clear,
    Backspace,
    Random,
    Enter,
}

/// Generate a random seed of `len` characters from [`SEED_ALPHABET`].
pub fn random_seed<R>(rng: &mut R, len: usize) -> String
where
    R: Rng + ?Sized,
{
    (0..len)
        .map(|_| char::from(SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())]))
        .collect()
}

/// Text being typed plus the limits it is held to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    text: String,
    max_len: usize,
    random_len: usize,
}

impl SeedEntry {
    #[must_use]
    pub fn new(max_len: usize, random_len: usize) -> Self {
        Self {
            text: String::new(),
            max_len,
            random_len: random_len.min(max_len),
        }
    }

    #[must_use]
    pub fn from_config(config: &NexusConfig) -> Self {
        Self::new(config.max_seed_len, config.random_seed_len)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply a key press. Returns the committed seed on [`SeedKey::Enter`].
    ///
    /// Lowercase letters are folded to uppercase; anything outside
    /// [`SEED_ALPHABET`] or past the length limit is ignored.
    pub fn press<R>(&mut self, key: SeedKey, rng: &mut R) -> Option<String>
    where
        R: Rng + ?Sized,
    {
        match key {
            SeedKey::Char(c) => {
                let c = c.to_ascii_uppercase();
                if c.is_ascii() && SEED_ALPHABET.contains(&(c as u8)) && self.text.len() < self.max_len
                {
                    self.text.push(c);
                }
            }
            SeedKey::Clear => self.text.clear(),
            SeedKey::Backspace => {
                self.text.pop();
            }
            SeedKey::Random => self.text = random_seed(rng, self.random_len),
            SeedKey::Enter => return Some(self.text.clone()),
        }
        None
    }
}

impl Default for SeedEntry {
    fn default() -> Self {
        Self::from_config(&NexusConfig::default())
    }
}
