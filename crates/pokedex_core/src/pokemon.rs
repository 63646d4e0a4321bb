//! The creature entity.

use pokedex_store::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a [`Pokemon`]; the primary key of its stored row.
pub type PokemonId = RecordId;

/// Name of the stat used for strength sorting and battle strikes.
pub const ATTACK_STAT: &str = "attack";

/// Id of the sentinel placeholder entity.
pub const SENTINEL_ID: PokemonId = -1;

/// Name of the sentinel placeholder entity.
pub const SENTINEL_NAME: &str = "DebugMon";

const SENTINEL_IMAGE_URL: &str = "https://example.com/debug.png";

/// A creature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Unique, immutable primary key.
    pub id: PokemonId,
    /// Lowercase API name, e.g. `"bulbasaur"`.
    pub name: String,
    /// Official artwork URI.
    pub image_url: String,
    /// Category tags in API order, e.g. `["grass", "poison"]`.
    pub types: Vec<String>,
    /// Base stats by name.
    pub stats: BTreeMap<String, i32>,
    /// Whether the user marked this entity as a favorite.
    #[serde(default)]
    pub is_favorite: bool,
}

impl Pokemon {
    /// Creates a non-favorite entity with no image, types or stats.
    pub fn new(id: PokemonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: String::new(),
            types: Vec::new(),
            stats: BTreeMap::new(),
            is_favorite: false,
        }
    }

    /// The fixed placeholder returned in place of unreadable data.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_ID, SENTINEL_NAME)
            .with_image_url(SENTINEL_IMAGE_URL)
            .with_type("Unknown")
            .with_stat(ATTACK_STAT, 0)
            .with_stat("defense", 0)
    }

    /// Returns true if this is the sentinel placeholder.
    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }

    /// Sets the image URI.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Appends a category tag.
    #[must_use]
    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.types.push(tag.into());
        self
    }

    /// Sets a stat value.
    #[must_use]
    pub fn with_stat(mut self, name: impl Into<String>, value: i32) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    /// Sets the favorite flag.
    #[must_use]
    pub fn with_favorite(mut self, value: bool) -> Self {
        self.is_favorite = value;
        self
    }

    /// Returns the named stat, if present.
    pub fn stat(&self, name: &str) -> Option<i32> {
        self.stats.get(name).copied()
    }

    /// Returns the attack stat, or 0 when absent.
    pub fn attack(&self) -> i32 {
        self.stat(ATTACK_STAT).unwrap_or(0)
    }

    /// Returns true if any tag equals `tag`, ignoring case.
    pub fn has_type(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.types.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// The name with every word capitalized: `"mr-mime"` becomes `"Mr-Mime"`.
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut at_word_start = true;
        for ch in self.name.chars() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = !ch.is_alphanumeric();
        }
        out
    }
}
