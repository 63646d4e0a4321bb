//! Name search, type filter and stable sorting.
//!
//! Filtering is done with plain iterator adapters over already-loaded
//! entities; there is no query language.
//!
//! ```
//! use pokedex_core::{apply_filter, Pokemon, SortOption};
//!
//! let all = vec![
//!     Pokemon::new(1, "bulbasaur").with_type("grass"),
//!     Pokemon::new(4, "charmander").with_type("fire"),
//! ];
//! let fire = apply_filter(&all, "", "Fire", SortOption::Name);
//! assert_eq!(fire[0].name, "charmander");
//! ```

use crate::error::CoreError;
use crate::pokemon::Pokemon;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Keyword that disables the type filter.
const ALL_TYPES: &str = "All";

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Name, case-insensitive ascending.
    #[default]
    Name,
    /// Attack stat, descending; a missing stat counts as 0.
    Strength,
}

impl FromStr for SortOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "strength" | "attack" => Ok(Self::Strength),
            _ => Err(CoreError::UnknownSort(s.to_string())),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Strength => f.write_str("strength"),
        }
    }
}

/// Restricts results to one category tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// No restriction.
    #[default]
    All,
    /// Entities carrying this tag, compared case-insensitively.
    Only(String),
}

impl TypeFilter {
    /// Returns true if `pokemon` passes the filter.
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        match self {
            Self::All => true,
            Self::Only(tag) => pokemon.has_type(tag),
        }
    }
}

impl From<&str> for TypeFilter {
    /// `"All"` (any case) and the empty string disable the filter.
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_TYPES) {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_TYPES),
            Self::Only(tag) => f.write_str(tag),
        }
    }
}

/// A complete list query: search text, type filter and sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Case-insensitive substring of the name; empty matches everything.
    pub search: String,
    /// Category restriction.
    pub type_filter: TypeFilter,
    /// Result ordering.
    pub sort: SortOption,
}

impl FilterQuery {
    /// Creates a query that matches everything, sorted by name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Sets the type filter.
    #[must_use]
    pub fn type_filter(mut self, filter: impl Into<TypeFilter>) -> Self {
        self.type_filter = filter.into();
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Returns true if `pokemon` passes both the search and type filter.
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        let search = self.search.to_lowercase();
        name_matches(pokemon, &search) && self.type_filter.matches(pokemon)
    }

    /// Filters and sorts `entities`.
    ///
    /// The sort is stable: entries with equal keys keep their input order.
    pub fn apply<'a, I>(&self, entities: I) -> Vec<Pokemon>
    where
        I: IntoIterator<Item = &'a Pokemon>,
    {
        let search = self.search.to_lowercase();
        let mut out: Vec<Pokemon> = entities
            .into_iter()
            .filter(|p| name_matches(p, &search) && self.type_filter.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortOption::Name => out.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortOption::Strength => out.sort_by(|a, b| by_strength(a, b)),
        }
        out
    }
}

/// Filters `entities` by name substring and type tag, then sorts them.
///
/// `type_filter` of `"All"` disables the type restriction.
pub fn apply_filter(
    entities: &[Pokemon],
    search_text: &str,
    type_filter: &str,
    sort: SortOption,
) -> Vec<Pokemon> {
    FilterQuery::new()
        .search(search_text)
        .type_filter(type_filter)
        .sort(sort)
        .apply(entities)
}

fn name_matches(pokemon: &Pokemon, lowered_search: &str) -> bool {
    lowered_search.is_empty() || pokemon.name.to_lowercase().contains(lowered_search)
}

fn by_strength(a: &Pokemon, b: &Pokemon) -> Ordering {
    b.attack().cmp(&a.attack())
}
