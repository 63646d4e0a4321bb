//! Persisted row type.

use serde::{Deserialize, Serialize};

/// Primary key of a stored record.
pub type RecordId = i64;

/// A single persisted row.
///
/// Every attribute except `id` and `is_favorite` is optional, the way an
/// object-graph store leaves attributes unset. `types` and `stats` are opaque
/// encoded blobs; the store never interprets them.
///
/// A row with a missing attribute or an undecodable blob is *malformed*.
/// Callers decide how to surface such rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, immutable primary key.
    pub id: RecordId,
    /// Display name.
    pub name: Option<String>,
    /// Artwork URI.
    pub image_url: Option<String>,
    /// Encoded category tags.
    pub types: Option<Vec<u8>>,
    /// Encoded stat map.
    pub stats: Option<Vec<u8>>,
    /// Favorite flag layered onto the row.
    pub is_favorite: bool,
}

impl Record {
    /// Creates an empty, non-favorite row with the given id.
    #[must_use]
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            name: None,
            image_url: None,
            types: None,
            stats: None,
            is_favorite: false,
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the image URI.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the encoded types blob.
    #[must_use]
    pub fn with_types(mut self, blob: Vec<u8>) -> Self {
        self.types = Some(blob);
        self
    }

    /// Sets the encoded stats blob.
    #[must_use]
    pub fn with_stats(mut self, blob: Vec<u8>) -> Self {
        self.stats = Some(blob);
        self
    }

    /// Sets the favorite flag.
    #[must_use]
    pub const fn with_favorite(mut self, value: bool) -> Self {
        self.is_favorite = value;
        self
    }

    /// Returns true if every optional attribute is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.image_url.is_some() && self.types.is_some() && self.stats.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        let record = Record::new(7);
        assert_eq!(record.id, 7);
        assert!(!record.is_favorite);
        assert!(!record.is_complete());
    }

    #[test]
    fn builder_fills_every_attribute() {
        let record = Record::new(1)
            .with_name("bulbasaur")
            .with_image_url("https://img/1.png")
            .with_types(vec![0x80])
            .with_stats(vec![0xa0])
            .with_favorite(true);

        assert!(record.is_complete());
        assert!(record.is_favorite);
        assert_eq!(record.name.as_deref(), Some("bulbasaur"));
    }
}
