//! Mapping between entities and stored rows.
//!
//! `types` and `stats` are stored as CBOR blobs: a text array and a
//! text-to-integer map. A row whose attributes are missing or whose blobs
//! don't decode is malformed; [`decode_or_sentinel`] substitutes the
//! sentinel entity for it instead of failing the whole load.

use crate::error::{CoreError, CoreResult};
use crate::pokemon::{Pokemon, PokemonId};
use pokedex_store::Record;
use std::collections::BTreeMap;

/// Trait for types that can be stored as rows in a record store.
///
/// Implementors must provide:
/// - `record_id()`: The stable, immutable primary key
/// - `to_record()`: Builds a complete row
/// - `from_record()`: Rebuilds the value, failing on malformed rows
/// - `refresh_record()`: Overwrites the mutable attributes of an existing row
pub trait RecordCodec: Sized {
    /// Returns the row's primary key.
    fn record_id(&self) -> PokemonId;

    /// Encodes the value into a complete row.
    fn to_record(&self) -> CoreResult<Record>;

    /// Decodes a value from a row.
    ///
    /// Fails if any attribute is missing or a blob does not decode.
    fn from_record(record: &Record) -> CoreResult<Self>;

    /// Overwrites the descriptive attributes of `record`, keeping any
    /// user-owned state such as the favorite flag.
    fn refresh_record(&self, record: &mut Record) -> CoreResult<()>;
}

impl RecordCodec for Pokemon {
    fn record_id(&self) -> PokemonId {
        self.id
    }

    fn to_record(&self) -> CoreResult<Record> {
        let mut record = Record::new(self.id).with_favorite(self.is_favorite);
        self.refresh_record(&mut record)?;
        Ok(record)
    }

    fn from_record(record: &Record) -> CoreResult<Self> {
        let missing = |field| CoreError::MissingField {
            id: record.id,
            field,
        };

        let name = record.name.clone().ok_or_else(|| missing("name"))?;
        let image_url = record.image_url.clone().ok_or_else(|| missing("image_url"))?;
        let types = decode_types(record.types.as_deref().ok_or_else(|| missing("types"))?)?;
        let stats = decode_stats(record.stats.as_deref().ok_or_else(|| missing("stats"))?)?;

        Ok(Pokemon {
            id: record.id,
            name,
            image_url,
            types,
            stats,
            is_favorite: record.is_favorite,
        })
    }

    fn refresh_record(&self, record: &mut Record) -> CoreResult<()> {
        record.name = Some(self.name.clone());
        record.image_url = Some(self.image_url.clone());
        record.types = Some(encode_types(&self.types)?);
        record.stats = Some(encode_stats(&self.stats)?);
        Ok(())
    }
}

/// Decodes a row, substituting the sentinel entity if the row is malformed.
pub fn decode_or_sentinel(record: &Record) -> Pokemon {
    match Pokemon::from_record(record) {
        Ok(pokemon) => pokemon,
        Err(e) => {
            tracing::warn!(id = record.id, error = %e, "unreadable record, substituting sentinel");
            Pokemon::sentinel()
        }
    }
}

fn encode_types(types: &[String]) -> CoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(types, &mut bytes).map_err(|e| CoreError::codec("types", e.to_string()))?;
    Ok(bytes)
}

fn decode_types(bytes: &[u8]) -> CoreResult<Vec<String>> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::codec("types", e.to_string()))
}

fn encode_stats(stats: &BTreeMap<String, i32>) -> CoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(stats, &mut bytes).map_err(|e| CoreError::codec("stats", e.to_string()))?;
    Ok(bytes)
}

fn decode_stats(bytes: &[u8]) -> CoreResult<BTreeMap<String, i32>> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::codec("stats", e.to_string()))
}
