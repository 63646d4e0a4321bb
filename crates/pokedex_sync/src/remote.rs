//! Remote record source.
//!
//! The REST API exposes a paginated list of references and one detail
//! document per record. This module defines the wire shapes, their pure
//! mapping into [`Pokemon`], and the [`PokemonSource`] trait the engine
//! consumes.

use crate::error::{SyncError, SyncResult};
use parking_lot::RwLock;
use pokedex_core::{Pokemon, PokemonId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Public PokeAPI endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// A source of creature records.
///
/// This trait abstracts the network layer so the engine can run against
/// HTTP, a fixture, or a scripted mock.
pub trait PokemonSource: Send + Sync {
    /// Lists up to `limit` record references.
    fn fetch_list(&self, limit: u32) -> SyncResult<Vec<ListEntry>>;

    /// Resolves one reference into a full record.
    fn fetch_detail(&self, url: &str) -> SyncResult<Pokemon>;

    /// Lists up to `limit` references and resolves each of them in order.
    ///
    /// Fails as a whole if any single detail request fails.
    fn fetch_all(&self, limit: u32) -> SyncResult<Vec<Pokemon>> {
        let entries = self.fetch_list(limit)?;
        let mut pokemon = Vec::with_capacity(entries.len());
        for entry in &entries {
            tracing::debug!(name = %entry.name, "resolving detail");
            pokemon.push(self.fetch_detail(&entry.url)?);
        }
        Ok(pokemon)
    }
}

/// Body of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Record references.
    pub results: Vec<ListEntry>,
}

/// A single record reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Record name.
    pub name: String,
    /// Detail document URL.
    pub url: String,
}

/// Body of the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResponse {
    /// Record id.
    pub id: PokemonId,
    /// Record name.
    pub name: String,
    /// Sprite collection.
    pub sprites: Sprites,
    /// Type slots.
    pub types: Vec<TypeSlot>,
    /// Stat entries.
    pub stats: Vec<StatEntry>,
}

/// Sprite collection of a detail document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    /// Alternative artwork sets.
    #[serde(default)]
    pub other: OtherSprites,
}

/// Alternative artwork sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    /// Official artwork.
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

/// One artwork set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Front-facing image URL; null for some forms.
    pub front_default: Option<String>,
}

/// A type slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    /// The named type.
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// A stat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Base value.
    pub base_stat: i32,
    /// The named stat.
    pub stat: NamedResource,
}

/// A `{name}` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name.
    pub name: String,
}

impl From<DetailResponse> for Pokemon {
    fn from(detail: DetailResponse) -> Self {
        let mut pokemon = Pokemon::new(detail.id, detail.name)
            .with_image_url(detail.sprites.other.official_artwork.front_default.unwrap_or_default());
        pokemon.types = detail.types.into_iter().map(|slot| slot.kind.name).collect();
        pokemon.stats = detail
            .stats
            .into_iter()
            .map(|entry| (entry.stat.name, entry.base_stat))
            .collect();
        pokemon
    }
}

/// Scheme used for the detail URLs handed out by [`MockSource`].
const MOCK_URL_PREFIX: &str = "mock://pokemon/";

/// A scripted source for testing.
#[derive(Debug, Default)]
pub struct MockSource {
    pokemon: RwLock<Vec<Pokemon>>,
    failure: RwLock<Option<String>>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl MockSource {
    /// Creates an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock source serving `pokemon`.
    pub fn with_pokemon(pokemon: Vec<Pokemon>) -> Self {
        let source = Self::new();
        source.set_pokemon(pokemon);
        source
    }

    /// Replaces the served records.
    pub fn set_pokemon(&self, pokemon: Vec<Pokemon>) {
        *self.pokemon.write() = pokemon;
    }

    /// Makes every request fail with a retryable transport error, or
    /// clears the failure with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write() = message.map(str::to_string);
    }

    /// Number of list requests served.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of detail requests served.
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> SyncResult<()> {
        match self.failure.read().as_ref() {
            Some(message) => Err(SyncError::transport_retryable(message.clone())),
            None => Ok(()),
        }
    }
}

impl PokemonSource for MockSource {
    fn fetch_list(&self, limit: u32) -> SyncResult<Vec<ListEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .pokemon
            .read()
            .iter()
            .take(limit as usize)
            .map(|p| ListEntry {
                name: p.name.clone(),
                url: format!("{MOCK_URL_PREFIX}{}", p.id),
            })
            .collect())
    }

    fn fetch_detail(&self, url: &str) -> SyncResult<Pokemon> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let id: PokemonId = url
            .strip_prefix(MOCK_URL_PREFIX)
            .and_then(|rest| rest.parse().ok())
            .ok_or_else(|| SyncError::transport_fatal(format!("unknown url: {url}")))?;
        self.pokemon
            .read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(SyncError::Http {
                status: 404,
                url: url.to_string(),
            })
    }
}
