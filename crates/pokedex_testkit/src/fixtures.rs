//! Entity fixtures and engine helpers.
//!
//! Provides the well-known starter entities used across the test suites and
//! convenience constructors for engines over temporary stores.

use pokedex_core::{BattlePacing, Pokemon, PokemonId, ATTACK_STAT};
use pokedex_store::{FileStore, InMemoryStore};
use pokedex_sync::{MockSource, Pokedex, SyncConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds an entity with one type, an attack stat and a stable image url.
pub fn mon(id: PokemonId, name: &str, kind: &str, attack: i32) -> Pokemon {
    Pokemon::new(id, name)
        .with_image_url(format!("https://img.test/{id}.png"))
        .with_type(kind)
        .with_stat(ATTACK_STAT, attack)
}

/// Bulbasaur, grass/poison, attack 49.
pub fn bulbasaur() -> Pokemon {
    mon(1, "bulbasaur", "grass", 49)
        .with_type("poison")
        .with_stat("defense", 49)
}

/// Charmander, fire, attack 52.
pub fn charmander() -> Pokemon {
    mon(4, "charmander", "fire", 52).with_stat("defense", 43)
}

/// Squirtle, water, attack 48.
pub fn squirtle() -> Pokemon {
    mon(7, "squirtle", "water", 48).with_stat("defense", 65)
}

/// Pikachu, electric, attack 55.
pub fn pikachu() -> Pokemon {
    mon(25, "pikachu", "electric", 55).with_stat("defense", 40)
}

/// The four starters in ascending id order.
pub fn starters() -> Vec<Pokemon> {
    vec![bulbasaur(), charmander(), squirtle(), pikachu()]
}

/// `count` generated entities with ids `1..=count`, cycling through a few
/// types and attack values.
pub fn roster(count: usize) -> Vec<Pokemon> {
    const KINDS: [&str; 5] = ["grass", "fire", "water", "electric", "normal"];
    (1..=count)
        .map(|i| {
            let kind = KINDS[i % KINDS.len()];
            mon(i as PokemonId, &format!("mon-{i:04}"), kind, (i * 7 % 150) as i32)
        })
        .collect()
}

/// A configuration with zero battle delays.
pub fn test_config() -> SyncConfig {
    SyncConfig::default().with_battle_pacing(BattlePacing::instant())
}

/// An engine over an empty in-memory store serving `remote`.
pub fn memory_pokedex(remote: Vec<Pokemon>) -> Pokedex<InMemoryStore, MockSource> {
    Pokedex::new(
        test_config(),
        InMemoryStore::new(),
        MockSource::with_pokemon(remote),
    )
}

/// A temporary directory holding a store file path.
pub struct TempStore {
    dir: TempDir,
}

impl TempStore {
    /// Creates a fresh temporary directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the store file inside the directory.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("pokedex.cbor")
    }

    /// Opens a [`FileStore`] at [`path`](Self::path).
    pub fn open(&self) -> FileStore {
        FileStore::open(&self.path()).expect("Failed to open file store")
    }

    /// Opens an engine over the file store serving `remote`.
    pub fn pokedex(&self, remote: Vec<Pokemon>) -> Pokedex<FileStore, MockSource> {
        Pokedex::new(test_config(), self.open(), MockSource::with_pokemon(remote))
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with an engine over a temporary file store.
pub fn with_file_pokedex<F, R>(remote: Vec<Pokemon>, f: F) -> R
where
    F: FnOnce(&Pokedex<FileStore, MockSource>, &TempStore) -> R,
{
    let temp = TempStore::new();
    let dex = temp.pokedex(remote);
    f(&dex, &temp)
}
