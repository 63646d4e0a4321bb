//! # Pokedex Sync
//!
//! Remote fetch client and sync & filter engine for the Pokedex cache.
//!
//! This crate provides:
//! - [`PokemonSource`], the remote collaborator that lists and resolves records
//! - [`PokeApi`] over an injectable [`HttpClient`] (blocking `reqwest` by default)
//! - [`Pokedex`], the engine that merges fetched records into a
//!   [`RecordStore`](pokedex_store::RecordStore) and serves filtered views
//! - [`EventFeed`], explicit change notification for front ends
//!
//! ## Error policy
//!
//! Store failures never reach the caller: they are logged and degraded to
//! empty results or the sentinel entity. Remote failures are returned as
//! recoverable [`SyncError`]s and leave the store untouched.
//!
//! ## Example
//!
//! ```rust
//! use pokedex_core::Pokemon;
//! use pokedex_store::InMemoryStore;
//! use pokedex_sync::{MockSource, Pokedex, SyncConfig};
//!
//! let source = MockSource::with_pokemon(vec![Pokemon::new(1, "bulbasaur")]);
//! let pokedex = Pokedex::new(SyncConfig::default(), InMemoryStore::new(), source);
//!
//! let all = pokedex.ensure_populated().unwrap();
//! assert_eq!(all.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod feed;
mod http;
mod remote;

pub use config::{RetryConfig, SyncConfig};
pub use engine::{Pokedex, SyncReport, SyncStats, UpsertSummary};
pub use error::{SyncError, SyncResult};
pub use feed::{EventFeed, PokedexEvent};
#[cfg(feature = "http")]
pub use http::ReqwestClient;
pub use http::{HttpClient, PokeApi};
pub use remote::{
    DetailResponse, ListEntry, ListResponse, MockSource, PokemonSource, DEFAULT_API_BASE_URL,
};
