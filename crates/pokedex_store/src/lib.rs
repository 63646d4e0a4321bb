//! # Pokedex Store
//!
//! Record store trait and implementations for the Pokedex cache.
//!
//! This crate provides the lowest-level persistence abstraction. Stores hold
//! [`Record`] rows keyed by numeric id and know nothing about how the
//! `types`/`stats` blobs inside a row are encoded; `pokedex_core` owns that.
//!
//! ## Design Principles
//!
//! - A store is a narrow key-indexed interface: fetch, upsert, delete-all, save
//! - Writes are staged in a working view and become durable on [`RecordStore::save`]
//! - Reads observe staged writes
//! - Stores must be `Send + Sync` so an engine can share them behind an `Arc`
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For tests and ephemeral sessions
//! - [`FileStore`] - Persists committed rows as a CBOR snapshot file
//!
//! ## Example
//!
//! ```rust
//! use pokedex_store::{InMemoryStore, Record, RecordStore};
//!
//! let store = InMemoryStore::new();
//! store.upsert(Record::new(25).with_name("pikachu")).unwrap();
//! store.save().unwrap();
//! assert_eq!(store.fetch_one(25).unwrap().unwrap().name.as_deref(), Some("pikachu"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod record;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use record::{Record, RecordId};
pub use store::{Predicate, RecordStore};
