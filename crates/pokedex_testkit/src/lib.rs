//! # Pokedex Testkit
//!
//! Test utilities for the Pokedex workspace.
//!
//! This crate provides:
//! - Entity fixtures and engine helpers over in-memory and file stores
//! - A fault-injecting [`RecordStore`](pokedex_store::RecordStore) wrapper
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pokedex_testkit::prelude::*;
//!
//! #[test]
//! fn favorites_survive_sync() {
//!     let dex = memory_pokedex(starters());
//!     dex.ensure_populated().unwrap();
//!     assert!(dex.set_favorite(&bulbasaur(), true));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faults::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faults::*;
pub use fixtures::*;
pub use generators::*;
