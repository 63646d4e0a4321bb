//! # Pokedex Core
//!
//! Entity model, record codec, filtering and battle simulation.
//!
//! This crate is pure: it performs no I/O. It provides:
//! - [`Pokemon`], the creature entity, and its sentinel placeholder
//! - [`RecordCodec`], the mapping between entities and stored rows
//! - [`FilterQuery`] / [`apply_filter`], name search + type filter + stable sort
//! - [`BattleSession`], a deterministic step-driven two-party battle
//!
//! ## Key Invariants
//!
//! - An entity's `id` is immutable and unique within a store
//! - The favorite flag is part of the row, never a separate entity
//! - Filtering never reorders entries with equal sort keys
//! - Battle resolution has no randomness; only opponent choice is random

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod battle;
mod codec;
mod error;
pub mod filter;
mod pokemon;

pub use battle::{
    choose_opponent, BattleEvent, BattleOutcome, BattlePacing, BattlePhase, BattleSession,
    BattleStep, HealthBand, Side,
};
pub use codec::{decode_or_sentinel, RecordCodec};
pub use error::{BattleError, BattleResult, CoreError, CoreResult};
pub use filter::{apply_filter, FilterQuery, SortOption, TypeFilter};
pub use pokemon::{Pokemon, PokemonId, ATTACK_STAT, SENTINEL_ID, SENTINEL_NAME};
