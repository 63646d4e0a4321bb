//! Error types for the Pokedex core.

use crate::pokemon::PokemonId;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for battle operations.
pub type BattleResult<T> = Result<T, BattleError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] pokedex_store::StoreError),

    /// A stored row is missing a required attribute.
    #[error("record {id} is missing {field}")]
    MissingField {
        /// The row id.
        id: PokemonId,
        /// The missing attribute.
        field: &'static str,
    },

    /// A stored blob could not be encoded or decoded.
    #[error("codec error in {field}: {message}")]
    Codec {
        /// The attribute being encoded or decoded.
        field: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// An unrecognised sort option was requested.
    #[error("unknown sort option: {0} (expected `name` or `strength`)")]
    UnknownSort(String),
}

impl CoreError {
    /// Creates a codec error.
    pub fn codec(field: &'static str, message: impl Into<String>) -> Self {
        Self::Codec {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised by the battle state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// The session has not been started.
    #[error("battle has not started")]
    NotStarted,

    /// The session already has a winner.
    #[error("battle is already finished")]
    Finished,
}
