//! Error types for the sync engine.

use pokedex_core::PokemonId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request did not complete within the configured timeout.
    #[error("operation timed out")]
    Timeout,

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] pokedex_store::StoreError),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] pokedex_core::CoreError),

    /// Nothing is stored that could fight the chosen entity.
    #[error("no opponent available for {player_id}")]
    NoOpponent {
        /// The player's id.
        player_id: PokemonId,
    },
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Timeout => true,
            SyncError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}
