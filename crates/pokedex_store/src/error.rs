//! Error types for record store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to encode the store snapshot.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Failed to decode the store snapshot.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// Another process holds the store lock.
    #[error("store is locked by another process: {path:?}")]
    Locked {
        /// Path of the lock file.
        path: PathBuf,
    },

    /// The store file is corrupted.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
