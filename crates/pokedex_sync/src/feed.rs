//! Change notification for front ends.
//!
//! Every committed mutation of the engine emits a [`PokedexEvent`] to all
//! subscribers. Views subscribe once and re-query when an event arrives.
//!
//! ```rust,ignore
//! let events = pokedex.subscribe();
//! std::thread::spawn(move || {
//!     while let Ok(event) = events.recv() {
//!         println!("changed: {event:?}");
//!     }
//! });
//! ```

use parking_lot::RwLock;
use pokedex_core::PokemonId;
use std::sync::mpsc::{self, Receiver, Sender};

/// A committed change to the cached set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokedexEvent {
    /// A batch of records was merged into the store.
    Upserted {
        /// Rows created by the batch.
        inserted: usize,
        /// Existing rows refreshed by the batch.
        updated: usize,
    },
    /// A favorite flag was written.
    FavoriteChanged {
        /// Affected record.
        id: PokemonId,
        /// New flag value.
        is_favorite: bool,
    },
    /// Every row was deleted.
    Cleared,
    /// A remote sync completed.
    Refreshed {
        /// Records fetched from the remote.
        count: usize,
    },
    /// A remote sync failed.
    SyncFailed {
        /// Error message.
        message: String,
    },
}

/// Distributes [`PokedexEvent`]s to subscribers.
///
/// Events arrive in emission order. Disconnected receivers are dropped on
/// the next emit.
#[derive(Debug, Default)]
pub struct EventFeed {
    subscribers: RwLock<Vec<Sender<PokedexEvent>>>,
}

impl EventFeed {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a receiver for all future events.
    pub fn subscribe(&self) -> Receiver<PokedexEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub fn emit(&self, event: PokedexEvent) {
        tracing::trace!(?event, "emitting event");
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
