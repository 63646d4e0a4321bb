//! The sync & filter engine.
//!
//! [`Pokedex`] owns the cached set: it merges fetched records into a
//! [`RecordStore`], keeps the user's favorite flags across syncs, serves
//! filtered views and hands out battle sessions.
//!
//! Store failures are logged and degraded. Reads fall back to the
//! sentinel entity, writes report `false` or a failed count. Only remote
//! failures are returned to the caller.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::feed::{EventFeed, PokedexEvent};
use crate::remote::PokemonSource;
use parking_lot::RwLock;
use pokedex_core::filter::FilterQuery;
use pokedex_core::{
    choose_opponent, decode_or_sentinel, BattleSession, CoreResult, Pokemon, PokemonId,
    RecordCodec,
};
use pokedex_store::{Record, RecordStore, StoreResult};
use rand::Rng;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a batch upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Rows created.
    pub inserted: usize,
    /// Existing rows refreshed.
    pub updated: usize,
    /// Entities that could not be written.
    pub failed: usize,
}

impl UpsertSummary {
    /// Number of entities written.
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Result of a remote sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Records received from the remote.
    pub fetched: usize,
    /// How they were merged.
    pub upsert: UpsertSummary,
    /// Wall time of fetch plus merge.
    pub duration: Duration,
}

/// Statistics about engine operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Remote syncs that completed.
    pub syncs_completed: u64,
    /// Total records received from the remote.
    pub records_fetched: u64,
    /// Remote fetches that failed.
    pub remote_failures: u64,
    /// Store operations that failed and were degraded.
    pub store_failures: u64,
    /// Completion time of the last successful sync.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// The sync & filter engine.
pub struct Pokedex<S: RecordStore, R: PokemonSource> {
    config: SyncConfig,
    store: Arc<S>,
    source: Arc<R>,
    feed: EventFeed,
    stats: RwLock<SyncStats>,
}

impl<S: RecordStore, R: PokemonSource> Pokedex<S, R> {
    /// Creates an engine over `store` and `source`.
    pub fn new(config: SyncConfig, store: S, source: R) -> Self {
        Self::with_shared(config, Arc::new(store), Arc::new(source))
    }

    /// Creates an engine over shared collaborators.
    pub fn with_shared(config: SyncConfig, store: Arc<S>, source: Arc<R>) -> Self {
        Self {
            config,
            store,
            source,
            feed: EventFeed::new(),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the remote source.
    pub fn source(&self) -> &Arc<R> {
        &self.source
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns a snapshot of the engine statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Subscribes to change events.
    pub fn subscribe(&self) -> Receiver<PokedexEvent> {
        self.feed.subscribe()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Returns every stored entity in ascending id order, or only the
    /// favorites.
    ///
    /// Never fails: a store error yields a single sentinel entity and each
    /// malformed row is replaced by the sentinel.
    pub fn load_all(&self, only_favorites: bool) -> Vec<Pokemon> {
        let favorites = |record: &Record| record.is_favorite;
        let rows = if only_favorites {
            self.store.fetch_all(Some(&favorites))
        } else {
            self.store.fetch_all(None)
        };

        match rows {
            Ok(rows) => rows.iter().map(decode_or_sentinel).collect(),
            Err(e) => {
                tracing::error!(error = %e, only_favorites, "failed to load records");
                self.record_store_failure(&e);
                vec![Pokemon::sentinel()]
            }
        }
    }

    /// Returns the stored entity with the given id.
    ///
    /// `None` when absent or when the store cannot be read.
    pub fn get(&self, id: PokemonId) -> Option<Pokemon> {
        match self.store.fetch_one(id) {
            Ok(row) => row.as_ref().map(decode_or_sentinel),
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to fetch record");
                self.record_store_failure(&e);
                None
            }
        }
    }

    /// Loads the cached set and applies `query` to it.
    pub fn query(&self, only_favorites: bool, query: &FilterQuery) -> Vec<Pokemon> {
        query.apply(&self.load_all(only_favorites))
    }

    /// Returns the stored favorite flag; false when absent or on error.
    pub fn is_favorite(&self, pokemon: &Pokemon) -> bool {
        match self.store.fetch_one(pokemon.id) {
            Ok(row) => row.is_some_and(|r| r.is_favorite),
            Err(e) => {
                tracing::warn!(id = pokemon.id, error = %e, "failed to read favorite flag");
                self.record_store_failure(&e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Merges `pokemon` into the store by id.
    ///
    /// Existing rows get their name, image, types and stats overwritten and
    /// keep their favorite flag; new rows are inserted unfavorited. All
    /// writes are committed with a single save. Repeating the call with the
    /// same input leaves the store unchanged.
    pub fn upsert_many(&self, pokemon: &[Pokemon]) -> UpsertSummary {
        let mut summary = UpsertSummary::default();

        for p in pokemon {
            match self.upsert_one(p) {
                Ok(true) => summary.inserted += 1,
                Ok(false) => summary.updated += 1,
                Err(e) => {
                    tracing::warn!(id = p.id, error = %e, "failed to stage record");
                    self.record_store_failure(&e);
                    summary.failed += 1;
                }
            }
        }

        if let Err(e) = self.store.save() {
            tracing::error!(error = %e, "failed to save upserted records");
            self.record_store_failure(&e);
            self.rollback();
            summary.failed += summary.written();
            summary.inserted = 0;
            summary.updated = 0;
            return summary;
        }

        tracing::debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            failed = summary.failed,
            "upsert complete"
        );
        if summary.written() > 0 {
            self.feed.emit(PokedexEvent::Upserted {
                inserted: summary.inserted,
                updated: summary.updated,
            });
        }
        summary
    }

    /// Stages one entity. Returns true if a row was created.
    fn upsert_one(&self, pokemon: &Pokemon) -> CoreResult<bool> {
        match self.store.fetch_one(pokemon.record_id())? {
            Some(mut record) => {
                pokemon.refresh_record(&mut record)?;
                self.store.upsert(record)?;
                Ok(false)
            }
            None => {
                let record = pokemon.to_record()?.with_favorite(false);
                self.store.upsert(record)?;
                Ok(true)
            }
        }
    }

    /// Writes the favorite flag of `pokemon`.
    ///
    /// A missing row is created from `pokemon` when `value` is true; clearing
    /// the flag of a missing row does nothing. Returns whether anything was
    /// written.
    pub fn set_favorite(&self, pokemon: &Pokemon, value: bool) -> bool {
        match self.try_set_favorite(pokemon, value) {
            Ok(true) => {
                tracing::debug!(id = pokemon.id, value, "favorite updated");
                self.feed.emit(PokedexEvent::FavoriteChanged {
                    id: pokemon.id,
                    is_favorite: value,
                });
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(id = pokemon.id, error = %e, "failed to update favorite");
                self.record_store_failure(&e);
                self.rollback();
                false
            }
        }
    }

    fn try_set_favorite(&self, pokemon: &Pokemon, value: bool) -> CoreResult<bool> {
        let record = match self.store.fetch_one(pokemon.id)? {
            Some(mut record) => {
                record.is_favorite = value;
                record
            }
            None if value => pokemon.to_record()?.with_favorite(true),
            None => return Ok(false),
        };
        self.store.upsert(record)?;
        self.store.save()?;
        Ok(true)
    }

    /// Flips the stored favorite flag and returns the stored value.
    pub fn toggle_favorite(&self, pokemon: &Pokemon) -> bool {
        let value = !self.is_favorite(pokemon);
        if self.set_favorite(pokemon, value) {
            value
        } else {
            self.is_favorite(pokemon)
        }
    }

    // ------------------------------------------------------------------
    // Remote sync
    // ------------------------------------------------------------------

    /// Returns the cached set, fetching from the remote first if the store
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the initial fetch fails.
    pub fn ensure_populated(&self) -> SyncResult<Vec<Pokemon>> {
        let count = match self.store.count() {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "failed to count records");
                self.record_store_failure(&e);
                0
            }
        };

        if count == 0 {
            tracing::info!("store is empty, fetching from remote");
            self.fetch_and_store()?;
        }
        Ok(self.load_all(false))
    }

    /// Re-fetches from the remote and merges without deleting anything.
    ///
    /// # Errors
    ///
    /// Returns the remote error; the store is left untouched.
    pub fn refresh(&self) -> SyncResult<SyncReport> {
        self.fetch_and_store()
    }

    /// Deletes every row, then re-fetches from the remote.
    ///
    /// Favorites are lost. If the fetch fails the error is returned and the
    /// store stays empty.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the re-fetch fails.
    pub fn reset_all(&self) -> SyncResult<SyncReport> {
        match self.clear() {
            Ok(()) => {
                tracing::info!("cache cleared");
                self.feed.emit(PokedexEvent::Cleared);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to clear cache");
                self.record_store_failure(&e);
                self.rollback();
            }
        }
        self.fetch_and_store()
    }

    fn clear(&self) -> StoreResult<()> {
        self.store.delete_all()?;
        self.store.save()
    }

    fn fetch_and_store(&self) -> SyncResult<SyncReport> {
        let start = Instant::now();
        let limit = self.config.fetch_limit;

        let fetched = match self.source.fetch_all(limit) {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(error = %e, limit, "remote fetch failed");
                {
                    let mut stats = self.stats.write();
                    stats.remote_failures += 1;
                    stats.last_error = Some(e.to_string());
                }
                self.feed.emit(PokedexEvent::SyncFailed {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let upsert = self.upsert_many(&fetched);
        let report = SyncReport {
            fetched: fetched.len(),
            upsert,
            duration: start.elapsed(),
        };

        {
            let mut stats = self.stats.write();
            stats.syncs_completed += 1;
            stats.records_fetched += report.fetched as u64;
            stats.last_sync_time = Some(Instant::now());
        }
        tracing::info!(
            fetched = report.fetched,
            inserted = upsert.inserted,
            updated = upsert.updated,
            failed = upsert.failed,
            duration_ms = report.duration.as_millis() as u64,
            "sync complete"
        );
        self.feed.emit(PokedexEvent::Refreshed {
            count: report.fetched,
        });
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Battle
    // ------------------------------------------------------------------

    /// Starts a battle between `player` and a random stored opponent.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoOpponent`] if nothing else is stored.
    pub fn start_battle<G>(&self, player: &Pokemon, rng: &mut G) -> SyncResult<BattleSession>
    where
        G: Rng + ?Sized,
    {
        let candidates = self.load_all(false);
        let opponent = choose_opponent(&candidates, player, rng).ok_or(SyncError::NoOpponent {
            player_id: player.id,
        })?;

        tracing::info!(player = %player.name, opponent = %opponent.name, "battle started");
        Ok(BattleSession::start(player.clone(), opponent).with_pacing(self.config.battle_pacing))
    }

    fn rollback(&self) {
        if let Err(e) = self.store.rollback() {
            tracing::error!(error = %e, "rollback failed");
        }
    }

    fn record_store_failure(&self, err: &dyn std::error::Error) {
        let mut stats = self.stats.write();
        stats.store_failures += 1;
        stats.last_error = Some(err.to_string());
    }
}
