//! Engine integration tests over real stores and injected faults.

use pokedex_core::filter::FilterQuery;
use pokedex_core::{BattlePhase, Side, SortOption};
use pokedex_store::{InMemoryStore, Record, RecordStore};
use pokedex_sync::{MockSource, Pokedex, PokedexEvent, SyncError};
use pokedex_testkit::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn faulty_pokedex(
    remote: Vec<pokedex_core::Pokemon>,
) -> (
    Arc<FaultyStore<InMemoryStore>>,
    Pokedex<FaultyStore<InMemoryStore>, MockSource>,
) {
    let store = Arc::new(FaultyStore::new(InMemoryStore::new()));
    let dex = Pokedex::with_shared(
        test_config(),
        Arc::clone(&store),
        Arc::new(MockSource::with_pokemon(remote)),
    );
    (store, dex)
}

// ============================================================================
// Upsert
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn upsert_is_idempotent(batch in pokemon_batch_strategy(30)) {
        let once = memory_pokedex(vec![]);
        once.upsert_many(&batch);

        let twice = memory_pokedex(vec![]);
        twice.upsert_many(&batch);
        let second = twice.upsert_many(&batch);

        prop_assert_eq!(second.inserted, 0);
        prop_assert_eq!(second.updated, batch.len());
        prop_assert_eq!(once.load_all(false), twice.load_all(false));
        prop_assert_eq!(once.store().committed(), twice.store().committed());
    }

    #[test]
    fn favorites_survive_any_refresh(batch in pokemon_batch_strategy(10), idx in any::<prop::sample::Index>()) {
        prop_assume!(!batch.is_empty());
        let dex = memory_pokedex(vec![]);
        dex.upsert_many(&batch);

        let chosen = idx.get(&batch).clone();
        dex.set_favorite(&chosen, true);

        let renamed: Vec<_> = batch
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.name = format!("{}-x", p.name);
                p
            })
            .collect();
        dex.upsert_many(&renamed);

        let favorites = dex.load_all(true);
        prop_assert_eq!(favorites.len(), 1);
        prop_assert_eq!(favorites[0].id, chosen.id);
        prop_assert_eq!(&favorites[0].name, &format!("{}-x", chosen.name));
    }
}

#[test]
fn favorite_kept_when_remote_renames() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();
    assert!(dex.set_favorite(&bulbasaur(), true));

    let mut renamed = bulbasaur();
    renamed.name = "Bulbasaur (Kanto)".into();
    dex.source().set_pokemon(vec![renamed]);
    dex.refresh().unwrap();

    let stored = dex.get(1).unwrap();
    assert_eq!(stored.name, "Bulbasaur (Kanto)");
    assert!(stored.is_favorite);
    assert!(dex.is_favorite(&bulbasaur()));
}

#[test]
fn save_failure_rolls_back_batch() {
    let (store, dex) = faulty_pokedex(vec![]);
    store.fail(StoreOp::Save);

    let summary = dex.upsert_many(&starters());
    assert_eq!(summary.written(), 0);
    assert_eq!(summary.failed, 4);

    store.heal_all();
    assert!(dex.load_all(false).is_empty());
    assert!(!store.inner().has_pending_changes());
}

#[test]
fn upsert_failure_is_counted_per_entity() {
    let (store, dex) = faulty_pokedex(vec![]);
    store.fail(StoreOp::Upsert);

    let summary = dex.upsert_many(&starters());
    assert_eq!(summary.failed, 4);
    let stats = dex.stats();
    assert_eq!(stats.store_failures, 4);
    assert!(stats.last_error.is_some());
}

// ============================================================================
// Degraded reads
// ============================================================================

#[test]
fn load_failure_yields_sentinel() {
    let (store, dex) = faulty_pokedex(starters());
    dex.ensure_populated().unwrap();
    store.fail(StoreOp::FetchAll);

    let all = dex.load_all(false);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, -1);
    assert_eq!(all[0].name, "DebugMon");
    assert_eq!(all[0].types, vec!["Unknown"]);
    assert_eq!(all[0].image_url, "https://example.com/debug.png");
    assert!(dex.stats().store_failures >= 1);
}

#[test]
fn corrupted_row_surfaces_as_sentinel() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();

    let corrupt = Record::new(150)
        .with_name("mewtwo")
        .with_image_url("https://img.test/150.png")
        .with_types(vec![0xff, 0x00])
        .with_stats(vec![]);
    dex.store().upsert(corrupt).unwrap();
    dex.store().save().unwrap();

    let all = dex.load_all(false);
    assert_eq!(all.len(), 5);
    let sentinel = all.last().unwrap();
    assert!(sentinel.is_sentinel());
    assert_eq!(sentinel.name, "DebugMon");
    assert_eq!(sentinel.attack(), 0);
}

#[test]
fn favorite_read_failure_is_false() {
    let (store, dex) = faulty_pokedex(starters());
    dex.ensure_populated().unwrap();
    dex.set_favorite(&pikachu(), true);

    store.fail(StoreOp::FetchOne);
    assert!(!dex.is_favorite(&pikachu()));
    assert!(!dex.set_favorite(&pikachu(), false));

    store.heal_all();
    assert!(dex.is_favorite(&pikachu()));
}

#[test]
fn favorite_save_failure_is_rolled_back() {
    let (store, dex) = faulty_pokedex(starters());
    dex.ensure_populated().unwrap();

    store.fail(StoreOp::Save);
    assert!(!dex.set_favorite(&squirtle(), true));

    store.heal_all();
    assert!(!dex.is_favorite(&squirtle()));
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_remote_failure_leaves_store_empty() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();
    dex.set_favorite(&charmander(), true);
    dex.source().set_failure(Some("connection refused"));

    let err = dex.reset_all().unwrap_err();
    assert!(matches!(err, SyncError::Transport { .. }));

    assert!(dex.store().fetch_all(None).unwrap().is_empty());
    assert!(dex.load_all(false).is_empty());
    assert!(dex.load_all(true).is_empty());

    dex.source().set_failure(None);
    let all = dex.ensure_populated().unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|p| !p.is_favorite));
}

#[test]
fn reset_delete_failure_still_refetches() {
    let (store, dex) = faulty_pokedex(starters());
    dex.ensure_populated().unwrap();
    dex.set_favorite(&bulbasaur(), true);

    store.fail(StoreOp::DeleteAll);
    let report = dex.reset_all().unwrap();
    assert_eq!(report.fetched, 4);
    assert_eq!(report.upsert.updated, 4);
    assert!(dex.is_favorite(&bulbasaur()));
}

#[test]
fn events_for_reset() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();
    let events = dex.subscribe();

    dex.source().set_failure(Some("offline"));
    let _ = dex.reset_all();

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received[0], PokedexEvent::Cleared);
    assert!(matches!(received[1], PokedexEvent::SyncFailed { .. }));
    assert_eq!(received.len(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn file_store_keeps_favorites_across_sessions() {
    let temp = TempStore::new();
    {
        let dex = temp.pokedex(starters());
        dex.ensure_populated().unwrap();
        dex.set_favorite(&squirtle(), true);
    }

    let dex = temp.pokedex(vec![]);
    let all = dex.ensure_populated().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(dex.source().list_calls(), 0);

    let favorites = dex.load_all(true);
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "squirtle");
}

#[test]
fn file_store_reset_failure_persists_empty() {
    let temp = TempStore::new();
    {
        let dex = temp.pokedex(starters());
        dex.ensure_populated().unwrap();
        dex.source().set_failure(Some("offline"));
        assert!(dex.reset_all().is_err());
    }

    let store = temp.open();
    assert_eq!(store.count().unwrap(), 0);
}

// ============================================================================
// Queries and battles
// ============================================================================

#[test]
fn query_over_favorites() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();
    dex.set_favorite(&bulbasaur(), true);
    dex.set_favorite(&charmander(), true);

    let query = FilterQuery::new().type_filter("fire").sort(SortOption::Name);
    let hits = dex.query(true, &query);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "charmander");

    let by_strength = dex.query(true, &FilterQuery::new().sort(SortOption::Strength));
    let names: Vec<_> = by_strength.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["charmander", "bulbasaur"]);
}

#[test]
fn battle_runs_to_completion() {
    let dex = memory_pokedex(starters());
    dex.ensure_populated().unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let mut session = dex.start_battle(&pikachu(), &mut rng).unwrap();
    assert_eq!(session.phase(), BattlePhase::InProgress);

    let mut rounds = 0;
    while !session.is_finished() {
        let steps = session.attack().unwrap();
        assert!(steps.iter().all(|s| s.delay.is_zero()));
        rounds += 1;
        assert!(rounds <= 10);
    }

    let outcome = session.outcome().unwrap();
    assert_eq!(outcome.winner, Side::Player);
    assert_eq!(outcome.message, "Pikachu won!");
}

#[test]
fn battle_excludes_player_and_sentinels() {
    let (store, dex) = faulty_pokedex(vec![]);
    dex.upsert_many(&[pikachu()]);
    store.fail(StoreOp::FetchAll);

    let err = dex
        .start_battle(&pikachu(), &mut StdRng::seed_from_u64(3))
        .unwrap_err();
    assert!(matches!(err, SyncError::NoOpponent { player_id: 25 }));
}

#[test]
fn battle_against_weak_stored_opponent() {
    let weakling = mon(300, "magikarp", "water", 10);
    let dex = memory_pokedex(vec![weakling.clone()]);
    dex.ensure_populated().unwrap();

    let player = mon(301, "gyarados", "water", 125);
    let mut session = dex
        .start_battle(&player, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(session.opponent().id, weakling.id);

    session.attack().unwrap();
    assert!(session.is_finished());
    assert_eq!(session.player_health(), 100);
    assert_eq!(session.opponent_health(), -25);
    assert_eq!(session.display_health(Side::Opponent), 0);
}
