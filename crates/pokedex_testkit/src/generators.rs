//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entities and batches that hold the
//! invariants the engine relies on.

use pokedex_core::{Pokemon, PokemonId, SortOption, ATTACK_STAT};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Type tags the generators draw from.
pub const TYPE_TAGS: [&str; 8] = [
    "grass", "fire", "water", "electric", "poison", "normal", "Flying", "Psychic",
];

/// Strategy for generating valid (non-sentinel) entity ids.
pub fn pokemon_id_strategy() -> impl Strategy<Value = PokemonId> {
    1..10_000i64
}

/// Strategy for generating entity names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-z-]{0,11}").expect("Invalid regex")
}

/// Strategy for generating a type list of one or two tags.
pub fn types_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(TYPE_TAGS.to_vec()), 1..=2)
        .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

/// Strategy for generating a stat map that may or may not carry an attack.
pub fn stats_strategy() -> impl Strategy<Value = BTreeMap<String, i32>> {
    (
        prop::option::of(0..200i32),
        prop::option::of(0..200i32),
        prop::option::of(1..255i32),
    )
        .prop_map(|(attack, defense, hp)| {
            let mut stats = BTreeMap::new();
            if let Some(v) = attack {
                stats.insert(ATTACK_STAT.to_string(), v);
            }
            if let Some(v) = defense {
                stats.insert("defense".to_string(), v);
            }
            if let Some(v) = hp {
                stats.insert("hp".to_string(), v);
            }
            stats
        })
}

/// Strategy for generating an unfavorited entity with the given id.
pub fn pokemon_with_id(id: PokemonId) -> impl Strategy<Value = Pokemon> {
    (name_strategy(), types_strategy(), stats_strategy()).prop_map(move |(name, types, stats)| {
        let mut pokemon = Pokemon::new(id, name).with_image_url(format!("https://img.test/{id}.png"));
        pokemon.types = types;
        pokemon.stats = stats;
        pokemon
    })
}

/// Strategy for generating an arbitrary entity.
pub fn pokemon_strategy() -> impl Strategy<Value = Pokemon> {
    pokemon_id_strategy().prop_flat_map(pokemon_with_id)
}

/// Strategy for generating a batch of entities with distinct ids.
pub fn pokemon_batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<Pokemon>> {
    prop::collection::btree_set(pokemon_id_strategy(), 0..=max_len).prop_flat_map(|ids| {
        ids.into_iter()
            .map(pokemon_with_id)
            .collect::<Vec<_>>()
    })
}

/// Strategy for generating a sort option.
pub fn sort_strategy() -> impl Strategy<Value = SortOption> {
    prop_oneof![Just(SortOption::Name), Just(SortOption::Strength)]
}

/// Strategy for generating a type filter string, including `"All"`.
pub fn type_filter_strategy() -> impl Strategy<Value = String> {
    let mut choices: Vec<String> = TYPE_TAGS.iter().map(|t| t.to_string()).collect();
    choices.push("All".to_string());
    choices.push("FIRE".to_string());
    prop::sample::select(choices)
}
