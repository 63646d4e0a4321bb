//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use pokedex_core::{Pokemon, PokemonId, RecordCodec, ATTACK_STAT};
use pokedex_store::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// Type tags used for generated entities.
pub const TYPES: [&str; 6] = ["grass", "fire", "water", "electric", "poison", "normal"];

/// Generate a random lowercase name.
pub fn random_name<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(4..12);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Generate one random entity with the given id.
pub fn random_pokemon<R: Rng>(rng: &mut R, id: PokemonId) -> Pokemon {
    let mut pokemon = Pokemon::new(id, random_name(rng))
        .with_image_url(format!("https://img.bench/{id}.png"))
        .with_stat(ATTACK_STAT, rng.gen_range(5..150))
        .with_stat("defense", rng.gen_range(5..150));
    let count = rng.gen_range(1..=2);
    for tag in TYPES.choose_multiple(rng, count) {
        pokemon = pokemon.with_type(*tag);
    }
    pokemon
}

/// Generate `count` random entities with ids `1..=count`.
pub fn generate_pokemon(count: usize) -> Vec<Pokemon> {
    let mut rng = rand::thread_rng();
    (1..=count)
        .map(|id| random_pokemon(&mut rng, id as PokemonId))
        .collect()
}

/// Encode entities into store rows.
pub fn generate_records(count: usize) -> Vec<Record> {
    generate_pokemon(count)
        .iter()
        .filter_map(|p| p.to_record().ok())
        .collect()
}
