//! Show command implementation.

use super::{find, CliResult, OutputFormat};
use pokedex_core::PokemonId;
use pokedex_store::RecordStore;
use pokedex_sync::{Pokedex, PokemonSource};
use std::io::Write;

/// Runs the show command.
pub fn run<S, R>(dex: &Pokedex<S, R>, id: PokemonId, format: &str, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let format: OutputFormat = format.parse()?;
    let pokemon = find(dex, id)?;

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&pokemon)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "#{:03} {}", pokemon.id, pokemon.display_name())?;
            writeln!(out, "  Types:    {}", pokemon.types.join(", "))?;
            writeln!(out, "  Image:    {}", pokemon.image_url)?;
            writeln!(
                out,
                "  Favorite: {}",
                if pokemon.is_favorite { "yes" } else { "no" }
            )?;
            writeln!(out, "  Stats:")?;
            for (name, value) in &pokemon.stats {
                writeln!(out, "    {name:<16} {value:>4}")?;
            }
        }
    }

    Ok(())
}
