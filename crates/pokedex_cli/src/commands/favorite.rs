//! Favorite commands.

use super::{find, CliResult};
use pokedex_core::PokemonId;
use pokedex_store::RecordStore;
use pokedex_sync::{Pokedex, PokemonSource};
use std::io::Write;

/// What to do with the favorite flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    /// Set it.
    Add,
    /// Clear it.
    Remove,
    /// Flip it.
    Toggle,
}

/// Runs a favorite command.
pub fn run<S, R>(
    dex: &Pokedex<S, R>,
    id: PokemonId,
    action: FavoriteAction,
    out: &mut dyn Write,
) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let pokemon = find(dex, id)?;
    let name = pokemon.display_name();

    let now = match action {
        FavoriteAction::Add => {
            dex.set_favorite(&pokemon, true);
            dex.is_favorite(&pokemon)
        }
        FavoriteAction::Remove => {
            dex.set_favorite(&pokemon, false);
            dex.is_favorite(&pokemon)
        }
        FavoriteAction::Toggle => dex.toggle_favorite(&pokemon),
    };

    if now {
        writeln!(out, "{name} is a favorite.")?;
    } else {
        writeln!(out, "{name} is not a favorite.")?;
    }
    Ok(())
}
