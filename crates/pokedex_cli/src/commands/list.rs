//! List command implementation.

use super::{write_line, CliResult, OutputFormat};
use pokedex_core::filter::FilterQuery;
use pokedex_core::SortOption;
use pokedex_store::RecordStore;
use pokedex_sync::{Pokedex, PokemonSource};
use std::io::Write;

/// Filter options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only show favorites.
    pub favorites: bool,
    /// Case-insensitive name substring.
    pub search: String,
    /// Type tag, or "All".
    pub type_filter: String,
    /// Sort key ("name" or "strength").
    pub sort: String,
    /// Output format ("text" or "json").
    pub format: String,
}

/// Runs the list command.
///
/// Populates the cache from the remote first if it is empty.
pub fn run<S, R>(dex: &Pokedex<S, R>, options: &ListOptions, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let format: OutputFormat = options.format.parse()?;
    let sort: SortOption = options.sort.parse()?;
    let query = FilterQuery::new()
        .search(options.search.as_str())
        .type_filter(options.type_filter.as_str())
        .sort(sort);

    dex.ensure_populated()?;
    let results = dex.query(options.favorites, &query);
    tracing::debug!(count = results.len(), %sort, "list query");

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
        }
        OutputFormat::Text => {
            if results.is_empty() {
                writeln!(out, "No pokemon match.")?;
            }
            for pokemon in &results {
                write_line(out, pokemon)?;
            }
        }
    }

    Ok(())
}
