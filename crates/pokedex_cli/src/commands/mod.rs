//! CLI command implementations.
//!
//! Commands are generic over the store and remote so they can run against
//! the file-backed production engine or an in-memory test engine, and write
//! to any [`Write`] sink.

pub mod battle;
pub mod favorite;
pub mod list;
pub mod show;
pub mod sync;

use pokedex_core::{Pokemon, PokemonId};
use pokedex_store::{FileStore, RecordStore};
use pokedex_sync::{PokeApi, Pokedex, PokemonSource, ReqwestClient, SyncConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Result type for command implementations.
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// The production engine: a file store fed by the REST API.
pub type FileDex = Pokedex<FileStore, PokeApi<ReqwestClient>>;

/// Errors raised by the command layer itself.
#[derive(Debug, Error)]
pub enum CliError {
    /// No stored entity has the requested id.
    #[error("no pokemon with id {0} in the cache (run `pokedex sync` first?)")]
    NotFound(PokemonId),

    /// A battle needs two different entities.
    #[error("pokemon {0} cannot battle itself")]
    SelfBattle(PokemonId),

    /// The `--format` value is not recognized.
    #[error("unknown output format: {0} (expected text or json)")]
    UnknownFormat(String),
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CliError::UnknownFormat(s.to_string())),
        }
    }
}

/// Opens the production engine at `path`.
pub fn open(path: &Path, config: SyncConfig) -> CliResult<FileDex> {
    let store = FileStore::open(path)?;
    let source = PokeApi::from_config(&config)?;
    tracing::debug!(path = %path.display(), api = %config.api_base_url, "opened pokedex");
    Ok(Pokedex::new(config, store, source))
}

/// Default cache file, relative to the working directory.
pub fn default_path() -> PathBuf {
    PathBuf::from("pokedex.cbor")
}

/// Looks up a stored entity by id.
pub fn find<S, R>(dex: &Pokedex<S, R>, id: PokemonId) -> CliResult<Pokemon>
where
    S: RecordStore,
    R: PokemonSource,
{
    dex.get(id).ok_or_else(|| CliError::NotFound(id).into())
}

/// Writes one summary line for `pokemon`.
pub fn write_line(out: &mut dyn Write, pokemon: &Pokemon) -> std::io::Result<()> {
    let star = if pokemon.is_favorite { "*" } else { " " };
    writeln!(
        out,
        "{star} #{:03} {:<14} {:<18} atk {:>3}",
        pokemon.id,
        pokemon.display_name(),
        pokemon.types.join("/"),
        pokemon.attack()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_testkit::{bulbasaur, memory_pokedex, starters};

    #[test]
    fn output_format_parses() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(CliError::UnknownFormat(_))
        ));
    }

    #[test]
    fn find_reports_missing_id() {
        let dex = memory_pokedex(starters());
        dex.ensure_populated().unwrap();

        assert_eq!(find(&dex, 1).unwrap().name, "bulbasaur");
        let err = find(&dex, 999).unwrap_err();
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn summary_line_marks_favorites() {
        let mut out = Vec::new();
        write_line(&mut out, &bulbasaur().with_favorite(true)).unwrap();
        let line = String::from_utf8(out).unwrap();

        assert!(line.starts_with("* #001 Bulbasaur"));
        assert!(line.contains("grass/poison"));
        assert!(line.contains("atk  49"));
    }
}
