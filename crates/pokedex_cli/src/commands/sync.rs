//! Sync, refresh and reset commands.

use super::CliResult;
use pokedex_store::RecordStore;
use pokedex_sync::{Pokedex, PokemonSource, SyncReport};
use std::io::Write;

/// Populates an empty cache from the remote.
pub fn populate<S, R>(dex: &Pokedex<S, R>, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let before = dex.stats().syncs_completed;
    let all = dex.ensure_populated()?;
    if dex.stats().syncs_completed > before {
        writeln!(out, "Fetched {} pokemon.", all.len())?;
    } else {
        writeln!(out, "Cache already holds {} pokemon.", all.len())?;
    }
    Ok(())
}

/// Re-fetches from the remote, keeping favorites.
pub fn refresh<S, R>(dex: &Pokedex<S, R>, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let report = dex.refresh()?;
    print_report(out, "Refreshed", &report)
}

/// Clears the cache, favorites included, and re-fetches.
pub fn reset<S, R>(dex: &Pokedex<S, R>, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let report = dex.reset_all()?;
    print_report(out, "Reset", &report)
}

fn print_report(out: &mut dyn Write, verb: &str, report: &SyncReport) -> CliResult {
    writeln!(
        out,
        "{verb}: {} fetched, {} new, {} updated, {} failed ({} ms)",
        report.fetched,
        report.upsert.inserted,
        report.upsert.updated,
        report.upsert.failed,
        report.duration.as_millis()
    )?;
    Ok(())
}
