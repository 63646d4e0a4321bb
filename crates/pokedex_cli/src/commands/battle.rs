//! Battle command implementation.
//!
//! The session is driven one transition at a time on a single-threaded
//! tokio runtime, sleeping for each step's delay before printing it.

use super::{find, CliError, CliResult};
use pokedex_core::{BattleEvent, BattlePacing, BattleSession, HealthBand, PokemonId, Side};
use pokedex_store::RecordStore;
use pokedex_sync::{Pokedex, PokemonSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

/// Options for the battle command.
#[derive(Debug, Clone, Default)]
pub struct BattleOptions {
    /// The player's entity.
    pub player: PokemonId,
    /// A specific opponent; random when absent.
    pub opponent: Option<PokemonId>,
    /// Skip all delays.
    pub instant: bool,
    /// Seed for the opponent draw.
    pub seed: Option<u64>,
}

/// Builds a started session from `options`.
pub fn setup<S, R>(dex: &Pokedex<S, R>, options: &BattleOptions) -> CliResult<BattleSession>
where
    S: RecordStore,
    R: PokemonSource,
{
    let player = find(dex, options.player)?;

    let session = match options.opponent {
        Some(id) if id == player.id => return Err(CliError::SelfBattle(id).into()),
        Some(id) => BattleSession::start(player, find(dex, id)?)
            .with_pacing(dex.config().battle_pacing),
        None => match options.seed {
            Some(seed) => dex.start_battle(&player, &mut StdRng::seed_from_u64(seed))?,
            None => dex.start_battle(&player, &mut rand::thread_rng())?,
        },
    };

    if options.instant {
        Ok(session.with_pacing(BattlePacing::instant()))
    } else {
        Ok(session)
    }
}

/// Runs the battle command to completion.
pub fn run<S, R>(dex: &Pokedex<S, R>, options: &BattleOptions, out: &mut dyn Write) -> CliResult
where
    S: RecordStore,
    R: PokemonSource,
{
    let mut session = setup(dex, options)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(play(&mut session, out))
}

/// Plays `session` until it finishes, pacing each step.
pub async fn play(session: &mut BattleSession, out: &mut dyn Write) -> CliResult {
    writeln!(
        out,
        "{} vs {}!",
        session.player().display_name(),
        session.opponent().display_name()
    )?;

    while !session.is_finished() {
        let step = session.step()?;
        tokio::time::sleep(step.delay).await;
        describe(session, &step.event, out)?;
    }

    Ok(())
}

fn describe(session: &BattleSession, event: &BattleEvent, out: &mut dyn Write) -> CliResult {
    match event {
        BattleEvent::Strike {
            attacker, damage, ..
        } => {
            let (striker, target) = match attacker {
                Side::Player => (session.player(), session.opponent()),
                Side::Opponent => (session.opponent(), session.player()),
            };
            let health = session.display_health(attacker.other());
            writeln!(
                out,
                "{} strikes {} for {damage}. {} HP left ({:?})",
                striker.display_name(),
                target.display_name(),
                health,
                HealthBand::of(health)
            )?;
        }
        BattleEvent::RoundEnded {
            round,
            player_health,
            opponent_health,
        } => {
            writeln!(
                out,
                "-- round {round}: you {} HP, foe {} HP",
                (*player_health).max(0),
                (*opponent_health).max(0)
            )?;
        }
        BattleEvent::Finished(outcome) => {
            writeln!(out, "{}", outcome.message)?;
        }
    }
    Ok(())
}
