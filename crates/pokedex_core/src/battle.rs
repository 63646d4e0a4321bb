//! Two-party battle state machine.
//!
//! ```text
//! Idle ──begin──▶ InProgress ──step──▶ PlayerTurnResolving ──step──▶ OpponentTurnResolving
//!                    ▲                         │                             │
//!                    └──────── step ───────────┼─────────────────────────────┘
//!                                              ▼                             ▼
//!                                          Finished(player)          Finished(opponent)
//! ```
//!
//! One call to [`BattleSession::attack`] resolves exactly one round: the
//! player strikes, and if the opponent is still standing it strikes back.
//! Each transition is reported as a [`BattleStep`] carrying the delay a
//! front end should wait before showing it. Delays never change the outcome.

use crate::error::{BattleError, BattleResult};
use crate::pokemon::{Pokemon, ATTACK_STAT};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Health both sides start with.
pub const STARTING_HEALTH: i32 = 100;

/// Damage dealt by a combatant without an attack stat.
pub const DEFAULT_ATTACK: i32 = 10;

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The user's chosen entity.
    Player,
    /// The randomly drawn opponent.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// Current state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Created but not started.
    Idle,
    /// Waiting for the next attack.
    InProgress,
    /// The player's strike has landed; the knockout check is pending.
    PlayerTurnResolving,
    /// The opponent's strike has landed; the knockout check is pending.
    OpponentTurnResolving,
    /// A winner has been decided.
    Finished,
}

impl BattlePhase {
    /// Returns true if the session is waiting for input or done.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::InProgress | Self::Finished)
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    /// The side that won.
    pub winner: Side,
    /// Display name of the winning entity.
    pub winner_name: String,
    /// Human-readable result line.
    pub message: String,
}

impl BattleOutcome {
    fn new(winner: Side, winner_name: String) -> Self {
        let message = match winner {
            Side::Player => format!("{winner_name} won!"),
            Side::Opponent => format!("{winner_name} defeated you"),
        };
        Self {
            winner,
            winner_name,
            message,
        }
    }

    /// Returns true if the player won.
    pub fn player_won(&self) -> bool {
        self.winner == Side::Player
    }
}

/// Something that happened during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    /// A strike landed.
    Strike {
        /// Who struck.
        attacker: Side,
        /// Damage dealt.
        damage: i32,
        /// Target's health afterwards; may be negative.
        remaining: i32,
    },
    /// Both sides are still standing after a full round.
    RoundEnded {
        /// Round number, starting at 1.
        round: u32,
        /// Player health after the round.
        player_health: i32,
        /// Opponent health after the round.
        opponent_health: i32,
    },
    /// The battle has a winner.
    Finished(BattleOutcome),
}

/// A single timed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleStep {
    /// How long a front end should wait before presenting this step.
    pub delay: Duration,
    /// What happened.
    pub event: BattleEvent,
}

/// Presentational delays between transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattlePacing {
    /// Lunge time before a strike lands.
    pub strike: Duration,
    /// Pause after the player's strike before the knockout check.
    pub player_settle: Duration,
    /// Pause after the opponent's strike before the knockout check.
    pub opponent_settle: Duration,
}

impl BattlePacing {
    /// Zero delays, for headless use.
    pub const fn instant() -> Self {
        Self {
            strike: Duration::ZERO,
            player_settle: Duration::ZERO,
            opponent_settle: Duration::ZERO,
        }
    }
}

impl Default for BattlePacing {
    fn default() -> Self {
        Self {
            strike: Duration::from_millis(400),
            player_settle: Duration::from_millis(600),
            opponent_settle: Duration::from_millis(500),
        }
    }
}

/// Coarse health level for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    /// Above 50.
    Healthy,
    /// Above 20.
    Wounded,
    /// 20 or below.
    Critical,
}

impl HealthBand {
    /// Classifies a health value.
    pub fn of(health: i32) -> Self {
        if health > 50 {
            Self::Healthy
        } else if health > 20 {
            Self::Wounded
        } else {
            Self::Critical
        }
    }
}

/// An ephemeral two-party battle. Never persisted.
#[derive(Debug, Clone)]
pub struct BattleSession {
    player: Pokemon,
    opponent: Pokemon,
    player_health: i32,
    opponent_health: i32,
    phase: BattlePhase,
    round: u32,
    outcome: Option<BattleOutcome>,
    pacing: BattlePacing,
}

impl BattleSession {
    /// Creates an idle session.
    pub fn new(player: Pokemon, opponent: Pokemon) -> Self {
        Self {
            player,
            opponent,
            player_health: STARTING_HEALTH,
            opponent_health: STARTING_HEALTH,
            phase: BattlePhase::Idle,
            round: 0,
            outcome: None,
            pacing: BattlePacing::default(),
        }
    }

    /// Creates a session and starts it.
    pub fn start(player: Pokemon, opponent: Pokemon) -> Self {
        let mut session = Self::new(player, opponent);
        session.begin();
        session
    }

    /// Replaces the presentational delays.
    #[must_use]
    pub fn with_pacing(mut self, pacing: BattlePacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Resets both health values and enters `InProgress`.
    ///
    /// Calling this on a finished session starts a rematch.
    pub fn begin(&mut self) {
        self.player_health = STARTING_HEALTH;
        self.opponent_health = STARTING_HEALTH;
        self.round = 0;
        self.outcome = None;
        self.phase = BattlePhase::InProgress;
        tracing::debug!(
            player = %self.player.name,
            opponent = %self.opponent.name,
            "battle started"
        );
    }

    /// The player's entity.
    pub fn player(&self) -> &Pokemon {
        &self.player
    }

    /// The opponent's entity.
    pub fn opponent(&self) -> &Pokemon {
        &self.opponent
    }

    /// Internal player health; may be negative.
    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    /// Internal opponent health; may be negative.
    pub fn opponent_health(&self) -> i32 {
        self.opponent_health
    }

    /// Health of `side` clamped at 0 for display.
    pub fn display_health(&self, side: Side) -> i32 {
        match side {
            Side::Player => self.player_health.max(0),
            Side::Opponent => self.opponent_health.max(0),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Number of rounds begun so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The outcome, once finished.
    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    /// Returns true if a winner has been decided.
    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    /// Resolves one full round and returns its transitions in order.
    ///
    /// If called mid-round (after a manual [`step`](Self::step)), resolves
    /// the rest of the current round.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is idle or already finished.
    pub fn attack(&mut self) -> BattleResult<Vec<BattleStep>> {
        let mut steps = vec![self.step()?];
        while !self.phase.is_resting() {
            steps.push(self.step()?);
        }
        Ok(steps)
    }

    /// Advances exactly one transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is idle or already finished.
    pub fn step(&mut self) -> BattleResult<BattleStep> {
        match self.phase {
            BattlePhase::Idle => Err(BattleError::NotStarted),
            BattlePhase::Finished => Err(BattleError::Finished),
            BattlePhase::InProgress => {
                self.round += 1;
                let damage = strike_damage(&self.player);
                self.opponent_health = self.opponent_health.saturating_sub(damage);
                self.phase = BattlePhase::PlayerTurnResolving;
                Ok(BattleStep {
                    delay: self.pacing.strike,
                    event: BattleEvent::Strike {
                        attacker: Side::Player,
                        damage,
                        remaining: self.opponent_health,
                    },
                })
            }
            BattlePhase::PlayerTurnResolving => {
                if self.opponent_health <= 0 {
                    return Ok(self.finish(Side::Player, self.pacing.player_settle));
                }
                let damage = strike_damage(&self.opponent);
                self.player_health = self.player_health.saturating_sub(damage);
                self.phase = BattlePhase::OpponentTurnResolving;
                Ok(BattleStep {
                    delay: self.pacing.player_settle + self.pacing.strike,
                    event: BattleEvent::Strike {
                        attacker: Side::Opponent,
                        damage,
                        remaining: self.player_health,
                    },
                })
            }
            BattlePhase::OpponentTurnResolving => {
                if self.player_health <= 0 {
                    return Ok(self.finish(Side::Opponent, self.pacing.opponent_settle));
                }
                self.phase = BattlePhase::InProgress;
                Ok(BattleStep {
                    delay: self.pacing.opponent_settle,
                    event: BattleEvent::RoundEnded {
                        round: self.round,
                        player_health: self.player_health,
                        opponent_health: self.opponent_health,
                    },
                })
            }
        }
    }

    fn finish(&mut self, winner: Side, delay: Duration) -> BattleStep {
        let name = match winner {
            Side::Player => self.player.display_name(),
            Side::Opponent => self.opponent.display_name(),
        };
        let outcome = BattleOutcome::new(winner, name);
        tracing::info!(winner = ?winner, round = self.round, "{}", outcome.message);
        self.phase = BattlePhase::Finished;
        self.outcome = Some(outcome.clone());
        BattleStep {
            delay,
            event: BattleEvent::Finished(outcome),
        }
    }
}

fn strike_damage(attacker: &Pokemon) -> i32 {
    attacker.stat(ATTACK_STAT).unwrap_or(DEFAULT_ATTACK)
}

/// Picks an opponent uniformly at random.
///
/// Candidates with the player's id and sentinel placeholders are skipped.
/// Returns `None` when nothing is left to fight.
pub fn choose_opponent<R>(candidates: &[Pokemon], player: &Pokemon, rng: &mut R) -> Option<Pokemon>
where
    R: Rng + ?Sized,
{
    let pool: Vec<&Pokemon> = candidates
        .iter()
        .filter(|p| p.id != player.id && !p.is_sentinel())
        .collect();
    pool.choose(rng).map(|p| (*p).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fighter(id: i64, name: &str, attack: i32) -> Pokemon {
        Pokemon::new(id, name).with_stat(ATTACK_STAT, attack)
    }

    fn session(player_attack: i32, opponent_attack: i32) -> BattleSession {
        BattleSession::start(
            fighter(1, "bulbasaur", player_attack),
            fighter(4, "charmander", opponent_attack),
        )
    }

    #[test]
    fn start_sets_full_health() {
        let s = session(30, 30);
        assert_eq!(s.player_health(), 100);
        assert_eq!(s.opponent_health(), 100);
        assert_eq!(s.phase(), BattlePhase::InProgress);
        assert!(s.outcome().is_none());
    }

    #[test]
    fn opponent_wins_in_one_round() {
        let mut s = session(30, 100);
        let steps = s.attack().unwrap();

        assert_eq!(s.opponent_health(), 70);
        assert_eq!(s.player_health(), 0);
        assert!(s.is_finished());
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.winner, Side::Opponent);
        assert_eq!(outcome.message, "Charmander defeated you");
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn knockout_prevents_counter_strike() {
        let mut s = session(100, 100);
        let steps = s.attack().unwrap();

        assert_eq!(s.player_health(), 100);
        assert!(s.outcome().unwrap().player_won());
        assert_eq!(s.outcome().unwrap().message, "Bulbasaur won!");
        let strikes = steps
            .iter()
            .filter(|s| matches!(s.event, BattleEvent::Strike { .. }))
            .count();
        assert_eq!(strikes, 1);
    }

    #[test]
    fn overkill_leaves_negative_internal_health() {
        let mut s = session(130, 10);
        s.attack().unwrap();
        assert_eq!(s.opponent_health(), -30);
        assert_eq!(s.display_health(Side::Opponent), 0);
    }

    #[test]
    fn extreme_attack_stats_saturate() {
        let mut s = session(i32::MIN, i32::MAX);
        s.attack().unwrap();
        assert_eq!(s.opponent_health(), i32::MAX);
        assert_eq!(s.player_health(), 100 - i32::MAX);
        assert_eq!(s.outcome().unwrap().winner, Side::Opponent);

        let mut s = session(i32::MAX, i32::MIN);
        s.attack().unwrap();
        assert_eq!(s.opponent_health(), 100 - i32::MAX);
        assert_eq!(s.display_health(Side::Opponent), 0);
        assert!(s.outcome().unwrap().player_won());

        let mut s = session(10, i32::MIN);
        s.attack().unwrap();
        assert_eq!(s.player_health(), i32::MAX);
        assert_eq!(s.phase(), BattlePhase::InProgress);
    }

    #[test]
    fn round_without_knockout_returns_to_in_progress() {
        let mut s = session(30, 20);
        let steps = s.attack().unwrap();

        assert_eq!(s.phase(), BattlePhase::InProgress);
        assert_eq!(s.opponent_health(), 70);
        assert_eq!(s.player_health(), 80);
        assert_eq!(
            steps.last().unwrap().event,
            BattleEvent::RoundEnded {
                round: 1,
                player_health: 80,
                opponent_health: 70
            }
        );
    }

    #[test]
    fn battle_runs_to_completion_over_rounds() {
        let mut s = session(30, 20);
        let mut rounds = 0;
        while !s.is_finished() {
            s.attack().unwrap();
            rounds += 1;
        }
        // 100 / 30 needs 4 strikes; the player is at 40 by then.
        assert_eq!(rounds, 4);
        assert!(s.outcome().unwrap().player_won());
        assert_eq!(s.player_health(), 40);
    }

    #[test]
    fn missing_attack_strikes_for_ten() {
        let mut s = BattleSession::start(Pokemon::new(1, "a"), Pokemon::new(2, "b"));
        s.attack().unwrap();
        assert_eq!(s.opponent_health(), 90);
        assert_eq!(s.player_health(), 90);
    }

    #[test]
    fn attack_after_finish_fails() {
        let mut s = session(100, 0);
        s.attack().unwrap();
        assert_eq!(s.attack(), Err(BattleError::Finished));
    }

    #[test]
    fn idle_session_cannot_attack() {
        let mut s = BattleSession::new(fighter(1, "a", 10), fighter(2, "b", 10));
        assert_eq!(s.phase(), BattlePhase::Idle);
        assert_eq!(s.step(), Err(BattleError::NotStarted));
    }

    #[test]
    fn steps_walk_through_every_phase() {
        let mut s = session(10, 10);

        s.step().unwrap();
        assert_eq!(s.phase(), BattlePhase::PlayerTurnResolving);
        assert_eq!(s.opponent_health(), 90);
        assert_eq!(s.player_health(), 100);

        s.step().unwrap();
        assert_eq!(s.phase(), BattlePhase::OpponentTurnResolving);
        assert_eq!(s.player_health(), 90);

        s.step().unwrap();
        assert_eq!(s.phase(), BattlePhase::InProgress);
    }

    #[test]
    fn default_pacing_delays() {
        let mut s = session(10, 10);
        let delays: Vec<u128> = s.attack().unwrap().iter().map(|s| s.delay.as_millis()).collect();
        assert_eq!(delays, vec![400, 1000, 500]);
    }

    #[test]
    fn instant_pacing_has_no_delays() {
        let mut s = session(10, 10).with_pacing(BattlePacing::instant());
        assert!(s.attack().unwrap().iter().all(|s| s.delay.is_zero()));
    }

    #[test]
    fn begin_starts_a_rematch() {
        let mut s = session(100, 10);
        s.attack().unwrap();
        assert!(s.is_finished());

        s.begin();
        assert_eq!(s.phase(), BattlePhase::InProgress);
        assert_eq!(s.opponent_health(), 100);
        assert_eq!(s.round(), 0);
        assert!(s.outcome().is_none());
    }

    #[test]
    fn health_bands() {
        assert_eq!(HealthBand::of(100), HealthBand::Healthy);
        assert_eq!(HealthBand::of(51), HealthBand::Healthy);
        assert_eq!(HealthBand::of(50), HealthBand::Wounded);
        assert_eq!(HealthBand::of(21), HealthBand::Wounded);
        assert_eq!(HealthBand::of(20), HealthBand::Critical);
        assert_eq!(HealthBand::of(-5), HealthBand::Critical);
    }

    #[test]
    fn opponent_excludes_player_and_sentinel() {
        let player = fighter(1, "bulbasaur", 10);
        let candidates = vec![player.clone(), Pokemon::sentinel(), fighter(4, "charmander", 20)];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let opponent = choose_opponent(&candidates, &player, &mut rng).unwrap();
            assert_eq!(opponent.id, 4);
        }
    }

    #[test]
    fn no_opponent_when_alone() {
        let player = fighter(1, "bulbasaur", 10);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(choose_opponent(&[player.clone()], &player, &mut rng).is_none());
        assert!(choose_opponent(&[], &player, &mut rng).is_none());
    }

    #[test]
    fn opponent_choice_covers_every_candidate() {
        let player = fighter(1, "bulbasaur", 10);
        let candidates: Vec<Pokemon> = (2..6).map(|id| fighter(id, "other", 10)).collect();
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(choose_opponent(&candidates, &player, &mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), 4);
    }
}
