//! Headless games for tests and balance checks.
//!
//! `AutoPlayer` stands in for both the dice collaborator and the player:
//! it rolls with a seeded `GameRng`, picks tokens with a `TokenPolicy` and
//! reports frame time so forfeited turns hand on. The same seed and policy
//! always play the same game.

use log::debug;

use crate::board::{global_index, is_safe_index};
use crate::core::{Color, GameRng, TokenId};
use crate::rules::{destination, LudoEngine, MoveOutcome, TurnPhase};
use crate::session::{GameSession, GameStatus};

/// Default cap on dice rolls per game.
pub const DEFAULT_MAX_ROLLS: u32 = 10_000;

/// How the automatic player chooses among movable tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenPolicy {
    /// Lowest slot first.
    #[default]
    FirstMovable,
    /// Uniformly at random.
    Random,
    /// A capturing move if there is one, else the most advanced token.
    PreferCapture,
}

/// Summary of one automatic game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoPlayReport {
    /// `None` when the roll cap was reached first.
    pub winner: Option<Color>,
    pub rolls: u32,
    pub captures: u32,
    pub forfeits: u32,
}

/// Something an `AutoPlayer` can drive: a bare engine or a full session.
trait Table {
    fn engine(&self) -> &LudoEngine;
    fn request_roll(&mut self) -> bool;
    fn resolve_roll(&mut self, face: u8) -> bool;
    fn select_token(&mut self, id: TokenId) -> Option<MoveOutcome>;
    fn advance_time(&mut self, dt: f64) -> usize;
}

impl Table for LudoEngine {
    fn engine(&self) -> &LudoEngine {
        self
    }
    fn request_roll(&mut self) -> bool {
        LudoEngine::request_roll(self)
    }
    fn resolve_roll(&mut self, face: u8) -> bool {
        LudoEngine::resolve_roll(self, face)
    }
    fn select_token(&mut self, id: TokenId) -> Option<MoveOutcome> {
        LudoEngine::select_token(self, id)
    }
    fn advance_time(&mut self, dt: f64) -> usize {
        LudoEngine::advance_time(self, dt)
    }
}

impl Table for GameSession {
    fn engine(&self) -> &LudoEngine {
        GameSession::engine(self)
    }
    fn request_roll(&mut self) -> bool {
        GameSession::request_roll(self)
    }
    fn resolve_roll(&mut self, face: u8) -> bool {
        GameSession::resolve_roll(self, face)
    }
    fn select_token(&mut self, id: TokenId) -> Option<MoveOutcome> {
        GameSession::select_token(self, id)
    }
    fn advance_time(&mut self, dt: f64) -> usize {
        GameSession::advance_time(self, dt)
    }
}

/// Plays games to completion with seeded dice.
#[derive(Clone, Debug)]
pub struct AutoPlayer {
    policy: TokenPolicy,
    max_rolls: u32,
    dice: GameRng,
    choices: GameRng,
}

impl AutoPlayer {
    /// Create a player whose dice and choices derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let rng = GameRng::new(seed);
        Self {
            policy: TokenPolicy::default(),
            max_rolls: DEFAULT_MAX_ROLLS,
            dice: rng.for_context("dice"),
            choices: rng.for_context("policy"),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Panics if `max_rolls` is zero.
    #[must_use]
    pub fn with_max_rolls(mut self, max_rolls: u32) -> Self {
        assert!(max_rolls > 0, "max_rolls must be positive");
        self.max_rolls = max_rolls;
        self
    }

    #[must_use]
    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Play the engine's current game until someone wins or the roll cap is hit.
    pub fn play(&mut self, engine: &mut LudoEngine) -> AutoPlayReport {
        self.drive(engine)
    }

    /// Play a session's game, starting it from the menu if needed.
    pub fn play_session(&mut self, session: &mut GameSession) -> AutoPlayReport {
        if session.status() == GameStatus::Menu {
            let environment = session.environment().to_string();
            session.start_game(environment);
        }
        self.drive(session)
    }

    /// Choose one of the currently movable tokens.
    pub fn choose_token(&mut self, engine: &LudoEngine) -> Option<TokenId> {
        let movable = engine.movable_tokens();
        match self.policy {
            TokenPolicy::FirstMovable => movable.first().copied(),
            TokenPolicy::Random => self.choices.choose(movable).copied(),
            TokenPolicy::PreferCapture => {
                let face = engine.dice_value()?;
                let captures = |id: &TokenId| {
                    let color = id.color();
                    destination(engine.token(*id).position, face)
                        .and_then(|to| global_index(color, to))
                        .filter(|&cell| !is_safe_index(cell))
                        .is_some_and(|cell| engine.state().opponents_at(color, cell).next().is_some())
                };
                movable
                    .iter()
                    .find(|id| captures(id))
                    .or_else(|| movable.iter().max_by_key(|id| engine.token(**id).position))
                    .copied()
            }
        }
    }

    fn drive(&mut self, table: &mut impl Table) -> AutoPlayReport {
        let mut report = AutoPlayReport::default();
        let delay = table.engine().config().turn_delay;

        while report.rolls < self.max_rolls && !table.engine().is_game_over() {
            match table.engine().phase() {
                TurnPhase::AwaitingRoll => {
                    if !table.request_roll() {
                        break;
                    }
                }
                TurnPhase::Rolling => {
                    let face = self.dice.roll_die();
                    table.resolve_roll(face);
                    report.rolls += 1;
                }
                TurnPhase::MoveSelection => {
                    let Some(outcome) = self
                        .choose_token(table.engine())
                        .and_then(|id| table.select_token(id))
                    else {
                        break;
                    };
                    report.captures += outcome.captured.len() as u32;
                }
                TurnPhase::TurnForfeit(_) => {
                    report.forfeits += 1;
                    if table.advance_time(delay) == 0 {
                        break;
                    }
                }
                TurnPhase::GameOver => break,
            }
        }

        report.winner = table.engine().winner();
        debug!(
            "autoplay finished after {} rolls: winner {:?}, {} captures, {} forfeits",
            report.rolls, report.winner, report.captures, report.forfeits
        );
        report
    }
}
