//! The Ludo rules engine.
//!
//! `LudoEngine` owns the authoritative `BoardState` and is the only thing
//! that mutates it. Every operation is an atomic, synchronous transition
//! triggered by a discrete input:
//!
//! - `request_roll`: the player asks to roll
//! - `resolve_roll`: the dice collaborator reports the settled face
//! - `select_token`: the player picks a movable token
//! - `advance_time`: the host reports elapsed frame time, running any due
//!   deferred hand-offs
//!
//! Inputs that do not fit the current phase (stale or duplicate UI events)
//! are rejected silently. Out-of-range data from trusted callers panics.

use log::{debug, info, trace};
use smallvec::SmallVec;

use super::capture::{CaptureEvent, CaptureFeed};
use super::moves::{destination, grants_extra_turn, is_legal_move};
use super::scheduler::{DeferredAction, Scheduler};
use super::state::{BoardState, ForfeitReason, MovableSet, TurnPhase};
use crate::board::{global_index, is_safe_index};
use crate::core::{Action, ActionRecord, Color, GameConfig, Position, Token, TokenId, TOTAL_TOKENS};
use crate::snapshot::{BoardSnapshot, SnapshotError};

/// What a successful `select_token` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The token that moved.
    pub token: TokenId,
    /// Where it started.
    pub from: Position,
    /// Where it landed.
    pub to: Position,
    /// Opponents sent back to base.
    pub captured: SmallVec<[TokenId; 3]>,
    /// Same color rolls again.
    pub extra_turn: bool,
    /// Set when this move won the game.
    pub winner: Option<Color>,
}

/// Authoritative rules state machine for one board.
#[derive(Clone, Debug)]
pub struct LudoEngine {
    config: GameConfig,
    state: BoardState,
    captures: CaptureFeed,
    scheduler: Scheduler,
    /// Seconds of game time reported through `advance_time`.
    clock: f64,
    /// Bumped on every reset; deferred tasks from older epochs are dropped.
    epoch: u64,
}

impl Default for LudoEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl LudoEngine {
    /// Start a new game with the given configuration.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        assert!(
            config.is_active(config.first_turn),
            "First turn must belong to an active color"
        );
        Self {
            state: BoardState::new(config.first_turn),
            config,
            captures: CaptureFeed::new(),
            scheduler: Scheduler::new(),
            clock: 0.0,
            epoch: 0,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the authoritative state.
    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    #[must_use]
    pub fn current_turn(&self) -> Color {
        self.state.current_turn
    }

    #[must_use]
    pub fn dice_value(&self) -> Option<u8> {
        self.state.dice_value
    }

    #[must_use]
    pub fn consecutive_sixes(&self) -> u8 {
        self.state.consecutive_sixes
    }

    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.state.winner
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.phase == TurnPhase::GameOver
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> &Token {
        self.state.token(id)
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        self.state.tokens()
    }

    pub fn tokens_of(&self, color: Color) -> impl Iterator<Item = &Token> {
        self.state.tokens_of(color)
    }

    #[must_use]
    pub fn finished_count(&self, color: Color) -> usize {
        self.state.finished_count(color)
    }

    /// Tokens the current color may move with the resolved face.
    ///
    /// Empty outside `MoveSelection`.
    #[must_use]
    pub fn movable_tokens(&self) -> &[TokenId] {
        &self.state.movable
    }

    #[must_use]
    pub fn is_movable(&self, id: TokenId) -> bool {
        self.state.phase == TurnPhase::MoveSelection && self.state.movable.contains(&id)
    }

    /// Colors seated in this game, in rotation order.
    pub fn active_colors(&self) -> impl Iterator<Item = Color> {
        self.config.player_count.active_colors()
    }

    /// Every buffered capture event.
    #[must_use]
    pub fn captures(&self) -> &CaptureFeed {
        &self.captures
    }

    /// Most recent capture regardless of age.
    #[must_use]
    pub fn latest_capture(&self) -> Option<&CaptureEvent> {
        self.captures.latest()
    }

    /// Captures still inside the configured window.
    pub fn active_captures(&self) -> impl Iterator<Item = &CaptureEvent> {
        self.captures.active(self.clock, self.config.capture_window)
    }

    /// Game time in seconds.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Deferred tasks still queued, including stale ones not yet due.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Accepted actions of the current game, oldest first.
    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.state.history
    }

    // === Operations ===

    /// Dispatch an action. Returns whether it was accepted.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::RequestRoll => self.request_roll(),
            Action::ResolveRoll(face) => self.resolve_roll(face),
            Action::SelectToken(id) => self.select_token(id).is_some(),
        }
    }

    /// Arm the engine to accept a dice result.
    ///
    /// Only valid in `AwaitingRoll`; a no-op otherwise.
    pub fn request_roll(&mut self) -> bool {
        if self.state.phase != TurnPhase::AwaitingRoll || self.state.winner.is_some() {
            trace!("roll request ignored in {:?}", self.state.phase);
            return false;
        }
        self.state.record_action(Action::RequestRoll);
        self.state.phase = TurnPhase::Rolling;
        true
    }

    /// Accept the settled dice face.
    ///
    /// Only valid in `Rolling`; a no-op otherwise. A face outside `[1, 6]`
    /// is a caller bug and panics.
    pub fn resolve_roll(&mut self, face: u8) -> bool {
        assert!((1..=6).contains(&face), "dice face {face} outside [1, 6]");

        if self.state.phase != TurnPhase::Rolling {
            trace!("roll result {face} ignored in {:?}", self.state.phase);
            return false;
        }
        self.state.record_action(Action::ResolveRoll(face));
        self.state.dice_value = Some(face);

        if face == 6 {
            self.state.consecutive_sixes += 1;
        } else {
            self.state.consecutive_sixes = 0;
        }

        if self.state.consecutive_sixes == 3 {
            debug!("{} rolled three sixes and forfeits", self.state.current_turn);
            self.state.consecutive_sixes = 0;
            self.forfeit(ForfeitReason::ThreeSixes);
            return true;
        }

        let color = self.state.current_turn;
        let movable: MovableSet = self
            .state
            .tokens_of(color)
            .filter(|t| is_legal_move(t.position, face))
            .map(|t| t.id)
            .collect();
        self.state.movable = movable;

        if self.state.movable.is_empty() {
            debug!("{color} has no legal move with {face}");
            self.forfeit(ForfeitReason::NoLegalMove);
        } else {
            self.state.phase = TurnPhase::MoveSelection;
        }
        true
    }

    /// Move a token by the resolved face.
    ///
    /// Only valid in `MoveSelection` for a movable token of the current
    /// color; returns `None` otherwise.
    pub fn select_token(&mut self, id: TokenId) -> Option<MoveOutcome> {
        if self.state.phase != TurnPhase::MoveSelection
            || !id.is_valid()
            || id.color() != self.state.current_turn
            || !self.state.movable.contains(&id)
        {
            trace!("selection of {id} ignored in {:?}", self.state.phase);
            return None;
        }
        let face = self.state.dice_value?;
        let color = self.state.current_turn;
        let from = self.state.token(id).position;
        let to = destination(from, face)?;

        self.state.record_action(Action::SelectToken(id));

        let mut captured: SmallVec<[TokenId; 3]> = SmallVec::new();
        if let Some(cell) = global_index(color, to).filter(|&cell| !is_safe_index(cell)) {
            captured.extend(self.state.opponents_at(color, cell).map(|t| t.id));
            for &defender in &captured {
                debug!("{id} captures {defender} on cell {cell}");
                self.state.set_position(defender, Position::BASE);
                self.captures.publish(CaptureEvent {
                    attacker: id,
                    defender,
                    timestamp: self.clock,
                });
            }
        }

        self.state.set_position(id, to);
        self.state.dice_value = None;
        self.state.movable.clear();

        let mut outcome = MoveOutcome {
            token: id,
            from,
            to,
            captured,
            extra_turn: false,
            winner: None,
        };

        if self.state.all_finished(color) {
            info!("{color} wins");
            self.state.winner = Some(color);
            self.state.phase = TurnPhase::GameOver;
            outcome.winner = Some(color);
            return Some(outcome);
        }

        outcome.extra_turn = grants_extra_turn(face, !outcome.captured.is_empty(), to);
        if outcome.extra_turn {
            self.state.phase = TurnPhase::AwaitingRoll;
        } else {
            self.next_turn();
        }
        Some(outcome)
    }

    /// Hand the turn to the next active color in rotation.
    ///
    /// Clears the dice and the six streak. A no-op once the game is won.
    pub fn next_turn(&mut self) -> bool {
        if self.state.winner.is_some() {
            return false;
        }
        let next = self.next_active(self.state.current_turn);
        debug!("turn passes from {} to {next}", self.state.current_turn);
        self.state.begin_turn(next);
        true
    }

    /// The first active color after `color` in rotation order.
    fn next_active(&self, color: Color) -> Color {
        let mut next = color.next();
        while !self.config.is_active(next) {
            next = next.next();
        }
        next
    }

    /// Advance game time by `dt` seconds and run due deferred tasks.
    ///
    /// Returns how many tasks took effect.
    pub fn advance_time(&mut self, dt: f64) -> usize {
        assert!(dt >= 0.0, "time cannot run backwards");
        self.clock += dt;

        let mut applied = 0;
        for task in self.scheduler.take_due(self.clock) {
            if task.is_stale(self.epoch) {
                trace!("dropping stale task from epoch {}", task.epoch);
                continue;
            }
            match task.action {
                DeferredAction::AdvanceTurn { turn_number } => {
                    let pending = matches!(self.state.phase, TurnPhase::TurnForfeit(_))
                        && self.state.turn_number == turn_number;
                    if pending && self.next_turn() {
                        applied += 1;
                    } else {
                        trace!("turn {turn_number} already handed on");
                    }
                }
            }
        }
        applied
    }

    /// Start over: every token to base, first color to roll.
    ///
    /// Deferred tasks from the previous game become stale.
    pub fn new_game(&mut self) {
        self.epoch += 1;
        self.state = BoardState::new(self.config.first_turn);
        self.captures.clear();
        info!("new game (epoch {})", self.epoch);
    }

    /// Replace the configuration and start a new game under it.
    pub fn reconfigure(&mut self, config: GameConfig) {
        assert!(
            config.is_active(config.first_turn),
            "First turn must belong to an active color"
        );
        self.config = config;
        self.new_game();
    }

    // === Persistence ===

    /// Capture the persistable part of the board.
    ///
    /// A pending forfeit hand-off is written as already applied, since the
    /// timer that would perform it is not persisted.
    #[must_use]
    pub fn export(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot {
            tokens: self.state.tokens().to_vec(),
            current_turn: self.state.current_turn,
            dice_value: self.state.dice_value,
            consecutive_sixes: self.state.consecutive_sixes,
            winner: self.state.winner,
        };
        if matches!(self.state.phase, TurnPhase::TurnForfeit(_)) {
            snapshot.current_turn = self.next_active(self.state.current_turn);
            snapshot.dice_value = None;
            snapshot.consecutive_sixes = 0;
        }
        snapshot
    }

    /// Replace the game with a validated snapshot.
    ///
    /// The engine is untouched if validation fails. A restored game resumes
    /// in `GameOver` when a winner is recorded, in `MoveSelection` when a
    /// saved face still allows a move, and in `AwaitingRoll` otherwise.
    pub fn restore(&mut self, config: GameConfig, snapshot: &BoardSnapshot) -> Result<(), SnapshotError> {
        snapshot.validate(&config)?;

        let mut state = BoardState::new(snapshot.current_turn);
        for token in &snapshot.tokens {
            state.set_position(token.id, token.position);
        }
        state.consecutive_sixes = snapshot.consecutive_sixes;

        if let Some(winner) = snapshot.winner {
            state.winner = Some(winner);
            state.phase = TurnPhase::GameOver;
        } else if let Some(face) = snapshot.dice_value {
            let movable: MovableSet = state
                .tokens_of(snapshot.current_turn)
                .filter(|t| is_legal_move(t.position, face))
                .map(|t| t.id)
                .collect();
            state.movable = movable;
            if !state.movable.is_empty() {
                state.dice_value = Some(face);
                state.phase = TurnPhase::MoveSelection;
            }
        }

        self.config = config;
        self.state = state;
        self.captures.clear();
        self.epoch += 1;
        debug_assert_eq!(self.state.tokens().len(), TOTAL_TOKENS);
        info!("restored game (epoch {})", self.epoch);
        Ok(())
    }

    fn forfeit(&mut self, reason: ForfeitReason) {
        self.state.movable.clear();
        self.state.phase = TurnPhase::TurnForfeit(reason);
        self.scheduler.schedule(
            self.clock + self.config.turn_delay,
            self.epoch,
            DeferredAction::AdvanceTurn {
                turn_number: self.state.turn_number,
            },
        );
    }

    /// Place a token directly, bypassing the rules.
    ///
    /// For setting up positions in tests and tutorials.
    #[doc(hidden)]
    pub fn place_token(&mut self, id: TokenId, position: Position) {
        self.state.set_position(id, position);
    }
}
