//! Authoritative board state.
//!
//! `BoardState` is the single owned aggregate the engine mutates: token
//! positions, whose turn it is, the resolved dice face, the six streak, the
//! winner and the turn phase. It carries no behaviour beyond bookkeeping
//! helpers; the rules live in `LudoEngine`.
//!
//! The move history uses an `im` vector so cloning a state for replay or
//! comparison stays cheap.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::global_index;
use crate::core::{ActionRecord, Color, Position, Token, TokenId, TOKENS_PER_COLOR, TOTAL_TOKENS};

/// Why a turn is being handed on without a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForfeitReason {
    /// Third consecutive six.
    ThreeSixes,
    /// No token can move with the rolled face.
    NoLegalMove,
}

/// Turn phase of the rules state machine.
///
/// `AwaitingRoll → Rolling → (MoveSelection | TurnForfeit | GameOver)`.
/// Roll resolution itself is atomic and never observable between calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The current color may request a roll.
    #[default]
    AwaitingRoll,
    /// Dice are in the air; waiting for the settled face.
    Rolling,
    /// Face resolved; waiting for the player to pick a movable token.
    MoveSelection,
    /// Turn is lost; a deferred advance is pending.
    TurnForfeit(ForfeitReason),
    /// A color has won. Terminal.
    GameOver,
}

/// Tokens that can move this roll. At most one per token of a color.
pub type MovableSet = SmallVec<[TokenId; TOKENS_PER_COLOR]>;

/// Complete authoritative state of one game.
#[derive(Clone, Debug)]
pub struct BoardState {
    /// All 16 tokens, indexed by `TokenId::index()`.
    tokens: [Token; TOTAL_TOKENS],

    /// Color whose turn it is.
    pub current_turn: Color,

    /// Resolved face, `None` while a roll is pending.
    pub dice_value: Option<u8>,

    /// Sixes rolled in a row by the current color.
    pub consecutive_sixes: u8,

    /// Set once a color has all four tokens finished.
    pub winner: Option<Color>,

    pub phase: TurnPhase,

    /// Turn number (starts at 1, bumped on every hand-off).
    pub turn_number: u32,

    /// Action sequence within the turn.
    pub action_sequence: u32,

    /// Tokens movable with the current `dice_value`.
    pub movable: MovableSet,

    /// Accepted actions, oldest first.
    pub history: Vector<ActionRecord>,
}

impl BoardState {
    /// A fresh game: every token in base, `first_turn` to roll.
    #[must_use]
    pub fn new(first_turn: Color) -> Self {
        Self {
            tokens: std::array::from_fn(|i| Token::in_base(TokenId(i as u8))),
            current_turn: first_turn,
            dice_value: None,
            consecutive_sixes: 0,
            winner: None,
            phase: TurnPhase::AwaitingRoll,
            turn_number: 1,
            action_sequence: 0,
            movable: MovableSet::new(),
            history: Vector::new(),
        }
    }

    // === Tokens ===

    /// Get a token.
    #[must_use]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// All tokens in ID order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The four tokens of `color`.
    pub fn tokens_of(&self, color: Color) -> impl Iterator<Item = &Token> {
        let start = color.index() * TOKENS_PER_COLOR;
        self.tokens[start..start + TOKENS_PER_COLOR].iter()
    }

    /// Move a token. Finished tokens never move again.
    pub fn set_position(&mut self, id: TokenId, position: Position) {
        let token = &mut self.tokens[id.index()];
        assert!(
            !token.position.is_finished() || position.is_finished(),
            "finished token {id} cannot move"
        );
        token.position = position;
    }

    /// Opponents of `color` standing on global loop cell `cell`.
    pub fn opponents_at(&self, color: Color, cell: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens
            .iter()
            .filter(move |t| t.color != color && global_index(t.color, t.position) == Some(cell))
    }

    /// How many of `color`'s tokens have finished.
    #[must_use]
    pub fn finished_count(&self, color: Color) -> usize {
        self.tokens_of(color).filter(|t| t.position.is_finished()).count()
    }

    /// Has every token of `color` finished?
    #[must_use]
    pub fn all_finished(&self, color: Color) -> bool {
        self.finished_count(color) == TOKENS_PER_COLOR
    }

    // === Action History ===

    /// Record an accepted action for the current color and turn.
    pub fn record_action(&mut self, action: crate::core::Action) {
        let sequence = self.next_sequence();
        self.history
            .push_back(ActionRecord::new(self.current_turn, action, self.turn_number, sequence));
    }

    /// Get the next action sequence number and increment.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.action_sequence;
        self.action_sequence += 1;
        seq
    }

    // === Turn Advancement ===

    /// Hand the turn to `color`: dice cleared, streak reset.
    pub fn begin_turn(&mut self, color: Color) {
        self.current_turn = color;
        self.dice_value = None;
        self.consecutive_sixes = 0;
        self.movable.clear();
        self.phase = TurnPhase::AwaitingRoll;
        self.turn_number += 1;
        self.action_sequence = 0;
    }
}
