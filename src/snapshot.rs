//! Persistence snapshots.
//!
//! The engine does not decide when or where games are saved. It exposes a
//! plain serializable `Snapshot` and two codecs: compact bytes via `bincode`
//! and human-readable JSON via `serde_json`. Restoring validates every
//! invariant the engine relies on before touching live state.
//!
//! Capture events and pending deferred tasks are transient and never saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Color, ColorMap, GameConfig, PlayerCount, Token, TokenId, TOTAL_TOKENS};
use crate::session::{GameStatus, Settings};

/// Errors raised when a snapshot cannot be decoded or violates board invariants.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode binary snapshot: {0}")]
    Binary(#[from] bincode::Error),
    #[error("failed to decode JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected 16 tokens, found {found}")]
    TokenCount { found: usize },
    #[error("unknown token id {0}")]
    UnknownToken(u8),
    #[error("token {0} appears more than once")]
    DuplicateToken(TokenId),
    #[error("token {token} is recorded as {color}")]
    ColorMismatch { token: TokenId, color: Color },
    #[error("{0} is not seated in a {1:?}-player game")]
    InactiveColor(Color, PlayerCount),
    #[error("token {0} belongs to an unseated color but is off base")]
    InactiveTokenInPlay(TokenId),
    #[error("dice value {0} outside [1, 6]")]
    InvalidFace(u8),
    #[error("six streak {0} exceeds 2")]
    SixStreak(u8),
    #[error("winner {0} has unfinished tokens")]
    WinnerNotFinished(Color),
}

/// Persistable board state: the engine's part of a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tokens: Vec<Token>,
    pub current_turn: Color,
    pub dice_value: Option<u8>,
    pub consecutive_sixes: u8,
    pub winner: Option<Color>,
}

impl BoardSnapshot {
    /// Check the snapshot against board invariants for a game under `config`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, config: &GameConfig) -> Result<(), SnapshotError> {
        if self.tokens.len() != TOTAL_TOKENS {
            return Err(SnapshotError::TokenCount {
                found: self.tokens.len(),
            });
        }

        let mut seen = [false; TOTAL_TOKENS];
        for token in &self.tokens {
            if !token.id.is_valid() {
                return Err(SnapshotError::UnknownToken(token.id.0));
            }
            if std::mem::replace(&mut seen[token.id.index()], true) {
                return Err(SnapshotError::DuplicateToken(token.id));
            }
            if token.color != token.id.color() {
                return Err(SnapshotError::ColorMismatch {
                    token: token.id,
                    color: token.color,
                });
            }
            if !config.is_active(token.color) && !token.position.is_base() {
                return Err(SnapshotError::InactiveTokenInPlay(token.id));
            }
        }

        if !config.is_active(self.current_turn) {
            return Err(SnapshotError::InactiveColor(self.current_turn, config.player_count));
        }
        if let Some(face) = self.dice_value.filter(|f| !(1..=6).contains(f)) {
            return Err(SnapshotError::InvalidFace(face));
        }
        if self.consecutive_sixes > 2 {
            return Err(SnapshotError::SixStreak(self.consecutive_sixes));
        }
        if let Some(winner) = self.winner {
            if !config.is_active(winner) {
                return Err(SnapshotError::InactiveColor(winner, config.player_count));
            }
            let finished = self
                .tokens
                .iter()
                .filter(|t| t.color == winner && t.position.is_finished())
                .count();
            if finished != TokenId::of_color(winner).count() {
                return Err(SnapshotError::WinnerNotFinished(winner));
            }
        }
        Ok(())
    }
}

/// Everything a persistence collaborator needs to save and resume a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: BoardSnapshot,
    pub player_names: ColorMap<String>,
    pub game_status: GameStatus,
    pub selected_environment: String,
    pub player_count: PlayerCount,
    pub settings: Settings,
}

impl Snapshot {
    /// Encode to compact bytes.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Binary` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes produced by `to_bytes`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Binary` for malformed input. Board invariants
    /// are checked on restore, not here.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Encode to JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` for malformed input.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;

    fn fresh_board() -> BoardSnapshot {
        BoardSnapshot {
            tokens: TokenId::all().map(Token::in_base).collect(),
            current_turn: Color::Yellow,
            dice_value: None,
            consecutive_sixes: 0,
            winner: None,
        }
    }

    fn four() -> GameConfig {
        GameConfig::new(PlayerCount::Four)
    }

    #[test]
    fn test_fresh_board_is_valid() {
        assert!(fresh_board().validate(&four()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let mut board = fresh_board();
        board.tokens.pop();
        assert!(matches!(
            board.validate(&four()),
            Err(SnapshotError::TokenCount { found: 15 })
        ));
    }

    #[test]
    fn test_duplicate_token() {
        let mut board = fresh_board();
        board.tokens[1] = board.tokens[0];
        assert!(matches!(
            board.validate(&four()),
            Err(SnapshotError::DuplicateToken(_))
        ));
    }

    #[test]
    fn test_color_mismatch() {
        let mut board = fresh_board();
        board.tokens[0].color = Color::Blue;
        assert!(matches!(
            board.validate(&four()),
            Err(SnapshotError::ColorMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range_position_from_json() {
        let board = fresh_board();
        let json = serde_json::to_string(&board).unwrap().replacen("-1", "57", 1);
        assert!(serde_json::from_str::<BoardSnapshot>(&json).is_err());

        let mut snapshot = Snapshot {
            board,
            player_names: ColorMap::new(|c| c.to_string()),
            game_status: GameStatus::Playing,
            selected_environment: "park".to_string(),
            player_count: PlayerCount::Four,
            settings: Settings::default(),
        };
        let json = snapshot.to_json().unwrap().replacen("-1", "-7", 1);
        assert!(matches!(Snapshot::from_json(&json), Err(SnapshotError::Json(_))));

        snapshot.board.tokens[0].position = Position::START;
        let json = snapshot.to_json().unwrap();
        assert!(Snapshot::from_json(&json).is_ok());
    }

    #[test]
    fn test_inactive_token_off_base() {
        let two = GameConfig::new(PlayerCount::Two);
        let mut board = fresh_board();
        let red = TokenId::new(Color::Red, 1);
        board.tokens[red.index()].position = Position::new(10);

        assert!(board.validate(&four()).is_ok());
        assert!(matches!(
            board.validate(&two),
            Err(SnapshotError::InactiveTokenInPlay(id)) if id == red
        ));
    }

    #[test]
    fn test_winner_must_be_seated() {
        let two = GameConfig::new(PlayerCount::Two);
        let mut board = fresh_board();
        board.winner = Some(Color::Red);
        assert!(matches!(
            board.validate(&two),
            Err(SnapshotError::InactiveColor(Color::Red, PlayerCount::Two))
        ));
    }

    #[test]
    fn test_inactive_turn() {
        let mut board = fresh_board();
        board.current_turn = Color::Red;
        assert!(board.validate(&four()).is_ok());
        assert!(matches!(
            board.validate(&GameConfig::new(PlayerCount::Two)),
            Err(SnapshotError::InactiveColor(Color::Red, PlayerCount::Two))
        ));
    }

    #[test]
    fn test_bad_dice_and_streak() {
        let mut board = fresh_board();
        board.dice_value = Some(0);
        assert!(matches!(board.validate(&four()), Err(SnapshotError::InvalidFace(0))));

        let mut board = fresh_board();
        board.consecutive_sixes = 3;
        assert!(matches!(board.validate(&four()), Err(SnapshotError::SixStreak(3))));
    }

    #[test]
    fn test_winner_must_be_finished() {
        let mut board = fresh_board();
        board.winner = Some(Color::Green);
        assert!(matches!(
            board.validate(&four()),
            Err(SnapshotError::WinnerNotFinished(Color::Green))
        ));

        for token in board.tokens.iter_mut().filter(|t| t.color == Color::Green) {
            token.position = Position::FINISHED;
        }
        assert!(board.validate(&four()).is_ok());
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(matches!(
            Snapshot::from_bytes(&[0xff, 0x01]),
            Err(SnapshotError::Binary(_))
        ));
        assert!(matches!(Snapshot::from_json("{"), Err(SnapshotError::Json(_))));
    }
}
