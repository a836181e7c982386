//! Token identification and logical positions.
//!
//! ## ID Layout
//!
//! Every color owns exactly four tokens, so a token ID packs the owning
//! color and the slot (0-3) into one byte: `color.index() * 4 + slot`.
//! IDs are stable for the lifetime of a game and across snapshots.
//!
//! ## Position Layout
//!
//! - `-1`: in base, not yet entered
//! - `0..=50`: steps along the shared loop, relative to the owner's entry cell
//! - `51..=55`: steps into the owner's private home stretch
//! - `56`: finished

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::color::Color;

/// Tokens owned by each color.
pub const TOKENS_PER_COLOR: usize = 4;

/// Total tokens on the board (all four colors, even in a 2-player game).
pub const TOTAL_TOKENS: usize = TOKENS_PER_COLOR * 4;

/// Stable token identifier encoding color and slot.
///
/// ```
/// use ludo_engine::core::{Color, TokenId};
///
/// let id = TokenId::new(Color::Green, 3);
/// assert_eq!(id.color(), Color::Green);
/// assert_eq!(id.slot(), 3);
/// assert_eq!(id.to_string(), "green-3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u8);

impl TokenId {
    /// Create the ID of `color`'s token in `slot`.
    ///
    /// Panics if `slot >= 4`.
    #[must_use]
    pub const fn new(color: Color, slot: u8) -> Self {
        assert!((slot as usize) < TOKENS_PER_COLOR, "Token slot must be 0-3");
        Self(color.index() as u8 * TOKENS_PER_COLOR as u8 + slot)
    }

    /// Owning color.
    #[must_use]
    pub const fn color(self) -> Color {
        Color::from_index(self.0 as usize / TOKENS_PER_COLOR)
    }

    /// Slot index within the owning color (0-3).
    #[must_use]
    pub const fn slot(self) -> u8 {
        self.0 % TOKENS_PER_COLOR as u8
    }

    /// Dense index into a board-wide token table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Is this a valid ID (one of the 16 board tokens)?
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < TOTAL_TOKENS
    }

    /// The four token IDs of a color, in slot order.
    pub fn of_color(color: Color) -> impl Iterator<Item = TokenId> {
        (0..TOKENS_PER_COLOR as u8).map(move |slot| TokenId::new(color, slot))
    }

    /// All 16 token IDs in table order.
    pub fn all() -> impl Iterator<Item = TokenId> {
        (0..TOTAL_TOKENS as u8).map(TokenId)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color(), self.slot())
    }
}

/// Logical position of a token, always within `[-1, 56]`.
///
/// Serialized as a plain integer; decoding rejects values outside the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct Position(i8);

/// A raw value that is not a valid token position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("token position {0} outside [-1, 56]")]
pub struct InvalidPosition(pub i8);

impl Position {
    /// In base.
    pub const BASE: Position = Position(-1);
    /// The owner's entry cell on the shared loop.
    pub const START: Position = Position(0);
    /// Last cell of the shared loop before the home stretch.
    pub const LOOP_END: Position = Position(50);
    /// First home-stretch cell.
    pub const HOME_START: Position = Position(51);
    /// Finished.
    pub const FINISHED: Position = Position(56);

    /// Create a position.
    ///
    /// Out-of-range values are a programming error and panic.
    #[must_use]
    pub fn new(raw: i8) -> Self {
        Self::checked(raw).unwrap_or_else(|| panic!("token position {raw} outside [-1, 56]"))
    }

    /// Create a position if `raw` is within `[-1, 56]`.
    #[must_use]
    pub const fn checked(raw: i8) -> Option<Self> {
        if raw >= -1 && raw <= 56 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Raw logical value.
    #[must_use]
    pub const fn raw(self) -> i8 {
        self.0
    }

    #[must_use]
    pub const fn is_base(self) -> bool {
        self.0 == -1
    }

    /// On the shared 52-cell loop (`0..=50`).
    #[must_use]
    pub const fn is_on_loop(self) -> bool {
        self.0 >= 0 && self.0 <= 50
    }

    /// In the private home stretch (`51..=55`).
    #[must_use]
    pub const fn is_in_home_stretch(self) -> bool {
        self.0 >= 51 && self.0 <= 55
    }

    #[must_use]
    pub const fn is_finished(self) -> bool {
        self.0 == 56
    }

    /// The next logical position along the token's route, or `None` once finished.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        if self.0 >= 56 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<i8> for Position {
    type Error = InvalidPosition;

    fn try_from(raw: i8) -> Result<Self, Self::Error> {
        Self::checked(raw).ok_or(InvalidPosition(raw))
    }
}

impl From<Position> for i8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::BASE
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            -1 => f.write_str("base"),
            56 => f.write_str("finished"),
            n => write!(f, "{n}"),
        }
    }
}

/// A token on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub color: Color,
    pub position: Position,
}

impl Token {
    /// A token resting in base.
    #[must_use]
    pub const fn in_base(id: TokenId) -> Self {
        Self {
            id,
            color: id.color(),
            position: Position::BASE,
        }
    }

    /// Can this token be captured where it stands?
    ///
    /// Only tokens on a non-safe loop cell are exposed.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        match crate::board::global_index(self.color, self.position) {
            Some(cell) => crate::board::is_safe_index(cell),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_layout() {
        assert_eq!(TokenId::new(Color::Yellow, 0).0, 0);
        assert_eq!(TokenId::new(Color::Red, 1).0, 5);
        assert_eq!(TokenId::new(Color::Blue, 3).0, 15);
    }

    #[test]
    fn test_token_id_decode() {
        for id in TokenId::all() {
            assert!(id.is_valid());
            assert_eq!(TokenId::new(id.color(), id.slot()), id);
        }
        assert!(!TokenId(16).is_valid());
    }

    #[test]
    fn test_of_color() {
        let ids: Vec<_> = TokenId::of_color(Color::Green).collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|id| id.color() == Color::Green));
        assert_eq!(ids[2].slot(), 2);
    }

    #[test]
    #[should_panic(expected = "Token slot must be 0-3")]
    fn test_token_id_bad_slot() {
        let _ = TokenId::new(Color::Red, 4);
    }

    #[test]
    fn test_position_ranges() {
        assert!(Position::BASE.is_base());
        assert!(Position::new(0).is_on_loop());
        assert!(Position::new(50).is_on_loop());
        assert!(Position::new(51).is_in_home_stretch());
        assert!(Position::new(55).is_in_home_stretch());
        assert!(Position::new(56).is_finished());
        assert!(!Position::new(56).is_in_home_stretch());
    }

    #[test]
    fn test_position_checked() {
        assert_eq!(Position::checked(-2), None);
        assert_eq!(Position::checked(57), None);
        assert_eq!(Position::checked(56), Some(Position::FINISHED));
    }

    #[test]
    #[should_panic(expected = "outside [-1, 56]")]
    fn test_position_out_of_range_panics() {
        let _ = Position::new(60);
    }

    #[test]
    fn test_successor() {
        assert_eq!(Position::BASE.successor(), Some(Position::START));
        assert_eq!(Position::new(55).successor(), Some(Position::FINISHED));
        assert_eq!(Position::FINISHED.successor(), None);
    }

    #[test]
    fn test_token_safety() {
        let mut token = Token::in_base(TokenId::new(Color::Yellow, 0));
        assert!(token.is_safe());

        // Yellow's entry cell is global 1, a safe index.
        token.position = Position::START;
        assert!(token.is_safe());

        token.position = Position::new(2);
        assert!(!token.is_safe());

        token.position = Position::new(53);
        assert!(token.is_safe());
    }

    #[test]
    fn test_position_serializes_as_integer() {
        let json = serde_json::to_string(&Position::new(12)).unwrap();
        assert_eq!(json, "12");
        assert_eq!(serde_json::from_str::<Position>("-1").unwrap(), Position::BASE);
    }

    #[test]
    fn test_position_decoding_rejects_out_of_range() {
        assert!(serde_json::from_str::<Position>("57").is_err());
        assert!(serde_json::from_str::<Position>("-2").is_err());
        assert!(bincode::deserialize::<Position>(&bincode::serialize(&57i8).unwrap()).is_err());
        assert_eq!(Position::try_from(56), Ok(Position::FINISHED));
        assert_eq!(Position::try_from(100), Err(InvalidPosition(100)));
    }
}
