//! Pure move legality.
//!
//! The exact-landing rule: a move is legal iff the token is in base and the
//! face is 6, or the token is on the board and `position + face <= 56`.
//! Overshoot is never clamped.

use crate::core::Position;

/// Face required to leave base.
pub const ENTRY_FACE: u8 = 6;

/// Where a token at `position` lands with `face`, or `None` if it cannot move.
///
/// ```
/// use ludo_engine::core::Position;
/// use ludo_engine::rules::destination;
///
/// assert_eq!(destination(Position::BASE, 6), Some(Position::START));
/// assert_eq!(destination(Position::BASE, 5), None);
/// assert_eq!(destination(Position::new(53), 3), Some(Position::FINISHED));
/// assert_eq!(destination(Position::new(53), 5), None);
/// ```
#[must_use]
pub fn destination(position: Position, face: u8) -> Option<Position> {
    debug_assert!((1..=6).contains(&face), "dice face {face} outside [1, 6]");

    if position.is_base() {
        return (face == ENTRY_FACE).then_some(Position::START);
    }
    Position::checked(position.raw() + face as i8)
}

/// Can a token at `position` move with `face`?
#[must_use]
pub fn is_legal_move(position: Position, face: u8) -> bool {
    destination(position, face).is_some()
}

/// Does a completed move keep the turn with the same color?
#[must_use]
pub fn grants_extra_turn(face: u8, captured: bool, landed: Position) -> bool {
    face == 6 || captured || landed.is_finished()
}
