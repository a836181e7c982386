//! Player inputs and the action history.
//!
//! Every input the engine accepts is one of three actions:
//! - `RequestRoll`: the player asks for the dice to be thrown
//! - `ResolveRoll(face)`: the dice collaborator reports the settled face
//! - `SelectToken(id)`: the player picks which token to move
//!
//! Accepted actions are recorded as `ActionRecord`s for replay and debugging.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::token::TokenId;

/// A single engine input.
///
/// ## Example
///
/// ```
/// use ludo_engine::core::{Action, Color, TokenId};
///
/// let roll = Action::RequestRoll;
/// let six = Action::ResolveRoll(6);
/// let pick = Action::SelectToken(TokenId::new(Color::Yellow, 0));
/// assert_ne!(roll, six);
/// assert_eq!(pick.token(), Some(TokenId::new(Color::Yellow, 0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Arm the engine to accept a dice result.
    RequestRoll,
    /// Settled dice face, 1-6.
    ResolveRoll(u8),
    /// Move the given token by the resolved face.
    SelectToken(TokenId),
}

impl Action {
    /// The token this action refers to, if any.
    #[must_use]
    pub fn token(&self) -> Option<TokenId> {
        match self {
            Action::SelectToken(id) => Some(*id),
            _ => None,
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay/debugging and for checking determinism in tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The color whose turn it was.
    pub color: Color,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(color: Color, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            color,
            action,
            turn,
            sequence,
        }
    }
}
