//! Read-only seam between the rules engine and the motion controller.
//!
//! The motion controller never holds a mutable reference to the engine; it
//! only sees what `BoardView` exposes. Tests drive controllers with scripted
//! views instead of full games.

use crate::core::{Position, TokenId};
use crate::rules::{CaptureEvent, LudoEngine};
use crate::session::GameSession;

/// What the motion controller may read from the authoritative game.
pub trait BoardView {
    /// Logical position of a token.
    fn token_position(&self, id: TokenId) -> Position;

    /// Is this token one the current player may move right now?
    fn is_movable(&self, id: TokenId) -> bool;

    /// Newest capture within its window in which `id` was the attacker.
    fn capture_as_attacker(&self, id: TokenId) -> Option<CaptureEvent>;

    /// Newest capture within its window in which `id` was captured.
    fn capture_as_defender(&self, id: TokenId) -> Option<CaptureEvent>;
}

impl BoardView for LudoEngine {
    fn token_position(&self, id: TokenId) -> Position {
        self.token(id).position
    }

    fn is_movable(&self, id: TokenId) -> bool {
        LudoEngine::is_movable(self, id)
    }

    fn capture_as_attacker(&self, id: TokenId) -> Option<CaptureEvent> {
        self.captures()
            .active_for_attacker(id, self.clock(), self.config().capture_window)
            .copied()
    }

    fn capture_as_defender(&self, id: TokenId) -> Option<CaptureEvent> {
        self.captures()
            .active_for_defender(id, self.clock(), self.config().capture_window)
            .copied()
    }
}

impl BoardView for GameSession {
    fn token_position(&self, id: TokenId) -> Position {
        self.engine().token_position(id)
    }

    fn is_movable(&self, id: TokenId) -> bool {
        BoardView::is_movable(self.engine(), id)
    }

    fn capture_as_attacker(&self, id: TokenId) -> Option<CaptureEvent> {
        self.engine().capture_as_attacker(id)
    }

    fn capture_as_defender(&self, id: TokenId) -> Option<CaptureEvent> {
        self.engine().capture_as_defender(id)
    }
}
