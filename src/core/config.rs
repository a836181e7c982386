//! Game configuration types.
//!
//! Hosts configure the engine at startup by providing a `GameConfig`:
//! - `PlayerCount`: which colors take part
//! - `first_turn`: the color that rolls first
//! - timing for deferred turn advances and the capture event window
//!
//! The board topology itself is fixed and lives in `crate::board`.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Default delay before a forfeited or move-less turn advances (seconds).
pub const DEFAULT_TURN_DELAY: f64 = 1.0;

/// Default lifetime of a published capture event (seconds).
pub const DEFAULT_CAPTURE_WINDOW: f64 = 2.0;

/// Number of seats in play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCount {
    /// First and third colors in rotation (Yellow and Green).
    #[default]
    Two,
    /// All four colors.
    Four,
}

impl PlayerCount {
    /// Number of active colors.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            PlayerCount::Two => 2,
            PlayerCount::Four => 4,
        }
    }

    /// Is `color` seated in a game of this size?
    #[must_use]
    pub const fn is_active(self, color: Color) -> bool {
        match self {
            PlayerCount::Four => true,
            PlayerCount::Two => matches!(color, Color::Yellow | Color::Green),
        }
    }

    /// Active colors in rotation order.
    pub fn active_colors(self) -> impl Iterator<Item = Color> {
        Color::ROTATION.into_iter().filter(move |&c| self.is_active(c))
    }
}

impl TryFrom<usize> for PlayerCount {
    type Error = usize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(PlayerCount::Two),
            4 => Ok(PlayerCount::Four),
            other => Err(other),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seats in play.
    pub player_count: PlayerCount,

    /// Color that rolls first. Must be active.
    pub first_turn: Color,

    /// Delay before a three-sixes forfeit or a move-less roll hands the turn on.
    /// Lets the presentation layer show the rolled value.
    pub turn_delay: f64,

    /// How long a capture event stays relevant to the motion controller.
    pub capture_window: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: PlayerCount::default(),
            first_turn: Color::Yellow,
            turn_delay: DEFAULT_TURN_DELAY,
            capture_window: DEFAULT_CAPTURE_WINDOW,
        }
    }
}

impl GameConfig {
    /// Create a configuration for the given seat count, Yellow first.
    pub fn new(player_count: PlayerCount) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the first color to roll.
    #[must_use]
    pub fn with_first_turn(mut self, color: Color) -> Self {
        assert!(
            self.player_count.is_active(color),
            "First turn must belong to an active color"
        );
        self.first_turn = color;
        self
    }

    /// Set the deferred turn-advance delay.
    #[must_use]
    pub fn with_turn_delay(mut self, seconds: f64) -> Self {
        assert!(seconds >= 0.0, "Turn delay must not be negative");
        self.turn_delay = seconds;
        self
    }

    /// Set the capture event window.
    #[must_use]
    pub fn with_capture_window(mut self, seconds: f64) -> Self {
        assert!(seconds > 0.0, "Capture window must be positive");
        self.capture_window = seconds;
        self
    }

    /// Is `color` seated in this game?
    #[must_use]
    pub fn is_active(&self, color: Color) -> bool {
        self.player_count.is_active(color)
    }
}
