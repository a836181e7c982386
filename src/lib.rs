//! # ludo-engine
//!
//! A deterministic Ludo rules engine with board geometry and a per-token
//! motion controller.
//!
//! ## Design Principles
//!
//! 1. **One Source of Truth**: `LudoEngine` owns all authoritative state.
//!    Everything else (motion, autoplay, persistence) reads through it.
//!
//! 2. **Discrete Inputs**: The engine never rolls dice or reads input
//!    itself. Collaborators report roll requests, settled faces, token
//!    selections and elapsed time.
//!
//! 3. **Tolerant of Stale Events**: Inputs that do not fit the current
//!    phase are ignored, and deferred turn hand-offs carry an epoch so a
//!    reset game never sees a timer from the previous one.
//!
//! ## Modules
//!
//! - `core`: Colors, token IDs and positions, configuration, actions, RNG
//! - `board`: Loop topology, safe cells and world-space geometry
//! - `rules`: Board state, move legality, captures, scheduler, engine
//! - `session`: Menu status, player names, settings around the engine
//! - `snapshot`: Persistable game state and its codecs
//! - `motion`: Token animation driven by position changes
//! - `sim`: Seeded automatic play
//!
//! ```
//! use ludo_engine::{Color, GameConfig, LudoEngine, PlayerCount, Position, TokenId};
//!
//! let mut engine = LudoEngine::new(GameConfig::new(PlayerCount::Four));
//! engine.request_roll();
//! engine.resolve_roll(6);
//!
//! let outcome = engine.select_token(TokenId::new(Color::Yellow, 0)).unwrap();
//! assert_eq!(outcome.to, Position::START);
//! assert!(outcome.extra_turn);
//! ```

pub mod core;
pub mod board;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod motion;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Color, ColorMap, GameConfig, GameRng, InvalidPosition, PlayerCount,
    Position, Token, TokenId, TOKENS_PER_COLOR, TOTAL_TOKENS,
};

pub use crate::board::{global_index, is_safe_index, position_to_point, BoardGeometry};

pub use crate::rules::{
    BoardState, CaptureEvent, CaptureFeed, ForfeitReason, LudoEngine, MoveOutcome, TurnPhase,
};

pub use crate::session::{GameSession, GameStatus, GraphicsQuality, Settings, SettingsPatch};

pub use crate::snapshot::{BoardSnapshot, Snapshot, SnapshotError};

pub use crate::motion::{BoardView, MotionDirector, MotionState, TokenMotion, TokenPose};

pub use crate::sim::{AutoPlayReport, AutoPlayer, TokenPolicy};
