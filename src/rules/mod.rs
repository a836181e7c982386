//! The Ludo rules engine.
//!
//! - `state`: the single owned aggregate of authoritative game state
//! - `moves`: pure legality rules (exact landing, entry on six, extra turns)
//! - `capture`: capture events and the ring buffer consumers read them from
//! - `scheduler`: epoch-guarded deferred turn hand-offs
//! - `engine`: `LudoEngine`, the state machine tying them together

pub mod state;
pub mod moves;
pub mod capture;
pub mod scheduler;
pub mod engine;

pub use state::{BoardState, ForfeitReason, MovableSet, TurnPhase};
pub use moves::{destination, grants_extra_turn, is_legal_move, ENTRY_FACE};
pub use capture::{CaptureEvent, CaptureFeed, CAPTURE_FEED_CAPACITY};
pub use scheduler::{DeferredAction, ScheduledTask, Scheduler};
pub use engine::{LudoEngine, MoveOutcome};
