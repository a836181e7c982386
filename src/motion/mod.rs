//! Token motion: the visual side of moves and captures.
//!
//! The rules engine changes positions instantly. Controllers here notice
//! those changes frame by frame and animate tokens along the board path,
//! cell by cell, with a short lunge for the attacker and a delayed reel for
//! a captured token. Nothing in this module mutates game state.

pub mod view;
pub mod controller;
pub mod director;

pub use view::BoardView;
pub use controller::{
    MotionState, TokenMotion, TokenPose, ARRIVAL_TOLERANCE, ATTACKER_ARRIVAL_DELAY,
    ATTACK_DURATION, HIT_DURATION, LANDING_PULSE, MOVE_SPEED,
};
pub use director::MotionDirector;
