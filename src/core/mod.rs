//! Core types: colors, tokens, configuration, actions, RNG.
//!
//! These are the building blocks shared by the rules engine, the board
//! geometry and the motion controller.

pub mod color;
pub mod token;
pub mod config;
pub mod action;
pub mod rng;

pub use color::{Color, ColorMap};
pub use token::{InvalidPosition, Position, Token, TokenId, TOKENS_PER_COLOR, TOTAL_TOKENS};
pub use config::{GameConfig, PlayerCount, DEFAULT_CAPTURE_WINDOW, DEFAULT_TURN_DELAY};
pub use action::{Action, ActionRecord};
pub use rng::GameRng;
