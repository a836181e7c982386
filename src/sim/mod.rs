//! Simulation drivers.

pub mod autoplay;

pub use autoplay::{AutoPlayReport, AutoPlayer, TokenPolicy, DEFAULT_MAX_ROLLS};
