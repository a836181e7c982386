//! Board topology and geometry.
//!
//! - `track`: the fixed 52-cell loop layout, entry offsets and safe cells
//! - `geometry`: world-space points for every logical position
//!
//! Both are static data; nothing here changes during a game.

pub mod track;
pub mod geometry;

pub use track::{global_index, is_safe_index, start_offset, LOOP_LENGTH, SAFE_INDICES, START_OFFSETS};
pub use geometry::{
    base_yaw, facing_yaw, position_to_point, BoardGeometry, FINISH_POINT, HOME_CELLS, TOKEN_HEIGHT,
    TRACK_HEIGHT,
};
