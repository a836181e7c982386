//! Static track layout: entry offsets and safe cells.
//!
//! The shared loop has 52 cells numbered counter-clockwise starting at the
//! first inbound cell of Yellow's arm. Each color enters the loop at its own
//! offset and walks 51 cells (logical positions 0-50) before turning into its
//! home stretch.

use crate::core::{Color, Position};

/// Cells on the shared loop.
pub const LOOP_LENGTH: usize = 52;

/// Global index of each color's entry cell, in rotation order.
pub const START_OFFSETS: [usize; 4] = [
    1,  // yellow
    14, // red
    27, // green
    40, // blue
];

/// Global indices where capture cannot happen: every entry cell and the
/// star cell on each outbound row.
pub const SAFE_INDICES: [usize; 8] = [1, 8, 14, 21, 27, 34, 40, 47];

/// Entry cell of `color` on the shared loop.
#[must_use]
pub const fn start_offset(color: Color) -> usize {
    START_OFFSETS[color.index()]
}

/// Map a color-relative loop position to its global cell.
///
/// Returns `None` for positions off the loop (base, home stretch, finished).
///
/// ```
/// use ludo_engine::board::global_index;
/// use ludo_engine::core::{Color, Position};
///
/// assert_eq!(global_index(Color::Red, Position::START), Some(14));
/// assert_eq!(global_index(Color::Blue, Position::new(12)), Some(0));
/// assert_eq!(global_index(Color::Blue, Position::new(51)), None);
/// ```
#[must_use]
pub fn global_index(color: Color, position: Position) -> Option<usize> {
    if !position.is_on_loop() {
        return None;
    }
    Some((start_offset(color) + position.raw() as usize) % LOOP_LENGTH)
}

/// Is this global cell a safe cell?
#[must_use]
pub fn is_safe_index(index: usize) -> bool {
    SAFE_INDICES.contains(&index)
}
