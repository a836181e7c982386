//! Path geometry: logical positions to world-space points.
//!
//! The board is a cross centred on the origin, lying in the XZ plane with Y
//! up. The shared loop and the four home stretches are generated once from
//! the anchor tables below by linear interpolation; everything after that is
//! table lookup.
//!
//! ## Loop construction
//!
//! The loop is four blocks of 13 cells, counter-clockwise Yellow → Red →
//! Green → Blue. Each block is a 6-cell inbound row toward the centre, one
//! corner cell, and a 6-cell outbound row away from the centre.

use std::sync::OnceLock;

use glam::{Vec2, Vec3};

use super::track::{global_index, LOOP_LENGTH};
use crate::core::{Color, ColorMap, Position, TOKENS_PER_COLOR};

/// Height of the track surface.
pub const TRACK_HEIGHT: f32 = 0.2;

/// Height at which tokens stand on a cell.
pub const TOKEN_HEIGHT: f32 = 1.7;

/// Shared finish point at the centre of the board.
pub const FINISH_POINT: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Cells per inbound or outbound row.
const ROW_CELLS: usize = 6;

/// Cells per home stretch (positions 51-55).
pub const HOME_CELLS: usize = 5;

/// One 13-cell block of the loop, as (x, z) anchors.
struct LoopBlock {
    inbound: (Vec2, Vec2),
    corner: Vec2,
    outbound: (Vec2, Vec2),
}

const LOOP_BLOCKS: [LoopBlock; 4] = [
    // yellow arm -> red arm
    LoopBlock {
        inbound: (Vec2::new(1.0, 6.5), Vec2::new(1.0, 1.5)),
        corner: Vec2::new(1.0, 1.0),
        outbound: (Vec2::new(1.5, 1.0), Vec2::new(6.5, 1.0)),
    },
    // red arm -> green arm
    LoopBlock {
        inbound: (Vec2::new(6.5, -1.0), Vec2::new(1.5, -1.0)),
        corner: Vec2::new(1.0, -1.0),
        outbound: (Vec2::new(1.0, -1.5), Vec2::new(1.0, -6.5)),
    },
    // green arm -> blue arm
    LoopBlock {
        inbound: (Vec2::new(-1.0, -6.5), Vec2::new(-1.0, -1.5)),
        corner: Vec2::new(-1.0, -1.0),
        outbound: (Vec2::new(-1.5, -1.0), Vec2::new(-6.5, -1.0)),
    },
    // blue arm -> yellow arm
    LoopBlock {
        inbound: (Vec2::new(-6.5, 1.0), Vec2::new(-1.5, 1.0)),
        corner: Vec2::new(-1.0, 1.0),
        outbound: (Vec2::new(-1.0, 1.5), Vec2::new(-1.0, 6.5)),
    },
];

/// Home stretch endpoints (arm midline toward the centre), rotation order.
const HOME_ANCHORS: [(Vec2, Vec2); 4] = [
    (Vec2::new(0.0, 5.5), Vec2::new(0.0, 1.5)),
    (Vec2::new(5.5, 0.0), Vec2::new(1.5, 0.0)),
    (Vec2::new(0.0, -5.5), Vec2::new(0.0, -1.5)),
    (Vec2::new(-5.5, 0.0), Vec2::new(-1.5, 0.0)),
];

/// Centre of each color's base, rotation order.
const BASE_ANCHORS: [Vec2; 4] = [
    Vec2::new(5.5, 5.5),
    Vec2::new(5.5, -5.5),
    Vec2::new(-5.5, -5.5),
    Vec2::new(-5.5, 5.5),
];

/// Resting spots around a base anchor, by token slot.
const SPAWN_OFFSETS: [Vec2; TOKENS_PER_COLOR] = [
    Vec2::new(-1.2, -1.2),
    Vec2::new(1.2, -1.2),
    Vec2::new(-1.2, 1.2),
    Vec2::new(1.2, 1.2),
];

/// Evenly spaced points from `start` to `end` inclusive, on the track surface.
fn segment(start: Vec2, end: Vec2, count: usize) -> impl Iterator<Item = Vec3> {
    (0..count).map(move |i| {
        let t = i as f32 / (count - 1) as f32;
        let p = start.lerp(end, t);
        Vec3::new(p.x, TRACK_HEIGHT, p.y)
    })
}

/// Precomputed board geometry.
#[derive(Clone, Debug)]
pub struct BoardGeometry {
    global: Vec<Vec3>,
    home: ColorMap<Vec<Vec3>>,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardGeometry {
    /// Build the geometry from the anchor tables.
    #[must_use]
    pub fn new() -> Self {
        let mut global = Vec::with_capacity(LOOP_LENGTH);
        for block in &LOOP_BLOCKS {
            global.extend(segment(block.inbound.0, block.inbound.1, ROW_CELLS));
            global.push(Vec3::new(block.corner.x, TRACK_HEIGHT, block.corner.y));
            global.extend(segment(block.outbound.0, block.outbound.1, ROW_CELLS));
        }
        debug_assert_eq!(global.len(), LOOP_LENGTH);

        let home = ColorMap::new(|color| {
            let (start, end) = HOME_ANCHORS[color.index()];
            segment(start, end, HOME_CELLS).collect()
        });

        Self { global, home }
    }

    /// Shared process-wide instance.
    pub fn standard() -> &'static BoardGeometry {
        static STANDARD: OnceLock<BoardGeometry> = OnceLock::new();
        STANDARD.get_or_init(BoardGeometry::new)
    }

    /// The 52 loop cells in global index order, at track height.
    #[must_use]
    pub fn global_path(&self) -> &[Vec3] {
        &self.global
    }

    /// The 5 home-stretch cells of `color`, at track height.
    #[must_use]
    pub fn home_path(&self, color: Color) -> &[Vec3] {
        &self.home[color]
    }

    /// Centre of `color`'s base, at token height.
    #[must_use]
    pub fn base_anchor(&self, color: Color) -> Vec3 {
        let anchor = BASE_ANCHORS[color.index()];
        Vec3::new(anchor.x, TOKEN_HEIGHT, anchor.y)
    }

    /// Where a token of `color` in `slot` stands at `position`.
    ///
    /// Total over valid inputs: every position in `[-1, 56]` and slot in
    /// `0..4` has a point.
    #[must_use]
    pub fn position_to_point(&self, color: Color, position: Position, slot: u8) -> Vec3 {
        if position.is_base() {
            let offset = SPAWN_OFFSETS[slot as usize];
            return self.base_anchor(color) + Vec3::new(offset.x, 0.0, offset.y);
        }
        if position.is_finished() {
            return FINISH_POINT;
        }

        let cell = match global_index(color, position) {
            Some(index) => self.global[index],
            None => self.home[color][(position.raw() - Position::HOME_START.raw()) as usize],
        };

        Vec3::new(cell.x, TOKEN_HEIGHT, cell.z)
    }
}

/// Where a token stands, using the standard board.
///
/// ```
/// use ludo_engine::board::position_to_point;
/// use ludo_engine::core::{Color, Position};
///
/// let a = position_to_point(Color::Red, Position::FINISHED, 0);
/// let b = position_to_point(Color::Blue, Position::FINISHED, 3);
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn position_to_point(color: Color, position: Position, slot: u8) -> Vec3 {
    BoardGeometry::standard().position_to_point(color, position, slot)
}

/// Yaw (radians about +Y) that faces a token from `from` toward `to`.
///
/// Models face -Z at zero yaw. Returns `None` when the points coincide in
/// the XZ plane.
#[must_use]
pub fn facing_yaw(from: Vec3, to: Vec3) -> Option<f32> {
    let delta = Vec2::new(to.x - from.x, to.z - from.z);
    if delta.length_squared() <= 1e-6 {
        return None;
    }
    Some(delta.x.atan2(delta.y) + std::f32::consts::PI)
}

/// Yaw a token rests at in base, looking toward the centre of the board.
#[must_use]
pub fn base_yaw(color: Color) -> f32 {
    use std::f32::consts::{FRAC_PI_2, PI};
    match color {
        Color::Yellow => PI,
        Color::Red => -FRAC_PI_2,
        Color::Green => 0.0,
        Color::Blue => FRAC_PI_2,
    }
}
