//! One motion controller per token, updated together.

use rustc_hash::FxHashMap;

use super::controller::{TokenMotion, TokenPose};
use super::view::BoardView;
use crate::core::TokenId;

/// Owns a `TokenMotion` for every token on the board.
#[derive(Clone, Debug, Default)]
pub struct MotionDirector {
    motions: FxHashMap<TokenId, TokenMotion>,
}

impl MotionDirector {
    /// Create controllers for all 16 tokens at their current positions.
    #[must_use]
    pub fn new(view: &impl BoardView) -> Self {
        let motions = TokenId::all()
            .map(|id| (id, TokenMotion::new(id, view.token_position(id))))
            .collect();
        Self { motions }
    }

    /// Advance every controller by `dt` seconds.
    pub fn update_all(&mut self, dt: f32, view: &impl BoardView) {
        for motion in self.motions.values_mut() {
            motion.update(dt, view);
        }
    }

    #[must_use]
    pub fn motion(&self, id: TokenId) -> Option<&TokenMotion> {
        self.motions.get(&id)
    }

    #[must_use]
    pub fn pose(&self, id: TokenId) -> Option<TokenPose> {
        self.motions.get(&id).map(TokenMotion::pose)
    }

    /// Every pose, in token table order.
    pub fn poses(&self) -> impl Iterator<Item = (TokenId, TokenPose)> + '_ {
        TokenId::all().filter_map(|id| self.pose(id).map(|pose| (id, pose)))
    }

    /// No token is walking, lunging or reeling.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.motions.values().all(TokenMotion::is_settled)
    }

    /// Recreate every controller from scratch, e.g. after a restore.
    pub fn resync(&mut self, view: &impl BoardView) {
        *self = Self::new(view);
    }
}
