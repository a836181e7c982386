//! Per-token motion controller.
//!
//! `TokenMotion` turns a token's logical position into a smooth visual pose.
//! Once per frame it compares the engine's position with the last one it
//! saw and, on a change, queues waypoints along the physical path: one per
//! logical step, never a diagonal shortcut. Captures get a short scripted
//! sequence: the attacker lunges after landing, the defender waits for the
//! attacker to arrive, reels, then walks back to base.
//!
//! The controller only reads the game through `BoardView`.

use std::collections::VecDeque;

use glam::{Quat, Vec3};

use super::view::BoardView;
use crate::board::{base_yaw, facing_yaw, position_to_point};
use crate::core::{Position, TokenId};

/// Travel speed along waypoints, world units per second.
pub const MOVE_SPEED: f32 = 8.0;

/// Distance at which a waypoint counts as reached.
pub const ARRIVAL_TOLERANCE: f32 = 0.1;

/// Delay before a captured token reacts, so the attacker arrives first.
pub const ATTACKER_ARRIVAL_DELAY: f32 = 0.8;

/// Length of the defender's hit sequence.
pub const HIT_DURATION: f32 = 0.6;

/// Length of the attacker's lunge.
pub const ATTACK_DURATION: f32 = 0.5;

/// Length of the landing pulse after the final waypoint.
pub const LANDING_PULSE: f32 = 0.5;

const HOP_HEIGHT: f32 = 0.5;
const HOP_RATE: f32 = 15.0;
const BOB_HEIGHT: f32 = 0.1;
const BOB_RATE: f32 = 5.0;
const LUNGE_DISTANCE: f32 = 0.5;
const LUNGE_RATE: f32 = 10.0;
const BOUNCE_HEIGHT: f32 = 0.5;
const SHAKE_ANGLE: f32 = 0.2;
const REEL_RATE: f32 = 15.0;
const MOVING_TURN_RATE: f32 = 15.0;
const IDLE_TURN_RATE: f32 = 5.0;

/// Visual state of a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// Standing still.
    #[default]
    Idle,
    /// Walking a waypoint queue.
    QueuedMove,
    /// Lunging at a captured opponent.
    Attacking,
    /// Captured: waiting for the attacker, then reeling.
    Hit,
}

/// Where and how to draw a token this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenPose {
    /// World position including hop, bob, lunge and bounce offsets.
    pub translation: Vec3,
    /// Facing, including the hit shake.
    pub rotation: Quat,
    /// Hit shake angle about the forward axis.
    pub tilt: f32,
    /// Show the selection indicator.
    pub selected: bool,
    /// Show the landing pulse.
    pub landing: bool,
    pub state: MotionState,
}

/// Motion controller for one token.
#[derive(Clone, Debug)]
pub struct TokenMotion {
    id: TokenId,
    last_seen: Position,
    /// Grounded position along the path, without cosmetic offsets.
    current: Vec3,
    rotation: Quat,
    target_yaw: f32,
    queue: VecDeque<Vec3>,
    state: MotionState,
    /// Time spent in `Attacking` or `Hit`.
    state_elapsed: f32,
    landing_remaining: f32,
    time: f32,
    offset: Vec3,
    tilt: f32,
    selected: bool,
    /// Timestamp of the capture this token last lunged for.
    played_attack: Option<f64>,
}

impl TokenMotion {
    /// Create a controller resting at `position`.
    #[must_use]
    pub fn new(id: TokenId, position: Position) -> Self {
        let yaw = base_yaw(id.color());
        Self {
            id,
            last_seen: position,
            current: position_to_point(id.color(), position, id.slot()),
            rotation: Quat::from_rotation_y(yaw),
            target_yaw: yaw,
            queue: VecDeque::new(),
            state: MotionState::Idle,
            state_elapsed: 0.0,
            landing_remaining: 0.0,
            time: 0.0,
            offset: Vec3::ZERO,
            tilt: 0.0,
            selected: false,
            played_attack: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> TokenId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Last logical position this controller has reacted to.
    #[must_use]
    pub fn last_seen(&self) -> Position {
        self.last_seen
    }

    /// Waypoints still to walk.
    #[must_use]
    pub fn queued_waypoints(&self) -> usize {
        self.queue.len()
    }

    /// Grounded position, ignoring hop and other cosmetic offsets.
    #[must_use]
    pub fn ground_position(&self) -> Vec3 {
        self.current
    }

    /// Idle with nothing queued.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state == MotionState::Idle && self.queue.is_empty()
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> TokenPose {
        TokenPose {
            translation: self.current + self.offset,
            rotation: self.rotation * Quat::from_rotation_z(self.tilt),
            tilt: self.tilt,
            selected: self.selected,
            landing: self.landing_remaining > 0.0,
            state: self.state,
        }
    }

    /// Advance by `dt` seconds against the current game.
    pub fn update(&mut self, dt: f32, view: &impl BoardView) -> TokenPose {
        self.time += dt;
        self.landing_remaining = (self.landing_remaining - dt).max(0.0);

        let observed = view.token_position(self.id);
        if observed != self.last_seen {
            self.on_position_change(self.last_seen, observed, view);
            self.last_seen = observed;
        }

        self.offset = Vec3::ZERO;
        self.tilt = 0.0;
        let turn_rate = match self.state {
            MotionState::Hit => {
                self.step_hit(dt);
                IDLE_TURN_RATE
            }
            MotionState::Attacking => {
                self.step_attack(dt);
                IDLE_TURN_RATE
            }
            MotionState::QueuedMove => {
                self.step_queue(dt, view);
                MOVING_TURN_RATE
            }
            MotionState::Idle => {
                self.step_idle(view);
                IDLE_TURN_RATE
            }
        };

        let target = Quat::from_rotation_y(self.target_yaw);
        self.rotation = self.rotation.slerp(target, (turn_rate * dt).min(1.0));
        self.selected = self.is_settled() && view.is_movable(self.id);
        self.pose()
    }

    fn point(&self, position: Position) -> Vec3 {
        position_to_point(self.id.color(), position, self.id.slot())
    }

    fn on_position_change(&mut self, from: Position, to: Position, view: &impl BoardView) {
        if to.is_base() {
            self.queue.clear();
            if view.capture_as_defender(self.id).is_some() {
                self.state = MotionState::Hit;
                self.state_elapsed = 0.0;
            } else {
                self.queue.push_back(self.point(Position::BASE));
                self.state = MotionState::QueuedMove;
            }
        } else if from.is_base() && to == Position::START {
            self.queue.push_back(self.point(Position::START));
            self.state = MotionState::QueuedMove;
        } else if !from.is_base() && to > from {
            for raw in (from.raw() + 1)..=to.raw() {
                self.queue.push_back(self.point(Position::new(raw)));
            }
            self.state = MotionState::QueuedMove;
        } else {
            // Not a rules move (e.g. a restored game): jump straight there.
            self.queue.clear();
            self.current = self.point(to);
            self.state = MotionState::Idle;
        }
    }

    fn step_queue(&mut self, dt: f32, view: &impl BoardView) {
        let Some(&target) = self.queue.front() else {
            self.state = MotionState::Idle;
            return;
        };

        let distance = self.current.distance(target);
        if distance > ARRIVAL_TOLERANCE {
            if let Some(yaw) = facing_yaw(self.current, target) {
                self.target_yaw = yaw;
            }
            let direction = (target - self.current) / distance;
            self.current += direction * (MOVE_SPEED * dt).min(distance);
            self.offset.y = (self.time * HOP_RATE).sin().abs() * HOP_HEIGHT;
            return;
        }

        self.current = target;
        self.queue.pop_front();
        if self.queue.is_empty() {
            self.landing_remaining = LANDING_PULSE;
            let fresh = view
                .capture_as_attacker(self.id)
                .filter(|event| self.played_attack.map_or(true, |played| event.timestamp > played));
            if let Some(event) = fresh {
                self.played_attack = Some(event.timestamp);
                self.state = MotionState::Attacking;
                self.state_elapsed = 0.0;
            } else {
                self.state = MotionState::Idle;
            }
        }
    }

    fn step_attack(&mut self, dt: f32) {
        self.state_elapsed += dt;
        if self.state_elapsed >= ATTACK_DURATION {
            self.state = MotionState::Idle;
            return;
        }
        let lunge = (self.state_elapsed * LUNGE_RATE).sin().max(0.0) * LUNGE_DISTANCE;
        // Models face -Z at zero yaw.
        let forward = self.rotation * Vec3::NEG_Z;
        self.offset = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero() * lunge;
    }

    fn step_hit(&mut self, dt: f32) {
        self.state_elapsed += dt;
        if self.state_elapsed < ATTACKER_ARRIVAL_DELAY {
            return;
        }
        let reel = self.state_elapsed - ATTACKER_ARRIVAL_DELAY;
        if reel < HIT_DURATION {
            let phase = reel * REEL_RATE;
            self.offset.y = phase.sin().abs() * BOUNCE_HEIGHT;
            self.tilt = (phase * 2.0).sin() * SHAKE_ANGLE;
            return;
        }
        self.queue.push_back(self.point(Position::BASE));
        self.state = MotionState::QueuedMove;
    }

    fn step_idle(&mut self, view: &impl BoardView) {
        if view.is_movable(self.id) {
            self.offset.y = (self.time * BOB_RATE).sin() * BOB_HEIGHT;
        }
        if let Some(next) = self.last_seen.successor() {
            if let Some(yaw) = facing_yaw(self.current, self.point(next)) {
                self.target_yaw = yaw;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::rules::CaptureEvent;

    struct Fixed {
        position: Position,
        movable: bool,
    }

    impl BoardView for Fixed {
        fn token_position(&self, _: TokenId) -> Position {
            self.position
        }
        fn is_movable(&self, _: TokenId) -> bool {
            self.movable
        }
        fn capture_as_attacker(&self, _: TokenId) -> Option<CaptureEvent> {
            None
        }
        fn capture_as_defender(&self, _: TokenId) -> Option<CaptureEvent> {
            None
        }
    }

    fn id() -> TokenId {
        TokenId::new(Color::Yellow, 0)
    }

    #[test]
    fn test_starts_at_logical_point() {
        let motion = TokenMotion::new(id(), Position::BASE);
        assert_eq!(motion.ground_position(), position_to_point(Color::Yellow, Position::BASE, 0));
        assert!(motion.is_settled());
    }

    #[test]
    fn test_enter_board_queues_single_waypoint() {
        let mut motion = TokenMotion::new(id(), Position::BASE);
        let view = Fixed { position: Position::START, movable: false };

        motion.update(0.0, &view);
        assert_eq!(motion.state(), MotionState::QueuedMove);
        assert_eq!(motion.queued_waypoints(), 1);
    }

    #[test]
    fn test_multi_step_queues_each_cell() {
        let mut motion = TokenMotion::new(id(), Position::new(3));
        let view = Fixed { position: Position::new(8), movable: false };

        motion.update(0.0, &view);
        assert_eq!(motion.queued_waypoints(), 5);
    }

    #[test]
    fn test_walk_settles_with_landing() {
        let mut motion = TokenMotion::new(id(), Position::new(3));
        let view = Fixed { position: Position::new(5), movable: false };

        let mut landed = false;
        for _ in 0..200 {
            let pose = motion.update(1.0 / 60.0, &view);
            landed |= pose.landing;
            if motion.is_settled() {
                break;
            }
        }

        assert!(motion.is_settled());
        assert!(landed);
        assert_eq!(motion.ground_position(), position_to_point(Color::Yellow, Position::new(5), 0));
    }

    #[test]
    fn test_uncaptured_reset_goes_straight_home() {
        let mut motion = TokenMotion::new(id(), Position::new(10));
        let view = Fixed { position: Position::BASE, movable: false };

        motion.update(0.0, &view);
        assert_eq!(motion.state(), MotionState::QueuedMove);
        assert_eq!(motion.queued_waypoints(), 1);
    }

    #[test]
    fn test_backwards_change_snaps() {
        let mut motion = TokenMotion::new(id(), Position::new(20));
        let view = Fixed { position: Position::new(12), movable: false };

        motion.update(0.0, &view);
        assert!(motion.is_settled());
        assert_eq!(motion.ground_position(), position_to_point(Color::Yellow, Position::new(12), 0));
    }

    #[test]
    fn test_selected_only_when_movable_and_idle() {
        let mut motion = TokenMotion::new(id(), Position::BASE);

        let pose = motion.update(0.016, &Fixed { position: Position::BASE, movable: true });
        assert!(pose.selected);

        let pose = motion.update(0.016, &Fixed { position: Position::BASE, movable: false });
        assert!(!pose.selected);
    }

    #[test]
    fn test_idle_bob_only_when_movable() {
        let mut motion = TokenMotion::new(id(), Position::new(4));
        let ground = motion.ground_position();

        let pose = motion.update(0.1, &Fixed { position: Position::new(4), movable: false });
        assert_eq!(pose.translation, ground);

        let pose = motion.update(0.1, &Fixed { position: Position::new(4), movable: true });
        assert_ne!(pose.translation.y, ground.y);
    }
}
