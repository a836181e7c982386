//! Capture events.
//!
//! The engine publishes one `CaptureEvent` per captured token. Consumers
//! (the motion controller, sound or haptics hosts) read them from a small
//! ring buffer and decide for themselves whether an event is still inside
//! its window. Events are never persisted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::TokenId;

/// Events kept in the feed before the oldest is dropped.
pub const CAPTURE_FEED_CAPACITY: usize = 8;

/// A token sent back to base by an opponent landing on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// The moving token.
    pub attacker: TokenId,
    /// The token sent back to base.
    pub defender: TokenId,
    /// Engine clock at publication, in seconds.
    pub timestamp: f64,
}

impl CaptureEvent {
    /// Is this event still within `window` seconds of `now`?
    #[must_use]
    pub fn is_active(&self, now: f64, window: f64) -> bool {
        now - self.timestamp < window
    }
}

/// Bounded ring buffer of recent captures, oldest first.
#[derive(Clone, Debug, Default)]
pub struct CaptureFeed {
    events: VecDeque<CaptureEvent>,
}

impl CaptureFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(CAPTURE_FEED_CAPACITY),
        }
    }

    /// Publish an event, evicting the oldest when full.
    pub fn publish(&mut self, event: CaptureEvent) {
        if self.events.len() == CAPTURE_FEED_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Most recent event regardless of age.
    #[must_use]
    pub fn latest(&self) -> Option<&CaptureEvent> {
        self.events.back()
    }

    /// Events still inside the window, oldest first.
    pub fn active(&self, now: f64, window: f64) -> impl Iterator<Item = &CaptureEvent> {
        self.events.iter().filter(move |e| e.is_active(now, window))
    }

    /// Newest active event in which `token` attacked.
    #[must_use]
    pub fn active_for_attacker(&self, token: TokenId, now: f64, window: f64) -> Option<&CaptureEvent> {
        self.events
            .iter()
            .rev()
            .find(|e| e.attacker == token && e.is_active(now, window))
    }

    /// Newest active event in which `token` was captured.
    #[must_use]
    pub fn active_for_defender(&self, token: TokenId, now: f64, window: f64) -> Option<&CaptureEvent> {
        self.events
            .iter()
            .rev()
            .find(|e| e.defender == token && e.is_active(now, window))
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
