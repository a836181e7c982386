//! Deferred engine transitions.
//!
//! A three-sixes forfeit or a roll with no legal move hands the turn on
//! after a short delay so the rolled face can be shown. Those hand-offs are
//! queued here as tasks stamped with the engine epoch at scheduling time.
//! The engine bumps its epoch on every reset, so a task that outlives the
//! game it was scheduled for is recognisably stale and gets dropped.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Effect applied when a task comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Hand the turn to the next color, if the engine is still waiting on
    /// the forfeit of turn `turn_number`.
    AdvanceTurn { turn_number: u32 },
}

/// A deferred action with its due time and owning epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Engine clock at which the task runs.
    pub due_at: f64,
    /// Engine epoch when the task was scheduled.
    pub epoch: u64,
    pub action: DeferredAction,
}

impl ScheduledTask {
    /// Was this task scheduled in a different game than `epoch`?
    #[must_use]
    pub fn is_stale(&self, epoch: u64) -> bool {
        self.epoch != epoch
    }
}

/// Pending deferred tasks. Cancel-free: tasks only leave by coming due.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    tasks: SmallVec<[ScheduledTask; 2]>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run at `due_at`.
    pub fn schedule(&mut self, due_at: f64, epoch: u64, action: DeferredAction) {
        self.tasks.push(ScheduledTask { due_at, epoch, action });
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: f64) -> SmallVec<[ScheduledTask; 2]> {
        let mut due: SmallVec<[ScheduledTask; 2]> = SmallVec::new();
        self.tasks.retain(|task| {
            if task.due_at <= now {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at));
        due
    }

    /// Number of queued tasks, stale or not.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Earliest due time, if anything is queued.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.tasks.iter().map(|t| t.due_at).min_by(f64::total_cmp)
    }
}
