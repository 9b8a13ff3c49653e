//! Per-action reuse bookkeeping.

use std::collections::HashMap;

use crate::action::ActionId;

/// Last successful start time for each action id.
///
/// Keyed by action, not instance: only the most recent start matters.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    last_used: HashMap<ActionId, f32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: ActionId, now: f32) {
        self.last_used.insert(action, now);
    }

    /// Forgets the last start so the action can be retried immediately.
    pub fn clear(&mut self, action: ActionId) -> Option<f32> {
        self.last_used.remove(&action)
    }

    pub fn last_used(&self, action: ActionId) -> Option<f32> {
        self.last_used.get(&action).copied()
    }

    /// True when `action` may start at `now` given its reuse time.
    pub fn is_elapsed(&self, action: ActionId, reuse_time_seconds: f32, now: f32) -> bool {
        if reuse_time_seconds <= 0.0 {
            return true;
        }
        match self.last_used(action) {
            Some(last) => now - last >= reuse_time_seconds,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.last_used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_used.is_empty()
    }
}
