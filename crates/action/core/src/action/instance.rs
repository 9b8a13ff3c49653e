//! Runtime state for one in-flight action.

use std::sync::Arc;

use super::config::ActionConfig;
use super::kinds::ActionBehavior;
use super::request::ActionRequest;

/// Generational handle into an [`super::ActionPool`].
///
/// A released slot bumps its generation, so stale handles never alias a
/// recycled instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl InstanceId {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl core::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Lifecycle state of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstanceState {
    /// Created, waiting for the blocking slot.
    Queued,
    /// `on_start` is running.
    Starting,
    /// Holds the blocking slot.
    Blocking,
    /// Running in the background.
    NonBlocking,
    Ended,
    Cancelled,
    /// `on_start` returned false.
    AbortedOnStart,
}

impl InstanceState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::AbortedOnStart)
    }

    /// Returns true if moving from `self` to `next` is a legal lifecycle step.
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Queued, Self::Starting | Self::Cancelled) => true,
            (Self::Starting, Self::Blocking | Self::NonBlocking | Self::AbortedOnStart) => true,
            (Self::Blocking, Self::NonBlocking | Self::Ended | Self::Cancelled) => true,
            (Self::NonBlocking, Self::Ended | Self::Cancelled) => true,
            _ => false,
        }
    }
}

/// One action between `play` and its release back to the pool.
#[derive(Debug)]
pub struct ActionInstance {
    pub(crate) id: InstanceId,
    pub(crate) config: Arc<ActionConfig>,
    pub(crate) request: ActionRequest,
    pub(crate) time_started: Option<f32>,
    pub(crate) state: InstanceState,
    pub(crate) behavior: ActionBehavior,
}

impl ActionInstance {
    pub(crate) fn new(id: InstanceId, config: Arc<ActionConfig>, request: ActionRequest) -> Self {
        let behavior = ActionBehavior::for_logic(config.logic);
        Self {
            id,
            config,
            request,
            time_started: None,
            state: InstanceState::Queued,
            behavior,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn request(&self) -> &ActionRequest {
        &self.request
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn time_started(&self) -> Option<f32> {
        self.time_started
    }

    /// Seconds since `on_start`, zero if the instance has not started.
    pub fn time_running(&self, now: f32) -> f32 {
        self.time_started.map_or(0.0, |started| now - started)
    }

    pub(crate) fn transition(&mut self, next: InstanceState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?} for action {}",
            self.state,
            next,
            self.config.id
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_to_non_blocking_is_one_way() {
        assert!(InstanceState::Blocking.can_transition_to(InstanceState::NonBlocking));
        assert!(!InstanceState::NonBlocking.can_transition_to(InstanceState::Blocking));
    }

    #[test]
    fn aborted_start_skips_end_and_cancel() {
        assert!(InstanceState::Starting.can_transition_to(InstanceState::AbortedOnStart));
        assert!(!InstanceState::AbortedOnStart.can_transition_to(InstanceState::Cancelled));
        assert!(InstanceState::AbortedOnStart.is_terminal());
    }
}
