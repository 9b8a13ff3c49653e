//! Borrowed views handed to the player and to action behaviors.

use crate::action::{ActionConfig, ActionLogic, ActionRequest, InstanceId};
use crate::env::{ReservedActions, ServerCharacter, World};
use crate::types::EntityId;

/// Per-call access to the character and world the player acts on.
///
/// The host builds one of these for every mutating player call. `now` is the
/// current simulation time in seconds and must not go backwards between calls.
pub struct ActionContext<'a> {
    pub now: f32,
    pub character: &'a mut dyn ServerCharacter,
    pub world: &'a mut dyn World,
}

impl<'a> ActionContext<'a> {
    pub fn new(now: f32, character: &'a mut dyn ServerCharacter, world: &'a mut dyn World) -> Self {
        Self {
            now,
            character,
            world,
        }
    }
}

/// Player operations a behavior asks for. Applied once the hook returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerCommand {
    CancelByLogic {
        logic: ActionLogic,
        cancel_all: bool,
        except: InstanceId,
    },
    /// Sets the character's tracked target once earlier commands have run.
    AssignTarget(Option<EntityId>),
}

/// Read-only view of an instance for predicates and buff application.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InstanceView<'a> {
    pub now: f32,
    pub time_started: Option<f32>,
    pub config: &'a ActionConfig,
}

impl InstanceView<'_> {
    pub fn time_running(&self) -> f32 {
        self.time_started.map_or(0.0, |started| self.now - started)
    }

    pub fn reached_exec_time(&self) -> bool {
        self.time_running() >= self.config.exec_time_seconds
    }
}

/// Everything a lifecycle hook may touch.
pub(crate) struct HookContext<'a> {
    pub now: f32,
    pub instance: InstanceId,
    pub time_started: f32,
    pub config: &'a ActionConfig,
    pub request: &'a mut ActionRequest,
    pub character: &'a mut dyn ServerCharacter,
    pub world: &'a mut dyn World,
    pub reserved: ReservedActions,
    pub running_action_count: usize,
    pub(super) commands: &'a mut Vec<PlayerCommand>,
}

impl HookContext<'_> {
    pub fn time_running(&self) -> f32 {
        self.now - self.time_started
    }

    pub fn reached_exec_time(&self) -> bool {
        self.time_running() >= self.config.exec_time_seconds
    }

    /// Cancels other running instances with `logic`, never this one.
    pub fn cancel_running_by_logic(&mut self, logic: ActionLogic, cancel_all: bool) {
        self.commands.push(PlayerCommand::CancelByLogic {
            logic,
            cancel_all,
            except: self.instance,
        });
    }

    /// Queues a tracked-target change behind any cancellations already requested.
    pub fn assign_target(&mut self, target: Option<EntityId>) {
        self.commands.push(PlayerCommand::AssignTarget(target));
    }

    /// Target from the request, falling back to the tracked target.
    pub fn preferred_target(&self) -> Option<EntityId> {
        self.request
            .first_target()
            .or_else(|| self.character.target_id())
    }

    pub fn trigger_anim(&mut self) {
        self.character.trigger_animation(self.config.anim.as_deref());
    }

    pub fn trigger_anim2(&mut self) {
        self.character.trigger_animation(self.config.anim2.as_deref());
    }
}
