//! Per-logic action behaviors.
//!
//! Each [`ActionLogic`] maps to one variant of [`ActionBehavior`]. A variant owns
//! only the state its logic needs; timing, config and request live on the
//! instance and reach hooks through [`HookContext`].

mod aoe;
mod buff;
mod charged_launch_projectile;
mod charged_shield;
mod chase;
mod dash_attack;
mod emote;
mod launch_projectile;
mod melee;
mod ranged_fx_targeted;
mod revive;
mod stealth;
mod stunned;
mod target;
mod trample;

use crate::action::{ActionLogic, ActionRequest, BuffableValue, GameplayActivity};
use crate::engine::context::{HookContext, InstanceView};
use crate::types::{EntityId, Vec3};

pub(crate) use aoe::AoeAction;
pub(crate) use buff::BuffAction;
pub(crate) use charged_launch_projectile::ChargedLaunchProjectileAction;
pub(crate) use charged_shield::ChargedShieldAction;
pub(crate) use chase::ChaseAction;
pub(crate) use dash_attack::DashAttackAction;
pub(crate) use emote::EmoteAction;
pub(crate) use launch_projectile::LaunchProjectileAction;
pub(crate) use melee::MeleeAction;
pub(crate) use ranged_fx_targeted::RangedFxTargetedAction;
pub(crate) use revive::ReviveAction;
pub(crate) use stealth::StealthModeAction;
pub(crate) use stunned::StunnedAction;
pub(crate) use target::TargetAction;
pub(crate) use trample::TrampleAction;

/// Lifecycle hooks every behavior implements.
///
/// `on_start` returning false aborts the action without `on_end`/`on_cancel`.
/// `on_update` returning false ends it with `on_end`.
pub(crate) trait ActionHooks {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool;

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool;

    /// Polled while blocking; true moves the instance to the background.
    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        view.config.blocking_mode == crate::action::BlockingMode::OnlyDuringExecTime
            && view.reached_exec_time()
    }

    /// Natural end. A returned request is queued as a follow-up.
    fn on_end(&mut self, cx: &mut HookContext<'_>) -> Option<ActionRequest> {
        self.on_cancel(cx);
        None
    }

    fn on_cancel(&mut self, _cx: &mut HookContext<'_>) {}

    fn buff_value(&self, _view: &InstanceView<'_>, _kind: BuffableValue, _value: &mut f32) {}

    fn on_gameplay_activity(&mut self, _cx: &mut HookContext<'_>, _activity: GameplayActivity) {}

    fn collision_entered(&mut self, _cx: &mut HookContext<'_>, _other: EntityId) {}
}

#[derive(Debug)]
pub(crate) enum ActionBehavior {
    Target(TargetAction),
    Chase(ChaseAction),
    Melee(MeleeAction),
    Emote(EmoteAction),
    Stunned(StunnedAction),
    ChargedShield(ChargedShieldAction),
    StealthMode(StealthModeAction),
    LaunchProjectile(LaunchProjectileAction),
    ChargedLaunchProjectile(ChargedLaunchProjectileAction),
    RangedFxTargeted(RangedFxTargetedAction),
    Aoe(AoeAction),
    Buff(BuffAction),
    Trample(TrampleAction),
    Revive(ReviveAction),
    DashAttack(DashAttackAction),
}

impl ActionBehavior {
    pub(crate) fn for_logic(logic: ActionLogic) -> Self {
        match logic {
            ActionLogic::Target => Self::Target(TargetAction),
            ActionLogic::Chase => Self::Chase(ChaseAction),
            ActionLogic::Melee => Self::Melee(MeleeAction::default()),
            ActionLogic::Emote => Self::Emote(EmoteAction),
            ActionLogic::Stunned => Self::Stunned(StunnedAction),
            ActionLogic::ChargedShield => Self::ChargedShield(ChargedShieldAction::default()),
            ActionLogic::StealthMode => Self::StealthMode(StealthModeAction::default()),
            ActionLogic::LaunchProjectile => {
                Self::LaunchProjectile(LaunchProjectileAction::default())
            }
            ActionLogic::ChargedLaunchProjectile => {
                Self::ChargedLaunchProjectile(ChargedLaunchProjectileAction::default())
            }
            ActionLogic::RangedFxTargeted => {
                Self::RangedFxTargeted(RangedFxTargetedAction::default())
            }
            ActionLogic::Aoe => Self::Aoe(AoeAction::default()),
            ActionLogic::Buff => Self::Buff(BuffAction),
            ActionLogic::Trample => Self::Trample(TrampleAction::default()),
            ActionLogic::Revive => Self::Revive(ReviveAction::default()),
            ActionLogic::DashAttack => Self::DashAttack(DashAttackAction::default()),
        }
    }
}

macro_rules! dispatch {
    ($behavior:expr, $action:ident => $call:expr) => {
        match $behavior {
            ActionBehavior::Target($action) => $call,
            ActionBehavior::Chase($action) => $call,
            ActionBehavior::Melee($action) => $call,
            ActionBehavior::Emote($action) => $call,
            ActionBehavior::Stunned($action) => $call,
            ActionBehavior::ChargedShield($action) => $call,
            ActionBehavior::StealthMode($action) => $call,
            ActionBehavior::LaunchProjectile($action) => $call,
            ActionBehavior::ChargedLaunchProjectile($action) => $call,
            ActionBehavior::RangedFxTargeted($action) => $call,
            ActionBehavior::Aoe($action) => $call,
            ActionBehavior::Buff($action) => $call,
            ActionBehavior::Trample($action) => $call,
            ActionBehavior::Revive($action) => $call,
            ActionBehavior::DashAttack($action) => $call,
        }
    };
}

impl ActionHooks for ActionBehavior {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        dispatch!(self, action => action.on_start(cx))
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        dispatch!(self, action => action.on_update(cx))
    }

    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        dispatch!(self, action => action.should_become_non_blocking(view))
    }

    fn on_end(&mut self, cx: &mut HookContext<'_>) -> Option<ActionRequest> {
        dispatch!(self, action => action.on_end(cx))
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        dispatch!(self, action => action.on_cancel(cx))
    }

    fn buff_value(&self, view: &InstanceView<'_>, kind: BuffableValue, value: &mut f32) {
        dispatch!(self, action => action.buff_value(view, kind, value))
    }

    fn on_gameplay_activity(&mut self, cx: &mut HookContext<'_>, activity: GameplayActivity) {
        dispatch!(self, action => action.on_gameplay_activity(cx, activity))
    }

    fn collision_entered(&mut self, cx: &mut HookContext<'_>, other: EntityId) {
        dispatch!(self, action => action.collision_entered(cx, other))
    }
}

/// Turns the character toward `target` if the world still knows where it is.
fn face_entity(cx: &mut HookContext<'_>, target: EntityId) {
    if let Some(position) = cx.world.position_of(target) {
        cx.character.look_at(position);
    }
}

/// Picks the foe a melee strike centered on `center` would connect with.
///
/// Candidates are alive, hostile to the attacker (or friendly, for friendly
/// actions) and within `range`. `preferred` wins whenever it qualifies;
/// otherwise the first candidate in world order is used.
fn ideal_melee_foe(
    cx: &HookContext<'_>,
    center: Vec3,
    range: f32,
    preferred: Option<EntityId>,
) -> Option<EntityId> {
    let attacker = cx.character.entity_id();

    let mut found = None;
    for candidate in cx.world.entities_within(center, range) {
        if candidate == attacker || !is_on_receiving_side(cx, candidate) {
            continue;
        }
        if !cx.world.life_state(candidate).is_some_and(|state| state.is_alive()) {
            continue;
        }
        if Some(candidate) == preferred {
            return Some(candidate);
        }
        found.get_or_insert(candidate);
    }
    found
}

/// Whether `candidate` sits on the side this action affects: foes for hostile
/// actions, allies for friendly ones. Unknown entities never qualify.
fn is_on_receiving_side(cx: &HookContext<'_>, candidate: EntityId) -> bool {
    let wants_npc = !(cx.config.is_friendly ^ cx.character.is_npc());
    cx.world.is_npc(candidate) == Some(wants_npc)
}
