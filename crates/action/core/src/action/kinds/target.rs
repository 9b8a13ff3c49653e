use crate::action::ActionLogic;
use crate::engine::context::HookContext;

use super::{ActionHooks, face_entity};

/// Makes the request's first target the character's tracked target.
///
/// Keeps running in the background for as long as that target stays valid, and
/// at most one instance is alive at a time: starting a new one cancels the rest.
#[derive(Debug, Default)]
pub(crate) struct TargetAction;

impl ActionHooks for TargetAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        // clear first so the stand-down of older instances never touches the new target
        cx.character.set_target_id(None);
        cx.cancel_running_by_logic(ActionLogic::Target, true);

        let Some(target) = cx.request.first_target() else {
            return false;
        };
        cx.assign_target(Some(target));
        face_entity(cx, target);
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        let Some(target) = cx.request.first_target() else {
            return false;
        };
        let valid = cx.world.is_valid_target(target);

        let idle = cx
            .character
            .movement()
            .is_none_or(|movement| !movement.is_moving());
        if valid && idle && cx.running_action_count == 1 {
            face_entity(cx, target);
        }
        valid
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        if let Some(target) = cx.request.first_target()
            && cx.character.target_id() == Some(target)
        {
            cx.character.set_target_id(None);
        }
    }
}
