//! Rules for inserting implicit helper actions ahead of a queued action.
//!
//! Both rules are pure and are evaluated target first, then chase. The chase
//! rule reads the base request's `should_close` flag; the caller clears it once
//! the chase is queued so the rule fires only once per request.

use crate::action::ActionRequest;
use crate::env::ReservedActions;
use crate::types::EntityId;

/// Acquire-target request needed before `base`, if any.
///
/// Fires when `base` names exactly one target and that target is not the one
/// the character is already tracking.
pub fn target_synthesis(
    base: &ActionRequest,
    current_target: Option<EntityId>,
    reserved: &ReservedActions,
) -> Option<ActionRequest> {
    match base.target_ids.as_slice() {
        [target] if Some(*target) != current_target => {
            Some(ActionRequest::new(reserved.acquire_target).with_target(*target))
        }
        _ => None,
    }
}

/// Move-to-target request needed before `base`, if any.
///
/// The chase stops once within `base_range`, the base action's configured range.
pub fn chase_synthesis(
    base: &ActionRequest,
    base_range: f32,
    reserved: &ReservedActions,
) -> Option<ActionRequest> {
    if !base.should_close() || base.target_ids.is_empty() {
        return None;
    }
    let mut chase = ActionRequest::new(reserved.move_to_target).with_amount(base_range);
    chase.target_ids = base.target_ids.clone();
    Some(chase)
}
