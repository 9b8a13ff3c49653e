//! Per-character action scheduler.
//!
//! An [`ActionPlayer`] owns one blocking queue and a list of background
//! (non-blocking) instances. Only the queue head runs; everything behind it
//! waits. Once the head promotes itself or ends, the next entry starts.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::action::kinds::{ActionBehavior, ActionHooks};
use crate::action::{
    ActionId, ActionInstance, ActionLogic, ActionPool, ActionRequest, BuffableValue,
    GameplayActivity, InstanceId, InstanceState,
};
use crate::config::EngineConfig;
use crate::env::ActionOracle;
use crate::types::EntityId;

use super::context::{ActionContext, HookContext, InstanceView, PlayerCommand};
use super::cooldown::CooldownTracker;
use super::events::{ActionEvent, DiscardReason, EventJournal};
use super::synthesis;

/// Result of [`ActionPlayer::play`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayOutcome {
    /// Accepted. The handle may already be released if the action aborted
    /// or finished during the call.
    Queued(InstanceId),
    Discarded(DiscardReason),
}

impl PlayOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }

    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Queued(id) => Some(*id),
            Self::Discarded(_) => None,
        }
    }
}

/// Runs one character's actions.
pub struct ActionPlayer {
    catalog: Arc<dyn ActionOracle>,
    config: EngineConfig,
    pool: ActionPool,
    queue: VecDeque<InstanceId>,
    non_blocking: Vec<InstanceId>,
    cooldowns: CooldownTracker,
    /// Follow-up chained by the last ended blocking action, played next update.
    pending: Option<ActionRequest>,
    commands: Vec<PlayerCommand>,
    journal: EventJournal,
    now: f32,
}

impl ActionPlayer {
    pub fn new(catalog: Arc<dyn ActionOracle>, config: EngineConfig) -> Self {
        let pool = ActionPool::with_capacity(config.initial_pool_capacity);
        let journal = EventJournal::new(config.event_journal_capacity);
        Self {
            catalog,
            config,
            pool,
            queue: VecDeque::new(),
            non_blocking: Vec::new(),
            cooldowns: CooldownTracker::new(),
            pending: None,
            commands: Vec::new(),
            journal,
            now: 0.0,
        }
    }

    // ===== public operations =====

    /// Submits a request.
    ///
    /// A non-queued request preempts the current head when the head allows it.
    /// The request is rejected when the queue already holds
    /// [`EngineConfig::max_queue_time_depth`] seconds of blocking work.
    pub fn play(&mut self, cx: &mut ActionContext<'_>, request: ActionRequest) -> PlayOutcome {
        self.now = cx.now;
        self.play_request(cx, request)
    }

    /// Cancels the queue head, drops everything queued behind it, and
    /// optionally cancels every background instance too.
    ///
    /// The head's cooldown is forgotten so it can be retried right away.
    pub fn clear(&mut self, cx: &mut ActionContext<'_>, cancel_non_blocking: bool) {
        self.now = cx.now;
        self.clear_actions(cx, cancel_non_blocking);
    }

    /// Advances every running instance to `cx.now`.
    pub fn on_update(&mut self, cx: &mut ActionContext<'_>) {
        self.now = cx.now;

        if let Some(request) = self.pending.take() {
            trace!(action = %request.action_id, "playing chained follow-up");
            self.play_request(cx, request);
        }
        self.resume_head(cx);

        if let Some(&head) = self.queue.front()
            && self.should_become_non_blocking(head)
        {
            self.promote_head();
            if !self.start_blocked_by_pending() {
                self.start_head(cx);
            }
        }

        if let Some(&head) = self.queue.front()
            && self.is_state(head, InstanceState::Blocking)
            && !self.update_instance(cx, head)
            && self.queue.front() == Some(&head)
        {
            self.advance_queue(cx, true);
        }

        // reverse order so removals never skip an entry
        for index in (0..self.non_blocking.len()).rev() {
            let Some(&id) = self.non_blocking.get(index) else {
                continue;
            };
            if self.update_instance(cx, id) || !self.non_blocking.contains(&id) {
                continue;
            }
            if let Some(chained) = self.end_instance(cx, id) {
                warn!(action = %chained.action_id, instance = %id, "background action chained a follow-up; ignoring");
            }
            self.non_blocking.retain(|&other| other != id);
            self.release_if_detached(id);
        }
    }

    /// Request of the queue head, if any.
    pub fn get_active_blocking_action(&self) -> Option<&ActionRequest> {
        self.head_instance().map(ActionInstance::request)
    }

    /// Whether `action_id` is off cooldown as of the last observed time.
    pub fn is_reuse_elapsed(&self, action_id: ActionId) -> bool {
        let reuse = self
            .catalog
            .action_config(action_id)
            .map_or(0.0, |config| config.reuse_time_seconds);
        self.cooldowns.is_elapsed(action_id, reuse, self.now)
    }

    /// Background instances, plus one for the queue head if there is one.
    pub fn running_action_count(&self) -> usize {
        self.non_blocking.len() + usize::from(!self.queue.is_empty())
    }

    /// Applies every running instance's modifier to the configured baseline.
    ///
    /// The head is visited first, then background instances oldest first.
    pub fn get_buffed_value(&self, kind: BuffableValue) -> f32 {
        let mut value = self.config.buff_baselines.get(kind);
        for &id in self.queue.front().into_iter().chain(self.non_blocking.iter()) {
            if let Some(instance) = self.pool.get(id) {
                let view = self.view(instance);
                instance.behavior.buff_value(&view, kind, &mut value);
            }
        }
        value
    }

    /// Forwards a gameplay event to the head and every background instance.
    pub fn on_gameplay_activity(&mut self, cx: &mut ActionContext<'_>, activity: GameplayActivity) {
        self.now = cx.now;
        trace!(%activity, "broadcasting gameplay activity");
        for id in self.running_ids() {
            self.run_hook(cx, id, |behavior, hook| {
                behavior.on_gameplay_activity(hook, activity);
            });
        }
    }

    /// Cancels running instances with `logic`: background ones newest first,
    /// then the head. With `cancel_all` unset, stops after the first match.
    pub fn cancel_running_actions_by_logic(
        &mut self,
        cx: &mut ActionContext<'_>,
        logic: ActionLogic,
        cancel_all: bool,
        except: Option<InstanceId>,
    ) {
        self.now = cx.now;
        self.cancel_by_logic(cx, logic, cancel_all, except);
        self.resume_head(cx);
    }

    /// Reports a physics contact to the queue head.
    pub fn collision_entered(&mut self, cx: &mut ActionContext<'_>, other: EntityId) {
        self.now = cx.now;
        if let Some(&head) = self.queue.front() {
            self.run_hook(cx, head, |behavior, hook| behavior.collision_entered(hook, other));
        }
    }

    /// Estimated blocking seconds left in the queue.
    pub fn queue_time_depth(&self) -> f32 {
        let Some(head) = self.head_instance() else {
            return 0.0;
        };
        let total: f32 = self
            .queue
            .iter()
            .filter_map(|&id| self.pool.get(id))
            .map(|instance| instance.config.blocking_estimate())
            .sum();
        total - head.time_running(self.now)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn non_blocking_len(&self) -> usize {
        self.non_blocking.len()
    }

    pub fn pending_request(&self) -> Option<&ActionRequest> {
        self.pending.as_ref()
    }

    /// Looks up a live instance. Released handles resolve to `None`.
    pub fn instance(&self, id: InstanceId) -> Option<&ActionInstance> {
        self.pool.get(id)
    }

    /// Last simulation time passed in through an [`ActionContext`].
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Takes the journal's contents, oldest first.
    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        self.journal.drain()
    }

    // ===== queue management =====

    fn play_request(&mut self, cx: &mut ActionContext<'_>, request: ActionRequest) -> PlayOutcome {
        let action_id = request.action_id;
        let Some(config) = self.catalog.action_config(action_id) else {
            return self.reject_missing(action_id, DiscardReason::UnknownAction);
        };

        let preempts = !request.should_queue()
            && self.head_instance().is_some_and(|head| {
                head.config.action_interruptible || head.config.can_be_interrupted_by(action_id)
            });
        if preempts {
            debug!(action = %action_id, "preempting current head");
            self.clear_actions(cx, false);
        }

        let depth = self.queue_time_depth();
        if depth >= self.config.max_queue_time_depth {
            trace!(action = %action_id, depth, "queue full, discarding request");
            self.journal.record(ActionEvent::Discarded {
                action_id,
                reason: DiscardReason::QueueFull,
            });
            return PlayOutcome::Discarded(DiscardReason::QueueFull);
        }

        let id = self.pool.acquire(config, request);
        self.queue.push_back(id);
        self.journal.record(ActionEvent::Queued {
            instance: id,
            action_id,
        });
        trace!(action = %action_id, instance = %id, queue_len = self.queue.len(), "queued");

        if self.queue.len() == 1 {
            self.start_head(cx);
        }
        PlayOutcome::Queued(id)
    }

    /// Starts queue heads until one holds the blocking slot or the queue drains.
    fn start_head(&mut self, cx: &mut ActionContext<'_>) {
        while let Some(&head) = self.queue.front() {
            let Some((action_id, reuse)) = self
                .pool
                .get(head)
                .map(|instance| (instance.config.id, instance.config.reuse_time_seconds))
            else {
                self.queue.pop_front();
                continue;
            };

            if !self.cooldowns.is_elapsed(action_id, reuse, self.now) {
                trace!(action = %action_id, instance = %head, "reuse time not elapsed, discarding");
                self.journal.record(ActionEvent::Discarded {
                    action_id,
                    reason: DiscardReason::ReuseTooSoon,
                });
                self.queue.pop_front();
                self.release_if_detached(head);
                if self.start_blocked_by_pending() {
                    return;
                }
                continue;
            }

            self.synthesize_if_necessary(cx, head);
            let Some(&head) = self.queue.front() else {
                return;
            };

            let started = self.begin(cx, head);
            if self.queue.front() != Some(&head) {
                continue;
            }
            if !started {
                self.abort_head(head);
                if self.start_blocked_by_pending() {
                    return;
                }
                continue;
            }

            let Some(config) = self.pool.get(head).map(|instance| Arc::clone(&instance.config))
            else {
                self.queue.pop_front();
                continue;
            };
            if config.action_interruptible {
                cx.character.cancel_move_unless_forced();
            }
            self.cooldowns.record(config.id, self.now);

            if config.is_instant_non_blocking() {
                self.promote_head();
                if self.start_blocked_by_pending() {
                    return;
                }
                continue;
            }

            if let Some(instance) = self.pool.get_mut(head) {
                instance.transition(InstanceState::Blocking);
            }
            debug!(action = %config.id, instance = %head, "blocking");
            return;
        }
    }

    /// Inserts target and chase helpers ahead of `base` as needed.
    fn synthesize_if_necessary(&mut self, cx: &mut ActionContext<'_>, base: InstanceId) {
        let reserved = self.catalog.reserved();
        let Some(instance) = self.pool.get(base) else {
            return;
        };
        let base_action = instance.config.id;
        let target = synthesis::target_synthesis(&instance.request, cx.character.target_id(), &reserved);
        let chase = synthesis::chase_synthesis(&instance.request, instance.config.range, &reserved);

        // pushed to the front, so the chase goes first to end up behind the target
        if let Some(chase) = chase
            && self.insert_synthesized(chase, base_action)
            && let Some(instance) = self.pool.get_mut(base)
        {
            instance.request.set_should_close(false);
        }
        if let Some(target) = target {
            self.insert_synthesized(target, base_action);
        }
    }

    fn insert_synthesized(&mut self, request: ActionRequest, base: ActionId) -> bool {
        let action_id = request.action_id;
        let Some(config) = self.catalog.action_config(action_id) else {
            self.reject_missing(action_id, DiscardReason::ReservedActionMissing);
            return false;
        };
        let id = self.pool.acquire(config, request);
        self.queue.push_front(id);
        self.journal.record(ActionEvent::Synthesized {
            instance: id,
            action_id,
            base,
        });
        trace!(action = %action_id, instance = %id, %base, "synthesized helper");
        true
    }

    /// Marks `head` started and runs its `on_start` hook.
    fn begin(&mut self, cx: &mut ActionContext<'_>, head: InstanceId) -> bool {
        let now = self.now;
        let Some(instance) = self.pool.get_mut(head) else {
            return false;
        };
        instance.time_started = Some(now);
        instance.transition(InstanceState::Starting);
        self.journal.record(ActionEvent::Started {
            instance: head,
            action_id: instance.config.id,
            logic: instance.config.logic,
            target: instance.request.first_target(),
            amount: instance.request.amount,
        });
        debug!(action = %instance.config.id, logic = %instance.config.logic, instance = %head, "starting");

        self.run_hook(cx, head, |behavior, hook| behavior.on_start(hook))
            .unwrap_or(false)
    }

    fn abort_head(&mut self, head: InstanceId) {
        if let Some(instance) = self.pool.get_mut(head) {
            instance.transition(InstanceState::AbortedOnStart);
            debug!(action = %instance.config.id, instance = %head, "aborted on start");
            self.journal.record(ActionEvent::AbortedOnStart {
                instance: head,
                action_id: instance.config.id,
            });
        }
        self.queue.retain(|&id| id != head);
        self.release_if_detached(head);
    }

    /// Moves the head into the background list.
    fn promote_head(&mut self) {
        let Some(head) = self.queue.pop_front() else {
            return;
        };
        self.non_blocking.push(head);
        if let Some(instance) = self.pool.get_mut(head) {
            instance.transition(InstanceState::NonBlocking);
            debug!(action = %instance.config.id, instance = %head, "non-blocking");
            self.journal.record(ActionEvent::BecameNonBlocking {
                instance: head,
                action_id: instance.config.id,
            });
        }
    }

    /// Removes the head, optionally ending it first, then starts the next one
    /// unless a blocking follow-up is pending.
    fn advance_queue(&mut self, cx: &mut ActionContext<'_>, end_removed: bool) {
        let Some(&head) = self.queue.front() else {
            return;
        };
        if end_removed && let Some(chained) = self.end_instance(cx, head) {
            trace!(action = %chained.action_id, "follow-up pending");
            self.pending = Some(chained);
        }
        self.queue.retain(|&id| id != head);
        self.release_if_detached(head);

        if !self.start_blocked_by_pending() {
            self.start_head(cx);
        }
    }

    /// Starts a head left waiting by a blocking follow-up or a cancellation.
    fn resume_head(&mut self, cx: &mut ActionContext<'_>) {
        if self.start_blocked_by_pending() {
            return;
        }
        if let Some(&head) = self.queue.front()
            && self.is_state(head, InstanceState::Queued)
        {
            self.start_head(cx);
        }
    }

    fn clear_actions(&mut self, cx: &mut ActionContext<'_>, cancel_non_blocking: bool) {
        if let Some(&head) = self.queue.front() {
            if let Some(action_id) = self.pool.get(head).map(|instance| instance.config.id) {
                self.cooldowns.clear(action_id);
            }
            self.cancel_instance(cx, head);
        }
        for id in std::mem::take(&mut self.queue) {
            self.release_if_detached(id);
        }

        if cancel_non_blocking {
            for id in std::mem::take(&mut self.non_blocking) {
                self.cancel_instance(cx, id);
                self.release_if_detached(id);
            }
        }
    }

    fn cancel_by_logic(
        &mut self,
        cx: &mut ActionContext<'_>,
        logic: ActionLogic,
        cancel_all: bool,
        except: Option<InstanceId>,
    ) {
        for index in (0..self.non_blocking.len()).rev() {
            let Some(&id) = self.non_blocking.get(index) else {
                continue;
            };
            if Some(id) == except || !self.has_logic(id, logic) {
                continue;
            }
            self.cancel_instance(cx, id);
            self.non_blocking.retain(|&other| other != id);
            self.release_if_detached(id);
            if !cancel_all {
                return;
            }
        }

        if let Some(&head) = self.queue.front()
            && Some(head) != except
            && self.has_logic(head, logic)
        {
            self.cancel_instance(cx, head);
            self.queue.retain(|&id| id != head);
            self.release_if_detached(head);
        }
    }

    // ===== hooks =====

    /// Runs `hook` against one instance, then applies the commands it left.
    fn run_hook<R>(
        &mut self,
        cx: &mut ActionContext<'_>,
        id: InstanceId,
        hook: impl FnOnce(&mut ActionBehavior, &mut HookContext<'_>) -> R,
    ) -> Option<R> {
        let now = self.now;
        let reserved = self.catalog.reserved();
        let running_action_count = self.running_action_count();
        let instance = self.pool.get_mut(id)?;

        let mut hook_cx = HookContext {
            now,
            instance: id,
            time_started: instance.time_started.unwrap_or(now),
            config: instance.config.as_ref(),
            request: &mut instance.request,
            character: &mut *cx.character,
            world: &mut *cx.world,
            reserved,
            running_action_count,
            commands: &mut self.commands,
        };
        let result = hook(&mut instance.behavior, &mut hook_cx);

        self.flush_commands(cx);
        Some(result)
    }

    fn flush_commands(&mut self, cx: &mut ActionContext<'_>) {
        while !self.commands.is_empty() {
            for command in std::mem::take(&mut self.commands) {
                match command {
                    PlayerCommand::CancelByLogic {
                        logic,
                        cancel_all,
                        except,
                    } => self.cancel_by_logic(cx, logic, cancel_all, Some(except)),
                    PlayerCommand::AssignTarget(target) => cx.character.set_target_id(target),
                }
            }
        }
    }

    /// Runs `on_update` and applies duration expiry. False means "end it".
    fn update_instance(&mut self, cx: &mut ActionContext<'_>, id: InstanceId) -> bool {
        let Some(keep_going) = self.run_hook(cx, id, |behavior, hook| behavior.on_update(hook))
        else {
            return false;
        };
        let Some(instance) = self.pool.get(id) else {
            return false;
        };
        let duration = instance.config.duration_seconds;
        let expired = duration > 0.0 && instance.time_running(self.now) >= duration;
        keep_going && !expired
    }

    /// Ends an instance naturally, returning any follow-up it chained.
    fn end_instance(&mut self, cx: &mut ActionContext<'_>, id: InstanceId) -> Option<ActionRequest> {
        let action_id = self.pool.get(id).map(|instance| instance.config.id)?;
        let chained = self
            .run_hook(cx, id, |behavior, hook| behavior.on_end(hook))
            .flatten();
        if let Some(instance) = self.pool.get_mut(id) {
            instance.transition(InstanceState::Ended);
        }
        debug!(action = %action_id, instance = %id, chained = chained.is_some(), "ended");
        self.journal.record(ActionEvent::Ended {
            instance: id,
            action_id,
            chained: chained.is_some(),
        });
        chained
    }

    fn cancel_instance(&mut self, cx: &mut ActionContext<'_>, id: InstanceId) {
        let Some(instance) = self.pool.get_mut(id) else {
            return;
        };
        if instance.state.is_terminal() {
            return;
        }
        let action_id = instance.config.id;
        // marked first so a nested cancel from the hook's own commands is a no-op
        instance.transition(InstanceState::Cancelled);

        self.run_hook(cx, id, |behavior, hook| behavior.on_cancel(hook));
        debug!(action = %action_id, instance = %id, "cancelled");
        self.journal.record(ActionEvent::Cancelled {
            instance: id,
            action_id,
        });
    }

    // ===== helpers =====

    fn reject_missing(&mut self, action_id: ActionId, reason: DiscardReason) -> PlayOutcome {
        error!(action = %action_id, ?reason, "no catalog entry for action");
        if cfg!(debug_assertions) {
            panic!("action {action_id} is not in the catalog");
        }
        self.journal.record(ActionEvent::Discarded { action_id, reason });
        PlayOutcome::Discarded(reason)
    }

    /// Returns the slot to the pool once neither list refers to it.
    fn release_if_detached(&mut self, id: InstanceId) {
        if !self.queue.contains(&id) && !self.non_blocking.contains(&id) {
            self.pool.release(id);
        }
    }

    fn start_blocked_by_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|request| !request.should_queue())
    }

    fn should_become_non_blocking(&self, id: InstanceId) -> bool {
        self.pool.get(id).is_some_and(|instance| {
            instance.state == InstanceState::Blocking
                && instance.behavior.should_become_non_blocking(&self.view(instance))
        })
    }

    fn head_instance(&self) -> Option<&ActionInstance> {
        self.queue.front().and_then(|&id| self.pool.get(id))
    }

    fn running_ids(&self) -> Vec<InstanceId> {
        self.queue
            .front()
            .into_iter()
            .chain(self.non_blocking.iter())
            .copied()
            .collect()
    }

    fn has_logic(&self, id: InstanceId, logic: ActionLogic) -> bool {
        self.pool.get(id).is_some_and(|instance| instance.config.logic == logic)
    }

    fn is_state(&self, id: InstanceId, state: InstanceState) -> bool {
        self.pool.get(id).is_some_and(|instance| instance.state == state)
    }

    fn view<'a>(&self, instance: &'a ActionInstance) -> InstanceView<'a> {
        InstanceView {
            now: self.now,
            time_started: instance.time_started,
            config: &instance.config,
        }
    }
}

impl core::fmt::Debug for ActionPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActionPlayer")
            .field("queue", &self.queue)
            .field("non_blocking", &self.non_blocking)
            .field("pending", &self.pending)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
