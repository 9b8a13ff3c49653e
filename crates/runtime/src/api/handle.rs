//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving characters, stepping the simulation, or streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use action_core::{
    ActionId, ActionLogic, ActionRequest, BuffableValue, EntityId, GameplayActivity, PlayOutcome,
    Vec3,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, TickEvent, Topic};
use crate::types::{CharacterSnapshot, CharacterSpec};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends a command built around a fresh reply channel and waits for the answer.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Add a character and its action player to the simulation
    pub async fn spawn_character(&self, spec: CharacterSpec) -> Result<()> {
        self.request(|reply| Command::SpawnCharacter { spec, reply })
            .await?
    }

    /// Remove a character, cancelling everything it is running first
    pub async fn despawn_character(&self, id: EntityId) -> Result<()> {
        self.request(|reply| Command::DespawnCharacter { id, reply })
            .await?
    }

    /// Submit an action request on behalf of a character
    ///
    /// Returns `Ok(None)` when the character is not in a state to act
    /// (fainted, dead, or being moved by force). Unknown action ids are
    /// rejected with [`RuntimeError::UnknownAction`] before reaching the player.
    pub async fn play(&self, id: EntityId, request: ActionRequest) -> Result<Option<PlayOutcome>> {
        self.request(|reply| Command::Play { id, request, reply })
            .await?
    }

    /// Walk toward a point, interrupting an interruptible action and dropping the target
    pub async fn move_to(&self, id: EntityId, destination: Vec3) -> Result<bool> {
        self.request(|reply| Command::MoveTo {
            id,
            destination,
            reply,
        })
        .await?
    }

    pub async fn clear(&self, id: EntityId, cancel_non_blocking: bool) -> Result<()> {
        self.request(|reply| Command::Clear {
            id,
            cancel_non_blocking,
            reply,
        })
        .await?
    }

    /// Tell a character's running actions that something happened to it
    pub async fn notify_activity(&self, id: EntityId, activity: GameplayActivity) -> Result<()> {
        self.request(|reply| Command::NotifyActivity {
            id,
            activity,
            reply,
        })
        .await?
    }

    pub async fn cancel_by_logic(
        &self,
        id: EntityId,
        logic: ActionLogic,
        cancel_all: bool,
    ) -> Result<()> {
        self.request(|reply| Command::CancelByLogic {
            id,
            logic,
            cancel_all,
            reply,
        })
        .await?
    }

    pub async fn buffed_value(&self, id: EntityId, kind: BuffableValue) -> Result<f32> {
        self.request(|reply| Command::BuffedValue { id, kind, reply })
            .await?
    }

    /// Request of the character's blocking action, if any
    pub async fn active_action(&self, id: EntityId) -> Result<Option<ActionRequest>> {
        self.request(|reply| Command::ActiveAction { id, reply })
            .await?
    }

    pub async fn running_action_count(&self, id: EntityId) -> Result<usize> {
        self.request(|reply| Command::RunningActionCount { id, reply })
            .await?
    }

    pub async fn is_reuse_elapsed(&self, id: EntityId, action_id: ActionId) -> Result<bool> {
        self.request(|reply| Command::IsReuseElapsed {
            id,
            action_id,
            reply,
        })
        .await?
    }

    /// Advance the simulation by `ticks` fixed steps and return the last tick
    pub async fn step(&self, ticks: u32) -> Result<TickEvent> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    /// Query one character (read-only snapshot)
    pub async fn query_character(&self, id: EntityId) -> Result<CharacterSnapshot> {
        self.request(|reply| Command::QueryCharacter { id, reply })
            .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Action` - Action lifecycle events for every character
    /// - `Topic::Tick` - One event per simulation tick
    /// - `Topic::Character` - Spawns, hit points and life state changes
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use action_runtime::Topic;
    ///
    /// // Only subscribe to action events
    /// let mut action_rx = handle.subscribe(Topic::Action);
    /// while let Ok(event) = action_rx.recv().await {
    ///     // Handle action events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
