//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{ActionEventRecord, CharacterEvent, TickEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Action lifecycle events drained from every player
    Action,
    /// Tick boundaries
    Tick,
    /// Spawns, hit point and life state changes
    Character,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Action(ActionEventRecord),
    Tick(TickEvent),
    Character(CharacterEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Action(_) => Topic::Action,
            Event::Tick(_) => Topic::Tick,
            Event::Character(_) => Topic::Character,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every topic owns its own broadcast channel, created
/// up front, so publishing never contends on a lock.
#[derive(Clone)]
pub struct EventBus {
    action: broadcast::Sender<Event>,
    tick: broadcast::Sender<Event>,
    character: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        // broadcast channels reject a zero capacity
        let capacity = capacity.max(1);
        Self {
            action: broadcast::channel(capacity).0,
            tick: broadcast::channel(capacity).0,
            character: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Action => &self.action,
            Topic::Tick => &self.tick,
            Topic::Character => &self.character,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on a topic.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_core::{EntityId, Vec3};

    #[test]
    fn events_only_reach_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut ticks = bus.subscribe(Topic::Tick);
        let mut characters = bus.subscribe(Topic::Character);

        bus.publish(Event::Tick(TickEvent { tick: 1, time: 0.1 }));

        assert!(matches!(ticks.try_recv(), Ok(Event::Tick(TickEvent { tick: 1, .. }))));
        assert!(characters.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::with_capacity(0);
        bus.publish(Event::Character(CharacterEvent::Spawned {
            id: EntityId(1),
            position: Vec3::ZERO,
            npc: false,
        }));
        assert_eq!(bus.receiver_count(Topic::Character), 0);
    }

    #[test]
    fn subscribe_multiple_returns_one_receiver_per_topic() {
        let bus = EventBus::new();
        let receivers = bus.subscribe_multiple(&[Topic::Action, Topic::Tick]);
        assert_eq!(receivers.len(), 2);
        assert_eq!(bus.receiver_count(Topic::Action), 1);
        assert_eq!(bus.receiver_count(Topic::Character), 0);
    }
}
