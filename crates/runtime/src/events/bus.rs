//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{CombatEvent, RoundEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Round lifecycle and battle end
    Round,
    /// Turn starts and turn order changes
    Turn,
    /// Skill resolution and defeats
    Combat,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Round, Topic::Turn, Topic::Combat];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Round(RoundEvent),
    Turn(TurnEvent),
    Combat(CombatEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Round(_) => Topic::Round,
            Event::Turn(_) => Topic::Turn,
            Event::Combat(_) => Topic::Combat,
        }
    }
}

impl From<RoundEvent> for Event {
    fn from(event: RoundEvent) -> Self {
        Event::Round(event)
    }
}

impl From<TurnEvent> for Event {
    fn from(event: TurnEvent) -> Self {
        Event::Turn(event)
    }
}

impl From<CombatEvent> for Event {
    fn from(event: CombatEvent) -> Self {
        Event::Combat(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Debug, Clone)]
pub struct EventBus {
    round: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            round: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            combat: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Round => &self.round,
            Topic::Turn => &self.turn,
            Topic::Combat => &self.combat,
        }
    }

    /// Publish an event to its corresponding topic. Never blocks.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
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
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::Round;

    #[tokio::test]
    async fn routes_events_by_topic() {
        let bus = EventBus::new();
        let mut rounds = bus.subscribe(Topic::Round);
        let mut turns = bus.subscribe(Topic::Turn);

        bus.publish(RoundEvent::RoundStarted {
            round: Round(1),
            actors: 3,
        });

        let event = rounds.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Round);
        assert!(turns.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        bus.publish(RoundEvent::RoundStarted {
            round: Round(1),
            actors: 0,
        });
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let mut receivers = bus.subscribe_multiple(&Topic::ALL);
        let clone = bus.clone();

        clone.publish(RoundEvent::RoundStarted {
            round: Round(2),
            actors: 1,
        });

        let rx = receivers.get_mut(&Topic::Round).unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Round(RoundEvent::RoundStarted { round: Round(2), .. }))
        ));
    }
}
