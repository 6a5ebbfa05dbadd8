//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use character_core::{CreatureId, DeathOutcome, Notification, Timestamp};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Client-facing notifications emitted by the rules
    Notification,
    /// Clock advances and deaths
    Lifecycle,
}

/// What one clock advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub now: Timestamp,
    /// Scheduled actions that came due and ran.
    pub scheduled_ran: usize,
    /// Whether the passive overlay changed.
    pub overlay_changed: bool,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Notification {
        character: CreatureId,
        notification: Notification,
    },
    Ticked(TickReport),
    Died {
        character: CreatureId,
        outcome: DeathOutcome,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Notification { .. } => Topic::Notification,
            Event::Ticked(_) | Event::Died { .. } => Topic::Lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Channels are created up front for every topic, so subscribing never
/// fails and publishing never blocks.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = [Topic::Notification, Topic::Lifecycle]
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // every topic is created in `with_capacity`
            None => broadcast::channel(1).1,
        }
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
