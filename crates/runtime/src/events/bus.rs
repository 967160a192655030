//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{Announcement, BoostEvent, ModifierEvent, RewardEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Timed boost activation and expiry
    Boost,
    /// Reward grants
    Reward,
    /// Crystal and pet changes
    Modifier,
    /// Human-readable notices
    Announcement,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::Boost,
        Topic::Reward,
        Topic::Modifier,
        Topic::Announcement,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EconomyEvent {
    Boost(BoostEvent),
    Reward(RewardEvent),
    Modifier(ModifierEvent),
    Announced(Announcement),
}

impl EconomyEvent {
    pub fn topic(&self) -> Topic {
        match self {
            EconomyEvent::Boost(_) => Topic::Boost,
            EconomyEvent::Reward(_) => Topic::Reward,
            EconomyEvent::Modifier(_) => Topic::Modifier,
            EconomyEvent::Announced(_) => Topic::Announcement,
        }
    }
}

/// Topic-based event bus
///
/// One broadcast channel per topic, created up front. Publishing never
/// blocks; events sent while a topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<EconomyEvent>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Topic::ALL.map(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: EconomyEvent) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<EconomyEvent> {
        self.channels[topic.index()].subscribe()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
