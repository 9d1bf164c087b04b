//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::Event;

const TOPIC_COUNT: usize = 6;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// HP, MP, score, charging and attack feedback
    Player,
    /// Inventory snapshots and newly generated items
    Arsenal,
    /// Obstacle spawns and removals
    Field,
    /// Boss warning, telegraph, beam and defeat
    Boss,
    /// Run start, game over and stage clear
    Lifecycle,
    /// External generator requests and results
    Generation,
}

impl Topic {
    pub const ALL: [Topic; TOPIC_COUNT] = [
        Topic::Player,
        Topic::Arsenal,
        Topic::Field,
        Topic::Boss,
        Topic::Lifecycle,
        Topic::Generation,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Topic-based event bus
///
/// Every topic owns a broadcast channel created up front, so publishing and
/// subscribing never need a lock.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; TOPIC_COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = std::array::from_fn(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
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

    /// Subscribe to every topic.
    pub fn subscribe_all(&self) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.subscribe_multiple(&Topic::ALL)
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
