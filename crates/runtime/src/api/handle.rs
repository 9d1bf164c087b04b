//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the session or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{ChargeOutcome, Intent, Item, ItemCategory, ObstacleId, ObstacleSpec, SessionSnapshot};

use super::errors::{Result, RuntimeError};
use super::generator::GenerationRequest;
use crate::events::{Event, EventBus, Topic};
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

    async fn call<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the session by one frame of `dt_ms` and return the resulting snapshot.
    ///
    /// Works alongside the internal ticker; with auto-tick disabled this is
    /// the only way time moves.
    pub async fn advance(&self, dt_ms: u64) -> Result<SessionSnapshot> {
        self.call(|reply| Command::Advance { dt_ms, reply }).await
    }

    /// Apply a player intent
    pub async fn apply(&self, intent: Intent) -> Result<()> {
        self.call(|reply| Command::Intent { intent, reply }).await?
    }

    pub async fn attack(&self) -> Result<()> {
        self.apply(Intent::Attack).await
    }

    /// Select a slot; out-of-range or empty slots are ignored by the session.
    pub async fn select_slot(&self, category: ItemCategory, index: usize) -> Result<()> {
        self.apply(Intent::SelectSlot { category, index }).await
    }

    pub async fn confirm_stage(&self) -> Result<()> {
        self.apply(Intent::ConfirmStage).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.apply(Intent::Restart).await
    }

    /// Charge MP and start generating an item
    ///
    /// Returns as soon as the charge is decided; the item itself arrives
    /// later as [`crate::GenerationEvent::Completed`] on [`Topic::Generation`].
    pub async fn request_generation(&self, request: GenerationRequest) -> Result<ChargeOutcome> {
        self.call(|reply| Command::RequestGeneration { request, reply })
            .await?
    }

    /// Load persisted items into the arsenal
    pub async fn load_arsenal(&self, items: Vec<Item>) -> Result<()> {
        self.call(|reply| Command::LoadArsenal { items, reply }).await
    }

    /// Place an obstacle directly, bypassing the spawn timer
    pub async fn spawn_obstacle(&self, spec: ObstacleSpec) -> Result<ObstacleId> {
        self.call(|reply| Command::SpawnObstacle { spec, reply }).await
    }

    /// Query the current session (read-only snapshot)
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.call(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Items currently held, weapons first then magic
    pub async fn arsenal_items(&self) -> Result<Vec<Item>> {
        self.call(|reply| Command::QueryArsenal { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Player` - HP, MP, score, charging and attack feedback
    /// - `Topic::Arsenal` - Inventory snapshots and generated items
    /// - `Topic::Field` - Obstacle spawns and removals
    /// - `Topic::Boss` - Boss encounter progress
    /// - `Topic::Lifecycle` - Run start, game over, stage clear
    /// - `Topic::Generation` - External generator requests and results
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    /// while let Ok(event) = lifecycle.recv().await {
    ///     // Handle game over / stage clear
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn stop_worker(&self) {
        // A closed channel means the worker is already gone.
        let _ = self.command_tx.send(Command::Shutdown).await;
    }
}
