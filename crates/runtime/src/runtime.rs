//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{GameConfig, GameSession, Item};

use crate::api::{ItemGenerator, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, FixedTimestep, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Seed for the obstacle roller.
    pub seed: u64,
    /// Fixed simulation step, also the ticker period.
    pub tick_interval: Duration,
    /// Run the internal ticker. When false the session only moves on
    /// [`RuntimeHandle::advance`].
    pub auto_tick: bool,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Upper bound on a single generator call (`None` waits forever).
    pub generation_timeout: Option<Duration>,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
    pub const DEFAULT_SEED: u64 = 0x5EED;
    pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

    fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(RuntimeError::InvalidConfig("tick_interval must be positive"));
        }
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig("event_buffer_size must be positive"));
        }
        if self.command_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig("command_buffer_size must be positive"));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: Self::DEFAULT_SEED,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            auto_tick: true,
            event_buffer_size: 100,
            command_buffer_size: 32,
            generation_timeout: Some(Self::DEFAULT_GENERATION_TIMEOUT),
        }
    }
}

/// Main runtime that orchestrates the game session
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Generation requests still in flight are abandoned.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.stop_worker().await;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    generator: Option<Arc<dyn ItemGenerator>>,
    saved_items: Vec<Item>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            generator: None,
            saved_items: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override gameplay tuning
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Disable the internal ticker (manual stepping via [`RuntimeHandle::advance`])
    pub fn auto_tick(mut self, enable: bool) -> Self {
        self.config.auto_tick = enable;
        self
    }

    /// Set the item generator (optional; generation requests fail without one)
    pub fn generator(mut self, generator: impl ItemGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Items loaded from a previous session, re-acquired at every run start
    pub fn saved_items(mut self, items: Vec<Item>) -> Self {
        self.saved_items = items;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;
        let config = self.config;

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let mut session = GameSession::new(config.game_config, config.seed);
        if !self.saved_items.is_empty() {
            session.load_saved(self.saved_items);
        }

        info!(
            target: "runtime",
            seed = config.seed,
            tick_ms = config.tick_interval.as_millis() as u64,
            auto_tick = config.auto_tick,
            generator = self.generator.is_some(),
            "Runtime started"
        );

        let sim_worker = SimulationWorker::new(
            session,
            command_rx,
            event_bus,
            self.generator,
            FixedTimestep::new(config.tick_interval),
        )
        .with_generation_timeout(config.generation_timeout)
        .with_auto_tick(config.auto_tick);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
