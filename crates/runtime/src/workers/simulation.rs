//! Simulation worker that owns the authoritative [`game_core::GameSession`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the session on a
//! fixed timestep, folds generator results back in, and publishes session
//! events to the [`EventBus`].

use std::sync::Arc;
use std::time::Duration;

use game_core::{
    ChargeOutcome, GameEvent, GameSession, Intent, Item, ObstacleId, ObstacleSpec,
    SessionSnapshot, normalize,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use super::generation::{GenerationOutcome, GenerationWorker};
use super::timestep::FixedTimestep;
use crate::api::{GenerationRequest, ItemGenerator, Result, RuntimeError};
use crate::events::{Event, EventBus, GenerationEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance the session by `dt_ms` regardless of the ticker.
    Advance {
        dt_ms: u64,
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Apply a player intent.
    Intent {
        intent: Intent,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Charge MP and hand the request to the item generator.
    RequestGeneration {
        request: GenerationRequest,
        reply: oneshot::Sender<Result<ChargeOutcome>>,
    },
    /// Replace the persisted item list re-acquired at every run start.
    LoadArsenal {
        items: Vec<Item>,
        reply: oneshot::Sender<()>,
    },
    /// Place an obstacle directly.
    SpawnObstacle {
        spec: ObstacleSpec,
        reply: oneshot::Sender<ObstacleId>,
    },
    /// Query a read-only snapshot of the session.
    QuerySnapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Query the items currently held, weapons first.
    QueryArsenal { reply: oneshot::Sender<Vec<Item>> },
    /// Stop the worker loop.
    Shutdown,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    session: GameSession,
    command_rx: mpsc::Receiver<Command>,
    results_tx: mpsc::UnboundedSender<GenerationOutcome>,
    results_rx: mpsc::UnboundedReceiver<GenerationOutcome>,
    event_bus: EventBus,
    generator: Option<Arc<dyn ItemGenerator>>,
    generation_timeout: Option<Duration>,
    timestep: FixedTimestep,
    auto_tick: bool,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        session: GameSession,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        generator: Option<Arc<dyn ItemGenerator>>,
        timestep: FixedTimestep,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            session,
            command_rx,
            results_tx,
            results_rx,
            event_bus,
            generator,
            generation_timeout: None,
            timestep,
            auto_tick: true,
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Disable the internal ticker; the session then only moves on `Advance`.
    pub fn with_auto_tick(mut self, auto_tick: bool) -> Self {
        self.auto_tick = auto_tick;
        self
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut ticker = self.auto_tick.then(|| {
            let mut interval = tokio::time::interval(self.timestep.step());
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let mut last_tick = Instant::now();

        // Events queued while the session was built (run start, saved items).
        self.publish_events();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                Some(outcome) = self.results_rx.recv() => {
                    self.finish_generation(outcome);
                }
                now = next_tick(&mut ticker) => {
                    let steps = self.timestep.advance(now.saturating_duration_since(last_tick));
                    last_tick = now;
                    for _ in 0..steps {
                        self.step(self.timestep.step_ms());
                    }
                }
            }
        }

        debug!(
            target: "runtime::worker",
            clock_ms = self.session.clock_ms(),
            "Simulation worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Advance { dt_ms, reply } => {
                self.step(dt_ms);
                let _ = reply.send(self.session.snapshot());
            }
            Command::Intent { intent, reply } => {
                let result = self.apply_intent(intent);
                let _ = reply.send(result);
            }
            Command::RequestGeneration { request, reply } => {
                let result = self.request_generation(request);
                let _ = reply.send(result);
            }
            Command::LoadArsenal { items, reply } => {
                debug!(target: "runtime::worker", count = items.len(), "Loading saved arsenal");
                self.session.load_saved(items);
                self.publish_events();
                let _ = reply.send(());
            }
            Command::SpawnObstacle { spec, reply } => {
                let id = self.session.spawn_obstacle(spec);
                self.publish_events();
                let _ = reply.send(id);
            }
            Command::QuerySnapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::QueryArsenal { reply } => {
                let arsenal = self.session.arsenal();
                let items = arsenal
                    .weapons()
                    .items()
                    .iter()
                    .chain(arsenal.magics().items())
                    .cloned()
                    .collect();
                let _ = reply.send(items);
            }
            Command::Shutdown => {}
        }
    }

    fn step(&mut self, dt_ms: u64) {
        self.session.tick(dt_ms);
        self.publish_events();
    }

    fn apply_intent(&mut self, intent: Intent) -> Result<()> {
        let result = self.session.apply(intent);
        self.publish_events();
        if let Err(error) = &result {
            debug!(
                target: "runtime::worker",
                intent = ?intent,
                error = %error,
                "Intent rejected"
            );
        }
        result.map_err(RuntimeError::from)
    }

    fn request_generation(&mut self, request: GenerationRequest) -> Result<ChargeOutcome> {
        let generator = self
            .generator
            .clone()
            .ok_or(RuntimeError::GeneratorNotSet)?;

        let outcome = self
            .session
            .request_generation(request.category, request.cost);
        self.publish_events();
        let outcome = outcome?;

        if let ChargeOutcome::Charging { category, cost } = outcome {
            let run_id = self.session.run_id();
            debug!(
                target: "runtime::worker",
                category = %category,
                cost,
                run_id,
                "Generation requested"
            );
            self.event_bus
                .publish(Event::Generation(GenerationEvent::Requested { category, cost }));
            GenerationWorker::new(
                generator,
                request,
                run_id,
                self.generation_timeout,
                self.results_tx.clone(),
            )
            .spawn();
        }

        Ok(outcome)
    }

    fn finish_generation(&mut self, outcome: GenerationOutcome) {
        let category = outcome.request.category;
        let event = match outcome.result {
            Ok(raw) => {
                let item = normalize(&raw, outcome.request.context());
                let name = item.name().to_owned();
                match self.session.complete_generation(outcome.run_id, item) {
                    Ok(()) => {
                        info!(
                            target: "runtime::worker",
                            category = %category,
                            item = %name,
                            "Generated item added to arsenal"
                        );
                        GenerationEvent::Completed { category, name }
                    }
                    Err(error) => {
                        debug!(
                            target: "runtime::worker",
                            item = %name,
                            error = %error,
                            "Generated item discarded"
                        );
                        GenerationEvent::Discarded { category, name }
                    }
                }
            }
            Err(error) => {
                warn!(
                    target: "runtime::worker",
                    category = %category,
                    error = %error,
                    "Item generation failed"
                );
                self.session.abort_generation(outcome.run_id);
                GenerationEvent::Failed {
                    category,
                    error: error.to_string(),
                }
            }
        };

        self.publish_events();
        self.event_bus.publish(Event::Generation(event));
    }

    fn publish_events(&mut self) {
        let clock_ms = self.session.clock_ms();
        for event in self.session.drain_events() {
            match &event {
                GameEvent::GameOver { score, cleared } => info!(
                    target: "runtime::worker",
                    score,
                    cleared,
                    stage = self.session.stage(),
                    "Run over"
                ),
                GameEvent::StageClear { score, stage } => {
                    info!(target: "runtime::worker", score, stage, "Stage cleared")
                }
                GameEvent::BossSpawned { id, max_hp } => {
                    debug!(target: "runtime::worker", id = %id, max_hp, "Boss spawned")
                }
                _ => trace!(target: "runtime::worker", event = ?event, "Session event"),
            }
            self.event_bus.publish(Event::Game { clock_ms, event });
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}
