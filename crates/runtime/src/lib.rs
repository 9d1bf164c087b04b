//! Runtime orchestration for the generated-arsenal simulation.
//!
//! This crate wires the deterministic [`game_core::GameSession`] to a
//! fixed-timestep ticker, a command channel, a topic event bus and the
//! external item generator. Consumers embed [`Runtime`] to drive the run,
//! subscribe to events, and issue intents through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    FallbackGenerator, GenerationError, GenerationRequest, GenerationSource, ItemGenerator,
    Result, RuntimeError, RuntimeHandle,
};
pub use events::{Event, EventBus, GenerationEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::FixedTimestep;
