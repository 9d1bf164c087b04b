//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the session and executes commands, while a
//! generation worker is spawned per request to wait on the external
//! generator without blocking the frame loop.

mod generation;
mod simulation;
mod timestep;

pub use simulation::{Command, SimulationWorker};
pub use timestep::FixedTimestep;
