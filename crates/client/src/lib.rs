//! Headless client for the generated-arsenal game.
//!
//! The `arsenal` binary is the composition root: it reads configuration from
//! the environment, sets up logging, loads content, builds the
//! [`runtime::Runtime`] with an [`OfflineGenerator`], and lets the
//! [`Autopilot`] play until the run ends or the time limit passes.

pub mod autopilot;
pub mod config;
pub mod dirs;
pub mod generator;
pub mod logging;

pub use autopilot::{Autopilot, Decision};
pub use config::ClientConfig;
pub use generator::OfflineGenerator;
