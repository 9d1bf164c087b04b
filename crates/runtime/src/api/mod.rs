//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod generator;
pub mod handle;

pub use errors::{GenerationError, Result, RuntimeError};
pub use generator::{FallbackGenerator, GenerationRequest, GenerationSource, ItemGenerator};
pub use handle::RuntimeHandle;
