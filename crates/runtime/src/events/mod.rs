//! Topic-based event bus for runtime events.
//!
//! Session events are wrapped with the clock they were produced at and
//! routed to a topic, so consumers can subscribe only to what they render.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{Event, GenerationEvent};
