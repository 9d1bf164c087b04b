//! Data-driven content and loaders.
//!
//! This crate provides loaders for the files a run is configured from:
//! - Game configuration (TOML, with a bundled default)
//! - The persisted arsenal (JSON list of item payloads)
//!
//! All loaders use game-core types directly; untrusted item data always goes
//! through `game_core::normalize`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ArsenalLoader, ConfigLoader, ContentFactory, LoadResult};
