//! Deterministic simulation for the generated-arsenal side-scroller.
//!
//! `game-core` owns the rules: item validation, the two bounded inventories,
//! the scrolling obstacle field, attack resolution, player survival and the
//! boss encounter. Everything is driven through [`GameSession`] by frame ticks
//! and player intents, and reported back as [`GameEvent`]s. The crate does no
//! I/O and keeps no clock of its own, so hosts can replay a run from its seed
//! and frame timings.
pub mod boss;
pub mod combat;
pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod inventory;
pub mod item;
pub mod scheduler;
pub mod session;
pub mod survival;

pub use boss::{AttackCycle, BossEncounter, BossPhase};
pub use combat::{AttackOutcome, Hit, Hitbox, Strike, apply_hitboxes, kill_score, resolve_attack};
pub use config::{BossConfig, FieldConfig, GameConfig};
pub use error::{ErrorContext, ErrorSeverity, GameError, SessionError};
pub use event::{EventQueue, GameEvent, RemovalCause};
pub use field::{
    Archetype, Bounds, Difficulty, MovementPattern, Obstacle, ObstacleField, ObstacleId,
    ObstacleKind, ObstacleSpec, SpawnRng,
};
pub use inventory::{Arsenal, Inventory, InventorySnapshot};
pub use item::{
    AttackAnimation, Element, GenerationContext, Item, ItemCategory, ItemKind, RangeClass,
    has_name, normalize,
};
pub use scheduler::{Firing, Scheduler, TimerId, TimerKind};
pub use session::{GameSession, Intent, RunState, Score, SessionSnapshot};
pub use survival::{ChargeOutcome, ResourceMeter, Vitals};
