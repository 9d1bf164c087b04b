//! Event payloads carried by the bus.

use game_core::{GameEvent, ItemCategory};
use serde::{Deserialize, Serialize};

use super::bus::Topic;

/// Event wrapper published on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Emitted by the session while ticking or applying an intent.
    Game { clock_ms: u64, event: GameEvent },
    /// Lifecycle of a request to the external generator.
    Generation(GenerationEvent),
}

/// Generation lifecycle as seen by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationEvent {
    Requested { category: ItemCategory, cost: u32 },
    Completed { category: ItemCategory, name: String },
    /// The run ended before the payload arrived.
    Discarded { category: ItemCategory, name: String },
    Failed { category: ItemCategory, error: String },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game { event, .. } => topic_of(event),
            Event::Generation(_) => Topic::Generation,
        }
    }

    /// The wrapped session event, if any.
    pub fn game_event(&self) -> Option<&GameEvent> {
        match self {
            Event::Game { event, .. } => Some(event),
            Event::Generation(_) => None,
        }
    }
}

fn topic_of(event: &GameEvent) -> Topic {
    match event {
        GameEvent::HpChanged { .. }
        | GameEvent::MpChanged { .. }
        | GameEvent::ScoreChanged { .. }
        | GameEvent::ChargingStarted { .. }
        | GameEvent::ChargingCancelled
        | GameEvent::InsufficientMp { .. }
        | GameEvent::AttackExecuted { .. }
        | GameEvent::HealApplied { .. } => Topic::Player,

        GameEvent::InventoryChanged(_) | GameEvent::ItemReady(_) => Topic::Arsenal,

        GameEvent::ObstacleSpawned { .. } | GameEvent::ObstacleDestroyed { .. } => Topic::Field,

        GameEvent::BossWarning { .. }
        | GameEvent::BossSpawned { .. }
        | GameEvent::BossHpChanged { .. }
        | GameEvent::BossTelegraph { .. }
        | GameEvent::BossBeamFired { .. }
        | GameEvent::BossBeamHit { .. }
        | GameEvent::BossDefeated { .. } => Topic::Boss,

        GameEvent::RunStarted { .. } | GameEvent::GameOver { .. } | GameEvent::StageClear { .. } => {
            Topic::Lifecycle
        }
    }
}
