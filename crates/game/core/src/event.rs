//! Outbound events toward the presentation layer.
//!
//! The session pushes events while it mutates state and the host drains them
//! after every tick or intent. Nothing in the core reads events back.

use crate::field::{ObstacleId, ObstacleKind};
use crate::inventory::InventorySnapshot;
use crate::item::{AttackAnimation, Item, ItemCategory};

/// Why an obstacle left the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RemovalCause {
    Killed,
    Contact,
    Offscreen,
}

/// Something the presentation layer should show or react to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", content = "data", rename_all = "snake_case"))]
pub enum GameEvent {
    RunStarted {
        stage: u32,
    },
    HpChanged {
        hp: u32,
        max_hp: u32,
    },
    MpChanged {
        mp: u32,
        max_mp: u32,
    },
    ScoreChanged {
        score: u64,
    },
    InventoryChanged(InventorySnapshot),
    ChargingStarted {
        category: ItemCategory,
        cost: u32,
    },
    ChargingCancelled,
    ItemReady(Item),
    InsufficientMp {
        required: u32,
        available: u32,
    },
    AttackExecuted {
        /// `None` for bare-hand attacks.
        item: Option<String>,
        reach: f32,
        animation: AttackAnimation,
    },
    HealApplied {
        amount: u32,
        hp: u32,
    },
    ObstacleSpawned {
        id: ObstacleId,
        kind: ObstacleKind,
        x: f32,
        y: f32,
    },
    ObstacleDestroyed {
        id: ObstacleId,
        cause: RemovalCause,
        points: u64,
    },
    BossWarning {
        duration_ms: u64,
    },
    BossSpawned {
        id: ObstacleId,
        max_hp: u32,
    },
    BossHpChanged {
        hp: u32,
        max_hp: u32,
    },
    BossTelegraph {
        duration_ms: u64,
    },
    BossBeamFired {
        travel_ms: u64,
    },
    BossBeamHit {
        hp: u32,
    },
    BossDefeated {
        bonus: u64,
    },
    GameOver {
        score: u64,
        cleared: bool,
    },
    StageClear {
        score: u64,
        stage: u32,
    },
}

/// FIFO of events produced since the last drain.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
