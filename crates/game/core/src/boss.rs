//! Boss encounter phases.
//!
//! ```text
//! Dormant -> Warning -> Approaching -> Stationary(Idle <-> Telegraph -> BeamInFlight)
//!                                          |
//!                                          +-> Defeated
//! any active phase --(player death)--> Aborted
//! ```
//!
//! The encounter owns its timers through the session [`Scheduler`]; leaving an
//! active phase always cancels every boss timer.

use crate::config::GameConfig;
use crate::field::{MovementPattern, Obstacle, ObstacleField, ObstacleId, ObstacleKind, ObstacleSpec};
use crate::scheduler::{Scheduler, TimerKind};

/// Distance between the bottom edge and the boss center.
const BOSS_ELEVATION: f32 = 100.0;

/// Sub-state of the stationary attack loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AttackCycle {
    #[default]
    Idle,
    Telegraph,
    BeamInFlight,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BossPhase {
    #[default]
    Dormant,
    Warning,
    Approaching,
    Stationary(AttackCycle),
    Defeated,
    Aborted,
}

impl BossPhase {
    /// Phases with live boss timers or a boss on the field.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Warning | Self::Approaching | Self::Stationary(_))
    }
}

/// One boss encounter per run.
#[derive(Clone, Debug, Default)]
pub struct BossEncounter {
    phase: BossPhase,
    boss: Option<ObstacleId>,
    beam_hits: u32,
}

impl BossEncounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn boss_id(&self) -> Option<ObstacleId> {
        self.boss
    }

    /// Beam hits landed during this encounter.
    pub fn beam_hits(&self) -> u32 {
        self.beam_hits
    }

    /// Whether the elapsed run time should start the warning.
    pub fn should_trigger(&self, config: &GameConfig, run_elapsed_ms: u64) -> bool {
        let threshold_ms = (config.boss.spawn_time_sec * 1_000.0) as u64;
        config.boss.enabled && self.phase == BossPhase::Dormant && run_elapsed_ms >= threshold_ms
    }

    /// Dormant -> Warning. The caller pauses normal spawning.
    pub fn begin_warning(&mut self, scheduler: &mut Scheduler, now: u64, config: &GameConfig) -> bool {
        if self.phase != BossPhase::Dormant {
            return false;
        }
        self.phase = BossPhase::Warning;
        scheduler.schedule_once(TimerKind::BossWarningEnd, now, config.boss.warning_ms);
        true
    }

    /// Warning -> Approaching: places the boss just past the right edge.
    pub fn spawn<'f>(
        &mut self,
        field: &'f mut ObstacleField,
        config: &GameConfig,
        scroll_speed: f32,
    ) -> Option<&'f Obstacle> {
        if self.phase != BossPhase::Warning {
            return None;
        }
        self.phase = BossPhase::Approaching;
        let layout = &config.field;
        let boss = field.spawn(ObstacleSpec {
            kind: ObstacleKind::Boss,
            x: layout.spawn_x(),
            y: layout.height - BOSS_ELEVATION,
            hp: config.boss.hp,
            contact_damage: config.boss.contact_damage,
            speed: scroll_speed * config.boss.speed_factor,
            pattern: MovementPattern::Linear,
        });
        self.boss = Some(boss.id);
        Some(boss)
    }

    /// Approaching -> Stationary once the boss crossed the stop line.
    pub fn check_arrival(
        &mut self,
        field: &mut ObstacleField,
        scheduler: &mut Scheduler,
        now: u64,
        config: &GameConfig,
    ) -> bool {
        if self.phase != BossPhase::Approaching {
            return false;
        }
        let stop_x = config.field.width * config.boss.stop_ratio;
        let Some(boss) = self.boss.and_then(|id| field.get_mut(id)) else {
            return false;
        };
        if boss.x > stop_x {
            return false;
        }
        boss.speed = 0.0;
        self.phase = BossPhase::Stationary(AttackCycle::Idle);
        scheduler.schedule_repeating(TimerKind::BossAttack, now, config.boss.attack_interval_ms);
        true
    }

    /// Idle -> Telegraph on an attack tick. Ticks mid-attack are skipped.
    pub fn begin_telegraph(&mut self, scheduler: &mut Scheduler, now: u64, config: &GameConfig) -> bool {
        if self.phase != BossPhase::Stationary(AttackCycle::Idle) {
            return false;
        }
        self.phase = BossPhase::Stationary(AttackCycle::Telegraph);
        scheduler.schedule_once(TimerKind::BossTelegraphEnd, now, config.boss.telegraph_ms);
        true
    }

    /// Telegraph -> BeamInFlight.
    pub fn fire_beam(&mut self, scheduler: &mut Scheduler, now: u64, config: &GameConfig) -> bool {
        if self.phase != BossPhase::Stationary(AttackCycle::Telegraph) {
            return false;
        }
        self.phase = BossPhase::Stationary(AttackCycle::BeamInFlight);
        scheduler.schedule_once(TimerKind::BossBeamImpact, now, config.boss.beam_travel_ms);
        true
    }

    /// BeamInFlight -> Idle. Returns the hit count before this hit.
    pub fn land_beam(&mut self) -> Option<u32> {
        if self.phase != BossPhase::Stationary(AttackCycle::BeamInFlight) {
            return None;
        }
        self.phase = BossPhase::Stationary(AttackCycle::Idle);
        let prior = self.beam_hits;
        self.beam_hits += 1;
        Some(prior)
    }

    /// Boss HP reached zero.
    pub fn defeat(&mut self, scheduler: &mut Scheduler) -> bool {
        if !matches!(self.phase, BossPhase::Approaching | BossPhase::Stationary(_)) {
            return false;
        }
        scheduler.cancel_where(TimerKind::is_boss);
        self.phase = BossPhase::Defeated;
        true
    }

    /// Player died during the encounter. Returns the boss to remove, if any.
    pub fn abort(&mut self, scheduler: &mut Scheduler) -> Option<ObstacleId> {
        if !self.phase.is_active() {
            return None;
        }
        scheduler.cancel_where(TimerKind::is_boss);
        self.phase = BossPhase::Aborted;
        self.boss
    }
}
