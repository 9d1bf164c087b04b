//! The run aggregate.
//!
//! [`GameSession`] exclusively owns every piece of mutable run state (vitals,
//! arsenal, obstacle field, boss encounter, timers, score) and is driven by
//! two inputs only: [`GameSession::tick`] with a frame duration and
//! [`GameSession::apply`] with a player [`Intent`]. Everything it wants the
//! presentation layer to know is pushed to its [`EventQueue`].
//!
//! Frame order: timers → time score and difficulty → boss trigger → movement
//! → boss stop line → hitboxes → contact damage → offscreen culling → score
//! event.

use crate::boss::{BossEncounter, BossPhase};
use crate::combat::{AttackOutcome, Hit, Hitbox, apply_hitboxes, kill_score, resolve_attack};
use crate::config::GameConfig;
use crate::error::{ErrorContext, SessionError};
use crate::event::{EventQueue, GameEvent, RemovalCause};
use crate::field::{
    Bounds, Difficulty, ObstacleField, ObstacleId, ObstacleKind, ObstacleSpec, SpawnRng,
};
use crate::inventory::{Arsenal, InventorySnapshot};
use crate::item::{Item, ItemCategory};
use crate::scheduler::{Firing, Scheduler, TimerId, TimerKind};
use crate::survival::{ChargeOutcome, Vitals};

/// Player collision box `(width, height)`.
const PLAYER_SIZE: (f32, f32) = (38.0, 51.0);

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RunState {
    Playing,
    /// Dead; waiting for the game-over reveal.
    Dying,
    /// Terminal until restarted.
    Over,
    /// Boss defeated; physics paused until the stage-clear reveal.
    Clearing,
    /// Waiting for the player to confirm the next stage.
    Cleared,
}

/// Player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "intent", rename_all = "snake_case"))]
pub enum Intent {
    Attack,
    SelectSlot { category: ItemCategory, index: usize },
    ConfirmStage,
    Restart,
}

/// Score kept in thousandths of a point so sub-point time increments add up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    milli: u64,
}

impl Score {
    /// Ten points per second of play.
    pub fn add_time(&mut self, dt_ms: u64) {
        self.milli += dt_ms * 10;
    }

    pub fn add_points(&mut self, points: u64) {
        self.milli += points * 1_000;
    }

    pub fn points(&self) -> u64 {
        self.milli / 1_000
    }
}

/// Read-only summary for hosts and tests.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub state: RunState,
    pub stage: u32,
    pub clock_ms: u64,
    pub score: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub charging: Option<ItemCategory>,
    pub inventory: InventorySnapshot,
    pub obstacles: usize,
    pub boss_phase: String,
}

pub struct GameSession {
    config: GameConfig,
    seed: u64,
    rng: SpawnRng,

    /// Bumped by every run start; generation results carry the id they were charged under.
    run_id: u64,
    state: RunState,
    stage: u32,
    clock_ms: u64,
    run_started_at: u64,

    vitals: Vitals,
    arsenal: Arsenal,
    saved_items: Vec<Item>,
    field: ObstacleField,
    boss: BossEncounter,
    scheduler: Scheduler,
    hitboxes: Vec<Hitbox>,

    score: Score,
    reported_score: u64,
    difficulty: Difficulty,
    spawn_timer: Option<TimerId>,
    last_melee_at: Option<u64>,
    last_boss_contact_at: Option<u64>,

    events: EventQueue,
}

impl GameSession {
    /// Creates a session and starts stage 1.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let difficulty = Difficulty::at(&config, 0);
        let mut session = Self {
            vitals: Vitals::new(&config),
            config,
            seed,
            rng: SpawnRng::for_stage(seed, 1),
            run_id: 0,
            state: RunState::Playing,
            stage: 1,
            clock_ms: 0,
            run_started_at: 0,
            arsenal: Arsenal::new(),
            saved_items: Vec::new(),
            field: ObstacleField::new(),
            boss: BossEncounter::new(),
            scheduler: Scheduler::new(),
            hitboxes: Vec::new(),
            score: Score::default(),
            reported_score: 0,
            difficulty,
            spawn_timer: None,
            last_melee_at: None,
            last_boss_contact_at: None,
            events: EventQueue::new(),
        };
        session.start_run(1);
        session
    }

    // ===== accessors =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Identifier of the current run. Changes on restart and on every stage start.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn score(&self) -> u64 {
        self.score.points()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn boss(&self) -> &BossEncounter {
        &self.boss
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Timers still scheduled, paused ones included.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            stage: self.stage,
            clock_ms: self.clock_ms,
            score: self.score.points(),
            hp: self.vitals.hp.current,
            max_hp: self.vitals.hp.maximum,
            mp: self.vitals.mp.current,
            max_mp: self.vitals.mp.maximum,
            charging: self.vitals.charging(),
            inventory: self.arsenal.snapshot(),
            obstacles: self.field.len(),
            boss_phase: self.boss.phase().to_string(),
        }
    }

    // ===== host inputs =====

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, dt_ms: u64) {
        if dt_ms == 0 {
            return;
        }
        self.clock_ms += dt_ms;
        self.fire_timers();
        if self.state != RunState::Playing {
            return;
        }

        self.score.add_time(dt_ms);
        self.update_difficulty();
        self.check_boss_trigger();

        self.field
            .advance(dt_ms, self.clock_ms, &self.config.field);
        if self.boss.check_arrival(
            &mut self.field,
            &mut self.scheduler,
            self.clock_ms,
            &self.config,
        ) {
            if let Some(boss) = self.boss.boss_id().and_then(|id| self.field.get(id)) {
                self.events.push(GameEvent::BossHpChanged {
                    hp: boss.hp,
                    max_hp: boss.max_hp,
                });
            }
        }

        let hits = apply_hitboxes(&mut self.hitboxes, &mut self.field, self.clock_ms);
        self.resolve_hits(hits);
        if self.state == RunState::Playing {
            self.apply_contact_damage();
        }
        for id in self.field.cull_offscreen() {
            self.events.push(GameEvent::ObstacleDestroyed {
                id,
                cause: RemovalCause::Offscreen,
                points: 0,
            });
        }
        self.flush_score();
    }

    /// Applies a player intent.
    pub fn apply(&mut self, intent: Intent) -> Result<(), SessionError> {
        match intent {
            Intent::Attack => {
                self.ensure_state(RunState::Playing, "attack")?;
                self.attack();
            }
            Intent::SelectSlot { category, index } => {
                self.ensure_state(RunState::Playing, "select")?;
                if self.arsenal.select(category, index) {
                    self.emit_inventory();
                }
            }
            Intent::ConfirmStage => {
                self.ensure_state(RunState::Cleared, "confirm_stage")?;
                self.start_run(self.stage + 1);
            }
            Intent::Restart => {
                self.ensure_state(RunState::Over, "restart")?;
                self.start_run(1);
            }
        }
        Ok(())
    }

    /// Charges MP for an external generation request.
    pub fn request_generation(
        &mut self,
        category: ItemCategory,
        cost: u32,
    ) -> Result<ChargeOutcome, SessionError> {
        self.ensure_state(RunState::Playing, "request_generation")?;
        let outcome = self.vitals.request_generation(category, cost);
        match outcome {
            ChargeOutcome::Charging { category, cost } => {
                self.events
                    .push(GameEvent::ChargingStarted { category, cost });
                self.emit_mp();
            }
            ChargeOutcome::InsufficientMp {
                required,
                available,
            } => self.events.push(GameEvent::InsufficientMp {
                required,
                available,
            }),
            ChargeOutcome::AlreadyCharging => {}
        }
        Ok(outcome)
    }

    /// Hands a validated generated item to the arsenal and releases the charge lock.
    ///
    /// `run_id` is the [`run_id`](Self::run_id) the request was charged under.
    /// Items arriving after their run ended are dropped; a result from an
    /// earlier run leaves the current charge lock alone.
    pub fn complete_generation(&mut self, run_id: u64, item: Item) -> Result<(), SessionError> {
        self.ensure_current_run(run_id)?;
        self.vitals.finish_generation();
        self.ensure_state(RunState::Playing, "complete_generation")?;
        self.events.push(GameEvent::ItemReady(item.clone()));
        self.arsenal.acquire(item);
        self.emit_inventory();
        Ok(())
    }

    /// Releases the charge lock after a failed generation. MP is not refunded.
    ///
    /// Failures reported for an earlier run are ignored.
    pub fn abort_generation(&mut self, run_id: u64) {
        if run_id != self.run_id {
            return;
        }
        if self.vitals.finish_generation().is_some() {
            self.events.push(GameEvent::ChargingCancelled);
        }
    }

    /// Loads persisted items. They are re-acquired at the start of every run.
    pub fn load_saved(&mut self, items: Vec<Item>) {
        for item in &items {
            self.arsenal.acquire(item.clone());
        }
        self.saved_items = items;
        self.emit_inventory();
    }

    /// Places an obstacle directly, bypassing the spawn timer.
    pub fn spawn_obstacle(&mut self, spec: ObstacleSpec) -> ObstacleId {
        let obstacle = self.field.spawn(spec);
        let event = GameEvent::ObstacleSpawned {
            id: obstacle.id,
            kind: obstacle.kind,
            x: obstacle.x,
            y: obstacle.y,
        };
        let id = obstacle.id;
        self.events.push(event);
        id
    }

    /// Explicitly consumes an item slot.
    pub fn consume(&mut self, category: ItemCategory, index: usize) -> Result<Item, SessionError> {
        let item = self
            .arsenal
            .consume(category, index)
            .ok_or(SessionError::EmptySlot {
                category,
                index,
                context: self.error_context(),
            })?;
        self.emit_inventory();
        Ok(item)
    }

    // ===== run lifecycle =====

    fn start_run(&mut self, stage: u32) {
        self.scheduler.cancel_all();
        self.field.clear();
        self.hitboxes.clear();
        self.boss = BossEncounter::new();
        self.vitals = Vitals::new(&self.config);
        self.arsenal.clear();
        for item in &self.saved_items {
            self.arsenal.acquire(item.clone());
        }

        self.run_id += 1;
        self.rng = SpawnRng::for_stage(self.seed, stage);
        self.stage = stage;
        self.state = RunState::Playing;
        self.run_started_at = self.clock_ms;
        self.score = Score::default();
        self.reported_score = 0;
        self.last_melee_at = None;
        self.last_boss_contact_at = None;
        self.difficulty = Difficulty::at(&self.config, 0);

        self.spawn_timer = Some(self.scheduler.schedule_repeating(
            TimerKind::Spawn,
            self.clock_ms,
            self.difficulty.spawn_delay_ms,
        ));
        self.scheduler.schedule_repeating(
            TimerKind::MpRegen,
            self.clock_ms,
            self.config.mp_regen_interval_ms,
        );

        self.events.push(GameEvent::RunStarted { stage });
        self.emit_hp();
        self.emit_mp();
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.emit_inventory();
    }

    fn die(&mut self) {
        if let Some(boss) = self.boss.abort(&mut self.scheduler) {
            self.field.remove(boss);
        }
        self.scheduler.cancel_all();
        self.spawn_timer = None;
        self.hitboxes.clear();
        self.state = RunState::Dying;
        self.scheduler.schedule_once(
            TimerKind::GameOverReveal,
            self.clock_ms,
            self.config.game_over_delay_ms,
        );
    }

    fn defeat_boss(&mut self, id: ObstacleId) {
        if !self.boss.defeat(&mut self.scheduler) {
            return;
        }
        self.field.remove(id);
        let bonus = self.config.boss.defeat_bonus;
        self.score.add_points(bonus);
        self.events.push(GameEvent::ObstacleDestroyed {
            id,
            cause: RemovalCause::Killed,
            points: bonus,
        });
        self.events.push(GameEvent::BossDefeated { bonus });
        self.flush_score();

        self.scheduler.cancel_all();
        self.spawn_timer = None;
        self.hitboxes.clear();
        self.state = RunState::Clearing;
        self.scheduler.schedule_once(
            TimerKind::VictoryReveal,
            self.clock_ms,
            self.config.victory_delay_ms,
        );
    }

    // ===== timers =====

    fn fire_timers(&mut self) {
        while let Some(firing) = self.scheduler.pop_due(self.clock_ms) {
            self.on_timer(firing);
        }
    }

    fn on_timer(&mut self, firing: Firing) {
        let now = firing.due_at;
        match firing.kind {
            TimerKind::Spawn => {
                let obstacle = self.field.spawn_random(
                    &mut self.rng,
                    &self.config.field,
                    self.difficulty.scroll_speed,
                );
                let event = GameEvent::ObstacleSpawned {
                    id: obstacle.id,
                    kind: obstacle.kind,
                    x: obstacle.x,
                    y: obstacle.y,
                };
                self.events.push(event);
            }
            TimerKind::MpRegen => {
                if self.vitals.regenerate(self.config.mp_regen_rate) {
                    self.emit_mp();
                }
            }
            TimerKind::BossWarningEnd => {
                let spawned = self
                    .boss
                    .spawn(&mut self.field, &self.config, self.difficulty.scroll_speed)
                    .map(|boss| (boss.id, boss.hp, boss.max_hp));
                if let Some((id, hp, max_hp)) = spawned {
                    self.events.push(GameEvent::BossSpawned { id, max_hp });
                    self.events.push(GameEvent::BossHpChanged { hp, max_hp });
                }
            }
            TimerKind::BossAttack => {
                if self.boss.begin_telegraph(&mut self.scheduler, now, &self.config) {
                    self.events.push(GameEvent::BossTelegraph {
                        duration_ms: self.config.boss.telegraph_ms,
                    });
                }
            }
            TimerKind::BossTelegraphEnd => {
                if self.boss.fire_beam(&mut self.scheduler, now, &self.config) {
                    self.events.push(GameEvent::BossBeamFired {
                        travel_ms: self.config.boss.beam_travel_ms,
                    });
                }
            }
            TimerKind::BossBeamImpact => {
                if self.state != RunState::Playing || !self.vitals.is_alive() {
                    return;
                }
                if let Some(prior_hits) = self.boss.land_beam() {
                    let hp = self.vitals.beam_hit(prior_hits);
                    self.events.push(GameEvent::BossBeamHit { hp });
                    self.emit_hp();
                    if hp == 0 {
                        self.die();
                    }
                }
            }
            TimerKind::VictoryReveal => {
                if self.state != RunState::Clearing {
                    return;
                }
                let score = self.score.points();
                if self.config.final_stage.is_some_and(|last| self.stage >= last) {
                    self.state = RunState::Over;
                    self.events.push(GameEvent::GameOver {
                        score,
                        cleared: true,
                    });
                } else {
                    self.state = RunState::Cleared;
                    self.events.push(GameEvent::StageClear {
                        score,
                        stage: self.stage,
                    });
                }
            }
            TimerKind::GameOverReveal => {
                if self.state != RunState::Dying {
                    return;
                }
                self.state = RunState::Over;
                self.events.push(GameEvent::GameOver {
                    score: self.score.points(),
                    cleared: false,
                });
            }
        }
    }

    // ===== frame steps =====

    fn update_difficulty(&mut self) {
        let next = Difficulty::at(&self.config, self.score.points());
        if next.level == self.difficulty.level {
            return;
        }
        self.difficulty = next;
        if let Some(timer) = self.spawn_timer {
            self.scheduler
                .reset_interval(timer, self.clock_ms, next.spawn_delay_ms);
        }
    }

    fn check_boss_trigger(&mut self) {
        let elapsed = self.clock_ms - self.run_started_at;
        if !self.boss.should_trigger(&self.config, elapsed) {
            return;
        }
        if self
            .boss
            .begin_warning(&mut self.scheduler, self.clock_ms, &self.config)
        {
            if let Some(timer) = self.spawn_timer {
                self.scheduler.pause(timer, self.clock_ms);
            }
            self.events.push(GameEvent::BossWarning {
                duration_ms: self.config.boss.warning_ms,
            });
        }
    }

    fn attack(&mut self) {
        let outcome = resolve_attack(
            &self.arsenal,
            self.last_melee_at,
            self.clock_ms,
            &self.config,
        );
        match outcome {
            AttackOutcome::Recovering { .. } => {}
            AttackOutcome::Heal {
                item,
                amount,
                slot,
                animation,
            } => {
                let restored = self.vitals.heal(amount);
                self.arsenal.consume(ItemCategory::Magic, slot);
                self.events.push(GameEvent::HealApplied {
                    amount: restored,
                    hp: self.vitals.hp.current,
                });
                self.emit_hp();
                self.events.push(GameEvent::AttackExecuted {
                    item: Some(item),
                    reach: 0.0,
                    animation,
                });
                self.emit_inventory();
            }
            AttackOutcome::Strike(strike) => {
                if strike.melee {
                    self.last_melee_at = Some(self.clock_ms);
                }
                self.hitboxes.push(Hitbox::in_front_of_player(
                    &self.config.field,
                    strike.reach,
                    strike.damage,
                    self.clock_ms,
                    self.config.hitbox_lifetime_ms,
                ));
                self.events.push(GameEvent::AttackExecuted {
                    item: strike.item,
                    reach: strike.reach,
                    animation: strike.animation,
                });
                if let Some((category, index)) = strike.consume {
                    self.arsenal.consume(category, index);
                    self.emit_inventory();
                }

                let hits = apply_hitboxes(&mut self.hitboxes, &mut self.field, self.clock_ms);
                self.resolve_hits(hits);
                self.flush_score();
            }
        }
    }

    /// Applies kills in hit order. A boss defeat freezes the run, so later
    /// hits of the same batch score nothing.
    fn resolve_hits(&mut self, hits: Vec<Hit>) {
        for hit in hits {
            if self.state != RunState::Playing {
                break;
            }
            if hit.is_boss {
                if let Some(boss) = self.field.get(hit.id) {
                    self.events.push(GameEvent::BossHpChanged {
                        hp: boss.hp,
                        max_hp: boss.max_hp,
                    });
                }
                if hit.killed() {
                    self.defeat_boss(hit.id);
                }
            } else if hit.killed() {
                let points = kill_score(hit.pre_hit_hp, self.config.kill_score_multiplier);
                self.field.remove(hit.id);
                self.score.add_points(points);
                self.events.push(GameEvent::ObstacleDestroyed {
                    id: hit.id,
                    cause: RemovalCause::Killed,
                    points,
                });
            }
        }
    }

    fn apply_contact_damage(&mut self) {
        let layout = &self.config.field;
        let player = Bounds::from_center(
            layout.player_x,
            layout.player_y(),
            PLAYER_SIZE.0,
            PLAYER_SIZE.1,
        );

        for id in self.field.overlapping(&player) {
            let Some(obstacle) = self.field.get(id) else {
                continue;
            };
            if obstacle.is_dead() {
                continue;
            }
            let damage = obstacle.contact_damage;

            if obstacle.kind == ObstacleKind::Boss {
                let cooldown = self.config.boss.contact_cooldown_ms;
                if self
                    .last_boss_contact_at
                    .is_some_and(|last| self.clock_ms < last + cooldown)
                {
                    continue;
                }
                self.last_boss_contact_at = Some(self.clock_ms);
            } else {
                self.field.remove(id);
                self.events.push(GameEvent::ObstacleDestroyed {
                    id,
                    cause: RemovalCause::Contact,
                    points: 0,
                });
            }

            let hp = self.vitals.take_damage(damage);
            self.emit_hp();
            if hp == 0 {
                self.die();
                return;
            }
        }
    }

    // ===== helpers =====

    fn ensure_state(&self, expected: RunState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            return Ok(());
        }
        Err(SessionError::RunNotActive {
            operation,
            state: self.state.into(),
            context: self.error_context(),
        })
    }

    fn ensure_current_run(&self, run_id: u64) -> Result<(), SessionError> {
        if run_id == self.run_id {
            return Ok(());
        }
        Err(SessionError::StaleGeneration {
            run_id,
            current: self.run_id,
            context: self.error_context(),
        })
    }

    fn error_context(&self) -> ErrorContext {
        ErrorContext::new(self.clock_ms, self.stage)
    }

    fn flush_score(&mut self) {
        let points = self.score.points();
        if points != self.reported_score {
            self.reported_score = points;
            self.events.push(GameEvent::ScoreChanged { score: points });
        }
    }

    fn emit_hp(&mut self) {
        self.events.push(GameEvent::HpChanged {
            hp: self.vitals.hp.current,
            max_hp: self.vitals.hp.maximum,
        });
    }

    fn emit_mp(&mut self) {
        self.events.push(GameEvent::MpChanged {
            mp: self.vitals.mp.current,
            max_mp: self.vitals.mp.maximum,
        });
    }

    fn emit_inventory(&mut self) {
        self.events
            .push(GameEvent::InventoryChanged(self.arsenal.snapshot()));
    }
}

impl core::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("stage", &self.stage)
            .field("clock_ms", &self.clock_ms)
            .field("score", &self.score.points())
            .field("boss", &self.boss.phase())
            .finish_non_exhaustive()
    }
}
