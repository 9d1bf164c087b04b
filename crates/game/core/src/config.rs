/// Game configuration constants and tunable parameters.
///
/// Compile-time limits live as associated constants; everything a host may
/// want to tune per session is a field with a default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Starting and maximum hit points.
    pub initial_hp: u32,
    /// Starting and maximum magic points.
    pub initial_mp: u32,
    /// MP restored on every regeneration tick.
    pub mp_regen_rate: u32,
    pub mp_regen_interval_ms: u64,

    /// Scroll speed (units per second) at score zero.
    pub base_scroll_speed: f32,
    /// Added to the scroll speed for every difficulty step.
    pub speed_increase_rate: f32,
    /// Spawn delay at score zero.
    pub spawn_interval_ms: u64,
    /// Floor of the spawn delay once difficulty ramps up.
    pub min_spawn_interval_ms: u64,
    /// Removed from the spawn delay for every difficulty step.
    pub spawn_interval_step_ms: u64,
    /// Score points per difficulty step.
    pub difficulty_score_step: u64,

    pub bare_hand_damage: u32,
    pub melee_recovery_ms: u64,
    pub heal_amount: u32,
    pub hitbox_lifetime_ms: u64,
    /// Points awarded per remaining obstacle HP on a kill.
    pub kill_score_multiplier: u64,

    /// Cosmetic delay between death and the game-over event.
    pub game_over_delay_ms: u64,
    /// Physics/spawn pause between boss defeat and the stage-clear event.
    pub victory_delay_ms: u64,
    /// Stage whose boss ends the game as cleared. `None` means stages never end.
    pub final_stage: Option<u32>,

    pub field: FieldConfig,
    pub boss: BossConfig,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Slots per inventory (weapons and magics each).
    pub const MAX_SLOTS: usize = 3;
    /// Upper bound of item damage and MP cost.
    pub const MAX_ITEM_STAT: u32 = 999;
    /// Upper bound of item uniqueness scores.
    pub const MAX_UNIQUENESS: u32 = 100;
    /// Obstacles further left than this are culled.
    pub const OFFSCREEN_X: f32 = -100.0;
    /// Nominal MP cost of a weapon generation request.
    pub const WEAPON_GENERATION_COST: u32 = 20;
    /// Nominal MP cost of a magic generation request.
    pub const MAGIC_GENERATION_COST: u32 = 30;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INITIAL_HP: u32 = 100;
    pub const DEFAULT_INITIAL_MP: u32 = 100;
    pub const DEFAULT_MP_REGEN_RATE: u32 = 2;
    pub const DEFAULT_BARE_HAND_DAMAGE: u32 = 5;
    pub const DEFAULT_MELEE_RECOVERY_MS: u64 = 400;
    pub const DEFAULT_HEAL_AMOUNT: u32 = 50;

    pub fn new() -> Self {
        Self {
            initial_hp: Self::DEFAULT_INITIAL_HP,
            initial_mp: Self::DEFAULT_INITIAL_MP,
            mp_regen_rate: Self::DEFAULT_MP_REGEN_RATE,
            mp_regen_interval_ms: 1_000,
            base_scroll_speed: 200.0,
            speed_increase_rate: 10.0,
            spawn_interval_ms: 1_500,
            min_spawn_interval_ms: 500,
            spawn_interval_step_ms: 100,
            difficulty_score_step: 500,
            bare_hand_damage: Self::DEFAULT_BARE_HAND_DAMAGE,
            melee_recovery_ms: Self::DEFAULT_MELEE_RECOVERY_MS,
            heal_amount: Self::DEFAULT_HEAL_AMOUNT,
            hitbox_lifetime_ms: 300,
            kill_score_multiplier: 10,
            game_over_delay_ms: 1_000,
            victory_delay_ms: 2_000,
            final_stage: None,
            field: FieldConfig::default(),
            boss: BossConfig::default(),
        }
    }

    /// Difficulty steps reached at the given score.
    pub fn difficulty_level(&self, score: u64) -> u64 {
        score / self.difficulty_score_step.max(1)
    }

    /// Scroll speed for the given score.
    pub fn scroll_speed(&self, score: u64) -> f32 {
        self.base_scroll_speed + self.difficulty_level(score) as f32 * self.speed_increase_rate
    }

    /// Spawn delay for the given score.
    pub fn spawn_delay_ms(&self, score: u64) -> u64 {
        let reduction = self
            .difficulty_level(score)
            .saturating_mul(self.spawn_interval_step_ms);
        self.spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Play-field geometry in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Horizontal position of the player.
    pub player_x: f32,
    /// Distance from the bottom edge to the player's center.
    pub player_elevation: f32,
}

impl FieldConfig {
    /// Vertical center of the player.
    pub fn player_y(&self) -> f32 {
        self.height - self.player_elevation
    }

    /// Lowest center a flyer may reach.
    pub fn ground_limit(&self) -> f32 {
        self.height - 40.0
    }

    /// Vertical center of ground archetypes.
    pub fn ground_y(&self) -> f32 {
        self.height - 56.0
    }

    /// Horizontal spawn position, just past the right edge.
    pub fn spawn_x(&self) -> f32 {
        self.width + 50.0
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            player_x: 100.0,
            player_elevation: 80.0,
        }
    }
}

/// Boss encounter tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BossConfig {
    pub enabled: bool,
    /// Seconds of play before the warning starts.
    pub spawn_time_sec: f32,
    pub warning_ms: u64,
    pub hp: u32,
    pub contact_damage: u32,
    /// Minimum time between two boss contact hits.
    pub contact_cooldown_ms: u64,
    /// Approach speed as a fraction of the scroll speed.
    pub speed_factor: f32,
    /// Fraction of the field width where the boss stops.
    pub stop_ratio: f32,
    pub attack_interval_ms: u64,
    pub telegraph_ms: u64,
    pub beam_travel_ms: u64,
    pub defeat_bonus: u64,
}

impl BossConfig {
    pub const DEFAULT_SPAWN_TIME_SEC: f32 = 20.0;

    /// Applies externally stored boss settings, keeping defaults for
    /// anything missing or invalid.
    pub fn with_settings(mut self, enabled: Option<bool>, spawn_time_sec: Option<f32>) -> Self {
        if let Some(enabled) = enabled {
            self.enabled = enabled;
        }
        if let Some(sec) = spawn_time_sec.filter(|sec| sec.is_finite() && *sec > 0.0) {
            self.spawn_time_sec = sec;
        }
        self
    }
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_time_sec: Self::DEFAULT_SPAWN_TIME_SEC,
            warning_ms: 1_500,
            hp: 150,
            contact_damage: 40,
            contact_cooldown_ms: 1_000,
            speed_factor: 0.5,
            stop_ratio: 0.65,
            attack_interval_ms: 3_500,
            telegraph_ms: 600,
            beam_travel_ms: 500,
            defeat_bonus: 1_500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_curves_follow_score_steps() {
        let config = GameConfig::default();

        assert_eq!(config.scroll_speed(0), 200.0);
        assert_eq!(config.scroll_speed(499), 200.0);
        assert_eq!(config.scroll_speed(1_000), 220.0);

        assert_eq!(config.spawn_delay_ms(0), 1_500);
        assert_eq!(config.spawn_delay_ms(500), 1_400);
        assert_eq!(config.spawn_delay_ms(50_000), 500);
    }

    #[test]
    fn boss_settings_ignore_invalid_time() {
        let boss = BossConfig::default().with_settings(Some(false), Some(-3.0));
        assert!(!boss.enabled);
        assert_eq!(boss.spawn_time_sec, BossConfig::DEFAULT_SPAWN_TIME_SEC);

        let boss = BossConfig::default().with_settings(None, Some(45.0));
        assert!(boss.enabled);
        assert_eq!(boss.spawn_time_sec, 45.0);
    }
}
