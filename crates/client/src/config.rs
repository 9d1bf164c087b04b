//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::GameConfig;
use runtime::RuntimeConfig;

/// Settings for one headless session.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// TOML tuning file; the data directory's `config.toml` or the bundled
    /// defaults are used when absent.
    pub config_path: Option<PathBuf>,
    /// Persisted arsenal; defaults to `arsenal.json` in the data directory.
    pub save_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub boss_enabled: Option<bool>,
    pub boss_time_sec: Option<f32>,
    pub session_id: Option<String>,
    /// Wall-clock limit for the autopilot.
    pub max_seconds: u64,
    /// Stage whose boss ends the game as cleared (0 = endless).
    pub stages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            save_file: None,
            seed: None,
            boss_enabled: None,
            boss_time_sec: None,
            session_id: None,
            max_seconds: Self::DEFAULT_MAX_SECONDS,
            stages: Self::DEFAULT_STAGES,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_MAX_SECONDS: u64 = 120;
    pub const DEFAULT_STAGES: u32 = 2;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARSENAL_CONFIG` - Path to a TOML tuning file
    /// - `ARSENAL_SAVE_FILE` - Path of the persisted arsenal JSON
    /// - `ARSENAL_SEED` - Obstacle roller seed (default: time based)
    /// - `ARSENAL_BOSS_ENABLED` - Enable the boss encounter (default: true)
    /// - `ARSENAL_BOSS_TIME_SEC` - Seconds before the boss warning (default: 20)
    /// - `ARSENAL_SESSION_ID` - Session identifier for logs (default: auto-generated)
    /// - `ARSENAL_MAX_SECONDS` - Autopilot time limit (default: 120)
    /// - `ARSENAL_STAGES` - Final stage, 0 for endless (default: 2)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reading from an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.config_path = read("ARSENAL_CONFIG").map(PathBuf::from);
        config.save_file = read("ARSENAL_SAVE_FILE").map(PathBuf::from);
        config.seed = parse(read("ARSENAL_SEED"));
        config.boss_enabled = read("ARSENAL_BOSS_ENABLED").and_then(|value| parse_flag(&value));
        config.boss_time_sec = parse(read("ARSENAL_BOSS_TIME_SEC"));
        config.session_id = read("ARSENAL_SESSION_ID");

        if let Some(seconds) = parse::<u64>(read("ARSENAL_MAX_SECONDS")) {
            config.max_seconds = seconds.max(1);
        }
        if let Some(stages) = parse(read("ARSENAL_STAGES")) {
            config.stages = stages;
        }

        config
    }

    /// Applies the environment overrides on top of loaded tuning.
    pub fn apply(&self, mut game_config: GameConfig) -> GameConfig {
        game_config.boss =
            std::mem::take(&mut game_config.boss).with_settings(self.boss_enabled, self.boss_time_sec);
        game_config.final_stage = (self.stages > 0).then_some(self.stages);
        game_config
    }

    pub fn runtime_config(&self, game_config: GameConfig, fallback_seed: u64) -> RuntimeConfig {
        RuntimeConfig {
            game_config: self.apply(game_config),
            seed: self.seed.unwrap_or(fallback_seed),
            ..RuntimeConfig::default()
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.max_seconds)
    }
}

fn parse<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value?.trim().parse().ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
