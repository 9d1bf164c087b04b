use super::rng::SpawnRng;
use crate::config::FieldConfig;

/// Fixed obstacle kinds with their stats and spawn weights.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    CactusSmall,
    CactusLarge,
    Pteranodon,
    DinoUpdown,
    DinoLeftright,
}

impl Archetype {
    /// Spawn weight in percent. The weights sum to 100.
    pub const fn weight(self) -> u32 {
        match self {
            Self::CactusSmall => 40,
            Self::CactusLarge => 20,
            Self::Pteranodon => 15,
            Self::DinoUpdown => 13,
            Self::DinoLeftright => 12,
        }
    }

    /// Every archetype with its spawn weight, in declaration order.
    pub const SPAWN_TABLE: [(Self, u32); 5] = [
        (Self::CactusSmall, Self::CactusSmall.weight()),
        (Self::CactusLarge, Self::CactusLarge.weight()),
        (Self::Pteranodon, Self::Pteranodon.weight()),
        (Self::DinoUpdown, Self::DinoUpdown.weight()),
        (Self::DinoLeftright, Self::DinoLeftright.weight()),
    ];

    /// Draws the next archetype from a stage's spawn stream.
    pub fn roll(rng: &mut SpawnRng) -> Self {
        rng.pick_weighted(&Self::SPAWN_TABLE)
            .unwrap_or(Self::CactusSmall)
    }

    /// Base hit points.
    pub const fn hp(self) -> u32 {
        match self {
            Self::CactusSmall => 10,
            Self::CactusLarge => 20,
            Self::Pteranodon => 15,
            Self::DinoUpdown => 25,
            Self::DinoLeftright => 30,
        }
    }

    /// HP the player loses on touching it.
    pub const fn contact_damage(self) -> u32 {
        match self {
            Self::CactusSmall => 10,
            Self::CactusLarge | Self::DinoUpdown => 20,
            Self::Pteranodon => 15,
            Self::DinoLeftright => 25,
        }
    }

    /// Multiplier applied to the scroll speed at spawn time.
    pub const fn speed_factor(self) -> f32 {
        match self {
            Self::CactusSmall | Self::CactusLarge | Self::DinoLeftright => 1.0,
            Self::Pteranodon => 1.5,
            Self::DinoUpdown => 1.2,
        }
    }

    /// Collision box `(width, height)`.
    pub const fn size(self) -> (f32, f32) {
        match self {
            Self::CactusSmall => (24.0, 40.0),
            Self::CactusLarge => (32.0, 64.0),
            Self::Pteranodon => (48.0, 32.0),
            Self::DinoUpdown | Self::DinoLeftright => (48.0, 48.0),
        }
    }

    /// Vertical center at spawn. Flyers start above the ground row.
    pub fn spawn_y(self, field: &FieldConfig) -> f32 {
        match self {
            Self::Pteranodon => field.height - 120.0,
            Self::DinoUpdown => field.height - 150.0,
            Self::CactusSmall | Self::CactusLarge | Self::DinoLeftright => field.ground_y(),
        }
    }

    /// Movement applied on top of the leftward scroll.
    pub const fn pattern(self) -> MovementPattern {
        match self {
            Self::CactusSmall | Self::CactusLarge | Self::Pteranodon => MovementPattern::Linear,
            Self::DinoUpdown => MovementPattern::SineVertical {
                amplitude: 150.0,
                period_ms: 200.0,
            },
            Self::DinoLeftright => MovementPattern::SineHorizontal {
                amplitude: 150.0,
                period_ms: 150.0,
            },
        }
    }
}

/// How an obstacle moves each frame on top of its leftward speed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPattern {
    /// Constant leftward speed.
    Linear,
    /// Vertical velocity `sin(t / period_ms) * amplitude`, never below ground.
    SineVertical { amplitude: f32, period_ms: f32 },
    /// Horizontal velocity `-speed + sin(t / period_ms) * amplitude`.
    SineHorizontal { amplitude: f32, period_ms: f32 },
}

impl MovementPattern {
    /// Velocity `(vx, vy)` in units per second at session time `now_ms`.
    pub fn velocity(self, speed: f32, now_ms: u64) -> (f32, f32) {
        let t = now_ms as f32;
        match self {
            Self::Linear => (-speed, 0.0),
            Self::SineVertical {
                amplitude,
                period_ms,
            } => (-speed, (t / period_ms).sin() * amplitude),
            Self::SineHorizontal {
                amplitude,
                period_ms,
            } => (-speed + (t / period_ms).sin() * amplitude, 0.0),
        }
    }
}
