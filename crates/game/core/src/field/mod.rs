//! Scrolling obstacle field.
//!
//! Obstacles are spawned just past the right edge, move left every frame
//! according to their [`MovementPattern`], and leave the field either by
//! losing all HP or by scrolling past [`GameConfig::OFFSCREEN_X`].
//!
//! The field only moves and stores obstacles. Damage, score and events are
//! applied by the session and the combat resolver.

mod archetype;
pub mod rng;

pub use archetype::{Archetype, MovementPattern};
pub use rng::SpawnRng;

use crate::config::{FieldConfig, GameConfig};

/// Axis-aligned bounding box in world units.
///
/// `y` grows downward, matching the field layout in [`FieldConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Box of the given size centered on `(x, y)`.
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x - width / 2.0,
            min_y: y - height / 2.0,
            max_x: x + width / 2.0,
            max_y: y + height / 2.0,
        }
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Difficulty derived from the current score.
///
/// Recomputed every frame; the session only reacts when `level` changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    /// Score step the run has reached, starting at 0.
    pub level: u64,
    /// Leftward speed of newly spawned obstacles, in units per second.
    pub scroll_speed: f32,
    /// Delay between two regular spawns.
    pub spawn_delay_ms: u64,
}

impl Difficulty {
    /// Difficulty for a score in whole points.
    pub fn at(config: &GameConfig, score: u64) -> Self {
        Self {
            level: config.difficulty_level(score),
            scroll_speed: config.scroll_speed(score),
            spawn_delay_ms: config.spawn_delay_ms(score),
        }
    }
}

/// Identifier of an obstacle, unique within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleId(pub u32);

impl core::fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Regular archetype or the stage boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleKind {
    Regular(Archetype),
    Boss,
}

impl ObstacleKind {
    /// Collision box of the boss `(width, height)`.
    pub const BOSS_SIZE: (f32, f32) = (96.0, 96.0);

    /// Collision box `(width, height)`.
    pub const fn size(self) -> (f32, f32) {
        match self {
            Self::Regular(archetype) => archetype.size(),
            Self::Boss => Self::BOSS_SIZE,
        }
    }
}

/// Everything needed to place an obstacle on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    /// Center position.
    pub x: f32,
    pub y: f32,
    /// Starting and maximum hit points.
    pub hp: u32,
    /// HP the player loses on touching it.
    pub contact_damage: u32,
    /// Leftward speed in units per second.
    pub speed: f32,
    pub pattern: MovementPattern,
}

impl ObstacleSpec {
    /// Archetype defaults at the spawn point for the given scroll speed.
    pub fn archetype(archetype: Archetype, field: &FieldConfig, scroll_speed: f32) -> Self {
        Self {
            kind: ObstacleKind::Regular(archetype),
            x: field.spawn_x(),
            y: archetype.spawn_y(field),
            hp: archetype.hp(),
            contact_damage: archetype.contact_damage(),
            speed: scroll_speed * archetype.speed_factor(),
            pattern: archetype.pattern(),
        }
    }

    /// Moves the spawn point.
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Overrides the archetype's hit points.
    #[must_use]
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    /// Overrides the archetype's contact damage.
    #[must_use]
    pub fn with_contact_damage(mut self, contact_damage: u32) -> Self {
        self.contact_damage = contact_damage;
        self
    }
}

/// An obstacle on the field.
///
/// Dead obstacles (`hp == 0`) stay in place until the session removes them,
/// so a kill is scored exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub contact_damage: u32,
    pub speed: f32,
    pub pattern: MovementPattern,
}

impl Obstacle {
    /// True for the stage boss, which contact never removes.
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, ObstacleKind::Boss)
    }

    /// True once HP reached zero.
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Current collision box.
    pub fn bounds(&self) -> Bounds {
        let (width, height) = self.kind.size();
        Bounds::from_center(self.x, self.y, width, height)
    }

    /// Applies damage and returns the HP the obstacle had before the hit.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before
    }

    fn advance(&mut self, dt_ms: u64, now_ms: u64, field: &FieldConfig) {
        let dt = dt_ms as f32 / 1_000.0;
        let (vx, vy) = self.pattern.velocity(self.speed, now_ms);
        self.x += vx * dt;
        if vy != 0.0 {
            self.y = (self.y + vy * dt).min(field.ground_limit());
        }
    }
}

/// Obstacles currently on the field, in spawn order.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleField {
    /// Empty field; ids start at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the next archetype drawn from the stage's spawn stream.
    pub fn spawn_random(
        &mut self,
        rng: &mut SpawnRng,
        field: &FieldConfig,
        scroll_speed: f32,
    ) -> &Obstacle {
        let archetype = Archetype::roll(rng);
        self.spawn(ObstacleSpec::archetype(archetype, field, scroll_speed))
    }

    /// Places an obstacle with full HP.
    pub fn spawn(&mut self, spec: ObstacleSpec) -> &Obstacle {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            kind: spec.kind,
            x: spec.x,
            y: spec.y,
            hp: spec.hp,
            max_hp: spec.hp,
            contact_damage: spec.contact_damage,
            speed: spec.speed,
            pattern: spec.pattern,
        });
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Moves every obstacle by one frame.
    pub fn advance(&mut self, dt_ms: u64, now_ms: u64, field: &FieldConfig) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt_ms, now_ms, field);
        }
    }

    /// Removes obstacles past the left edge and returns their ids.
    pub fn cull_offscreen(&mut self) -> Vec<ObstacleId> {
        let mut culled = Vec::new();
        self.obstacles.retain(|obstacle| {
            let keep = obstacle.x >= GameConfig::OFFSCREEN_X;
            if !keep {
                culled.push(obstacle.id);
            }
            keep
        });
        culled
    }

    /// Takes an obstacle off the field.
    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(index))
    }

    /// Looks up a live or dead obstacle by id.
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Mutable lookup, used to apply damage and stop the boss.
    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }

    /// The boss, while it is on the field.
    pub fn boss(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.is_boss())
    }

    /// Obstacles in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Ids of obstacles overlapping `bounds`, in spawn order.
    pub fn overlapping(&self, bounds: &Bounds) -> Vec<ObstacleId> {
        self.obstacles
            .iter()
            .filter(|o| o.bounds().overlaps(bounds))
            .map(|o| o.id)
            .collect()
    }

    /// Number of obstacles, dead ones included.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True when nothing is on the field.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Empties the field and restarts ids at 0.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
