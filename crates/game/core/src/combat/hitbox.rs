use crate::config::FieldConfig;
use crate::field::{Bounds, ObstacleField, ObstacleId};

/// Height of every attack hitbox.
const HITBOX_HEIGHT: f32 = 100.0;

/// Invisible overlap region in front of the player.
///
/// Each obstacle takes damage from a hitbox at most once.
#[derive(Clone, Debug, PartialEq)]
pub struct Hitbox {
    pub bounds: Bounds,
    pub damage: u32,
    pub expires_at: u64,
    struck: Vec<ObstacleId>,
}

impl Hitbox {
    /// Hitbox of width `reach` starting at the player and centered on its row.
    pub fn in_front_of_player(
        field: &FieldConfig,
        reach: f32,
        damage: u32,
        now: u64,
        lifetime_ms: u64,
    ) -> Self {
        Self {
            bounds: Bounds::from_center(
                field.player_x + reach / 2.0,
                field.player_y(),
                reach,
                HITBOX_HEIGHT,
            ),
            damage,
            expires_at: now + lifetime_ms,
            struck: Vec::new(),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// One application of hitbox damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub id: ObstacleId,
    pub pre_hit_hp: u32,
    pub remaining_hp: u32,
    pub is_boss: bool,
}

impl Hit {
    pub fn killed(&self) -> bool {
        self.remaining_hp == 0
    }
}

/// Drops expired hitboxes, then damages every live obstacle each remaining
/// hitbox overlaps for the first time.
///
/// Killed obstacles stay in the field; the caller removes them and awards
/// points.
pub fn apply_hitboxes(hitboxes: &mut Vec<Hitbox>, field: &mut ObstacleField, now: u64) -> Vec<Hit> {
    hitboxes.retain(|hitbox| !hitbox.is_expired(now));

    let mut hits = Vec::new();
    for hitbox in hitboxes.iter_mut() {
        for id in field.overlapping(&hitbox.bounds) {
            if hitbox.struck.contains(&id) {
                continue;
            }
            let Some(obstacle) = field.get_mut(id) else {
                continue;
            };
            if obstacle.is_dead() {
                continue;
            }
            hitbox.struck.push(id);
            let pre_hit_hp = obstacle.take_damage(hitbox.damage);
            hits.push(Hit {
                id,
                pre_hit_hp,
                remaining_hp: obstacle.hp,
                is_boss: obstacle.is_boss(),
            });
        }
    }
    hits
}
