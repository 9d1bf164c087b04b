use crate::config::GameConfig;
use crate::inventory::Arsenal;
use crate::item::{AttackAnimation, ItemCategory, ItemKind, RangeClass};

/// A damaging attack ready to become a hitbox.
#[derive(Clone, Debug, PartialEq)]
pub struct Strike {
    /// Name of the item used; `None` for bare hand.
    pub item: Option<String>,
    pub damage: u32,
    pub reach: f32,
    pub animation: AttackAnimation,
    /// Melee strikes start the recovery window.
    pub melee: bool,
    /// Slot to consume after the strike (single-use magic).
    pub consume: Option<(ItemCategory, usize)>,
}

/// What an attack intent resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum AttackOutcome {
    /// Melee recovery still running; the intent is dropped.
    Recovering { ready_at: u64 },
    /// Heal item: restore HP and consume the slot. No hitbox.
    Heal {
        item: String,
        amount: u32,
        slot: usize,
        animation: AttackAnimation,
    },
    Strike(Strike),
}

/// Resolves the current item (or bare hand) into an outcome.
pub fn resolve_attack(
    arsenal: &Arsenal,
    last_melee_at: Option<u64>,
    now: u64,
    config: &GameConfig,
) -> AttackOutcome {
    let current = arsenal.current();
    let melee = current.is_none_or(|(_, item)| item.kind() == ItemKind::Melee);

    if melee && let Some(last) = last_melee_at {
        let ready_at = last + config.melee_recovery_ms;
        if now < ready_at {
            return AttackOutcome::Recovering { ready_at };
        }
    }

    let Some((slot, item)) = current else {
        return AttackOutcome::Strike(Strike {
            item: None,
            damage: config.bare_hand_damage,
            reach: RangeClass::Short.reach(),
            animation: AttackAnimation::Slash,
            melee: true,
            consume: None,
        });
    };

    if item.kind() == ItemKind::Heal {
        return AttackOutcome::Heal {
            item: item.name().to_string(),
            amount: config.heal_amount,
            slot,
            animation: item.animation(),
        };
    }

    AttackOutcome::Strike(Strike {
        item: Some(item.name().to_string()),
        damage: item.damage(),
        reach: item.range().reach(),
        animation: item.animation(),
        melee,
        consume: item.kind().is_single_use().then_some((item.category(), slot)),
    })
}

/// Points for killing an obstacle that had `pre_hit_hp` before the lethal hit.
pub fn kill_score(pre_hit_hp: u32, multiplier: u64) -> u64 {
    u64::from(pre_hit_hp) * multiplier
}
