//! Player HP/MP and the generation charge gate.

use crate::config::GameConfig;
use crate::item::ItemCategory;

/// Integer resource bounded by `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Adds up to the maximum and returns the amount actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current - before
    }

    /// Subtracts down to zero and returns the amount actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.maximum);
    }
}

/// Result of asking to charge a generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// MP deducted; the item will arrive later.
    Charging { category: ItemCategory, cost: u32 },
    /// Not enough MP; nothing changed.
    InsufficientMp { required: u32, available: u32 },
    /// A request is already in flight; nothing changed.
    AlreadyCharging,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: ResourceMeter,
    pub mp: ResourceMeter,
    charging: Option<ItemCategory>,
}

impl Vitals {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            hp: ResourceMeter::full(config.initial_hp),
            mp: ResourceMeter::full(config.initial_mp),
            charging: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    pub fn charging(&self) -> Option<ItemCategory> {
        self.charging
    }

    /// Regeneration tick. Returns `true` when MP changed.
    pub fn regenerate(&mut self, rate: u32) -> bool {
        self.is_alive() && self.mp.restore(rate) > 0
    }

    /// Deducts `cost` up front when affordable and locks further requests.
    pub fn request_generation(&mut self, category: ItemCategory, cost: u32) -> ChargeOutcome {
        if self.charging.is_some() {
            return ChargeOutcome::AlreadyCharging;
        }
        if self.mp.current < cost {
            return ChargeOutcome::InsufficientMp {
                required: cost,
                available: self.mp.current,
            };
        }
        self.mp.drain(cost);
        self.charging = Some(category);
        ChargeOutcome::Charging { category, cost }
    }

    /// Releases the charge lock. MP spent on the request is not refunded.
    pub fn finish_generation(&mut self) -> Option<ItemCategory> {
        self.charging.take()
    }

    /// Applies contact damage and returns the remaining HP.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp.drain(amount);
        self.hp.current
    }

    /// Heals up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.hp.restore(amount)
    }

    /// Boss beam: the first hit of an encounter leaves 1 HP, later hits kill.
    pub fn beam_hit(&mut self, prior_hits: u32) -> u32 {
        let target = if prior_hits == 0 { 1 } else { 0 };
        self.hp.set(self.hp.current.min(target));
        self.hp.current
    }
}
