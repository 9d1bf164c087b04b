//! Scripted player used by the headless client.
//!
//! [`Autopilot::decide`] is a pure function of the latest session snapshot,
//! so its policy can be tested without a runtime.

use game_core::{GameConfig, ItemCategory, ItemKind, RunState, SessionSnapshot};
use runtime::GenerationRequest;

/// One thing the autopilot wants done this poll.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Attack,
    Select { category: ItemCategory, index: usize },
    Generate(GenerationRequest),
    ConfirmStage,
    Stop,
}

pub struct Autopilot {
    prompts: Vec<String>,
    next_prompt: usize,
    attack_interval_ms: u64,
    last_attack_ms: Option<u64>,
    heal_below_percent: u32,
}

impl Autopilot {
    pub const DEFAULT_ATTACK_INTERVAL_MS: u64 = 450;
    pub const DEFAULT_HEAL_BELOW_PERCENT: u32 = 40;

    pub fn new(prompts: Vec<String>) -> Self {
        Self {
            prompts,
            next_prompt: 0,
            attack_interval_ms: Self::DEFAULT_ATTACK_INTERVAL_MS,
            last_attack_ms: None,
            heal_below_percent: Self::DEFAULT_HEAL_BELOW_PERCENT,
        }
    }

    pub fn with_attack_interval(mut self, interval_ms: u64) -> Self {
        self.attack_interval_ms = interval_ms;
        self
    }

    pub fn decide(&mut self, snapshot: &SessionSnapshot) -> Vec<Decision> {
        match snapshot.state {
            RunState::Over => return vec![Decision::Stop],
            RunState::Cleared => {
                self.last_attack_ms = None;
                return vec![Decision::ConfirmStage];
            }
            RunState::Dying | RunState::Clearing => return Vec::new(),
            RunState::Playing => {}
        }

        let mut decisions = Vec::new();

        if let Some(index) = self.heal_slot(snapshot) {
            decisions.push(Decision::Select {
                category: ItemCategory::Magic,
                index,
            });
            decisions.push(Decision::Attack);
            self.last_attack_ms = Some(snapshot.clock_ms);
            return decisions;
        }

        if let Some(request) = self.next_request(snapshot) {
            decisions.push(Decision::Generate(request));
        }

        // Heals are saved for emergencies.
        let inventory = &snapshot.inventory;
        let holding_heal = inventory.active_mode == ItemCategory::Magic
            && inventory
                .active_magic
                .and_then(|index| inventory.magics.get(index))
                .is_some_and(|item| item.kind() == ItemKind::Heal);
        if holding_heal && !inventory.weapons.is_empty() {
            decisions.push(Decision::Select {
                category: ItemCategory::Weapon,
                index: inventory.active_weapon.unwrap_or(0),
            });
        }

        let ready = self
            .last_attack_ms
            .is_none_or(|last| snapshot.clock_ms >= last + self.attack_interval_ms);
        if ready && snapshot.obstacles > 0 && !(holding_heal && inventory.weapons.is_empty()) {
            decisions.push(Decision::Attack);
            self.last_attack_ms = Some(snapshot.clock_ms);
        }

        decisions
    }

    fn heal_slot(&self, snapshot: &SessionSnapshot) -> Option<usize> {
        if snapshot.hp * 100 >= snapshot.max_hp * self.heal_below_percent {
            return None;
        }
        snapshot
            .inventory
            .magics
            .iter()
            .position(|item| item.kind() == ItemKind::Heal)
    }

    fn next_request(&mut self, snapshot: &SessionSnapshot) -> Option<GenerationRequest> {
        if snapshot.charging.is_some() || self.prompts.is_empty() {
            return None;
        }
        let inventory = &snapshot.inventory;
        let category = if inventory.weapons.len() <= inventory.magics.len() {
            ItemCategory::Weapon
        } else {
            ItemCategory::Magic
        };
        let held = match category {
            ItemCategory::Weapon => inventory.weapons.len(),
            ItemCategory::Magic => inventory.magics.len(),
        };
        if held >= GameConfig::MAX_SLOTS || snapshot.mp < category.generation_cost() {
            return None;
        }

        let prompt = &self.prompts[self.next_prompt % self.prompts.len()];
        self.next_prompt += 1;
        Some(GenerationRequest::text(category, prompt.clone()))
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(
            [
                "rusty anchor",
                "frozen teapot",
                "angry thundercloud",
                "grandma's rolling pin",
                "glowing mushroom",
                "paper airplane",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameSession, Item};

    fn playing_snapshot() -> SessionSnapshot {
        GameSession::new(GameConfig::default(), 3).snapshot()
    }

    #[test]
    fn stops_when_run_is_over() {
        let mut snapshot = playing_snapshot();
        snapshot.state = RunState::Over;
        assert_eq!(Autopilot::default().decide(&snapshot), [Decision::Stop]);
    }

    #[test]
    fn confirms_cleared_stage() {
        let mut snapshot = playing_snapshot();
        snapshot.state = RunState::Cleared;
        assert_eq!(Autopilot::default().decide(&snapshot), [Decision::ConfirmStage]);
    }

    #[test]
    fn first_request_is_a_weapon_and_prompts_rotate() {
        let mut pilot = Autopilot::new(vec!["a".into(), "b".into()]);
        let snapshot = playing_snapshot();

        let first = pilot.decide(&snapshot);
        assert_eq!(
            first,
            [Decision::Generate(GenerationRequest::text(ItemCategory::Weapon, "a"))]
        );

        let mut with_weapon = snapshot.clone();
        with_weapon.inventory.weapons.push(Item::new("Axe", ItemKind::Melee));
        assert_eq!(
            pilot.decide(&with_weapon),
            [Decision::Generate(GenerationRequest::text(ItemCategory::Magic, "b"))]
        );
    }

    #[test]
    fn no_request_while_charging_or_short_on_mp() {
        let mut pilot = Autopilot::default();
        let mut snapshot = playing_snapshot();
        snapshot.charging = Some(ItemCategory::Weapon);
        assert!(pilot.decide(&snapshot).is_empty());

        snapshot.charging = None;
        snapshot.mp = 10;
        assert!(pilot.decide(&snapshot).is_empty());
    }

    #[test]
    fn attacks_on_cadence_when_obstacles_present() {
        let mut pilot = Autopilot::new(Vec::new()).with_attack_interval(400);
        let mut snapshot = playing_snapshot();
        snapshot.obstacles = 2;

        assert_eq!(pilot.decide(&snapshot), [Decision::Attack]);
        snapshot.clock_ms += 100;
        assert!(pilot.decide(&snapshot).is_empty());
        snapshot.clock_ms += 300;
        assert_eq!(pilot.decide(&snapshot), [Decision::Attack]);
    }

    #[test]
    fn heals_when_low() {
        let mut pilot = Autopilot::new(Vec::new());
        let mut snapshot = playing_snapshot();
        snapshot.hp = 30;
        snapshot.inventory.magics = vec![
            Item::new("Spark", ItemKind::Magic),
            Item::new("Mend", ItemKind::Heal),
        ];

        assert_eq!(
            pilot.decide(&snapshot),
            [
                Decision::Select {
                    category: ItemCategory::Magic,
                    index: 1
                },
                Decision::Attack
            ]
        );
    }

    #[test]
    fn switches_off_a_held_heal_when_healthy() {
        let mut pilot = Autopilot::new(Vec::new());
        let mut snapshot = playing_snapshot();
        snapshot.inventory.weapons = vec![Item::new("Axe", ItemKind::Melee)];
        snapshot.inventory.magics = vec![Item::new("Mend", ItemKind::Heal)];
        snapshot.inventory.active_weapon = Some(0);
        snapshot.inventory.active_magic = Some(0);
        snapshot.inventory.active_mode = ItemCategory::Magic;

        assert_eq!(
            pilot.decide(&snapshot),
            [Decision::Select {
                category: ItemCategory::Weapon,
                index: 0
            }]
        );
    }
}
