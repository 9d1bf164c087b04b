//! Combat items and their classification.
//!
//! Items only enter the simulation through [`validate::normalize`], so every
//! [`Item`] in an inventory satisfies the documented ranges. Fields are
//! private; the builder methods clamp like the validator does.

pub mod validate;

use crate::config::GameConfig;

pub use validate::{GenerationContext, has_name, normalize};

/// Combat behavior of an item.
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
pub enum ItemKind {
    /// Close-range physical attack, subject to the melee recovery window.
    Melee,
    /// Physical attack with reach; reusable, no recovery window.
    Ranged,
    /// Spell; consumed after one cast.
    Magic,
    /// Restores HP; consumed on use, creates no hitbox.
    Heal,
}

impl ItemKind {
    /// Inventory this kind is stored in.
    pub const fn category(self) -> ItemCategory {
        match self {
            Self::Melee | Self::Ranged => ItemCategory::Weapon,
            Self::Magic | Self::Heal => ItemCategory::Magic,
        }
    }

    /// Whether using the item removes it from the inventory.
    pub const fn is_single_use(self) -> bool {
        matches!(self, Self::Magic | Self::Heal)
    }
}

/// The two parallel inventories, also used as the active mode.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    #[default]
    Weapon,
    Magic,
}

impl ItemCategory {
    /// Nominal MP cost of generating an item of this category.
    pub const fn generation_cost(self) -> u32 {
        match self {
            Self::Weapon => GameConfig::WEAPON_GENERATION_COST,
            Self::Magic => GameConfig::MAGIC_GENERATION_COST,
        }
    }
}

/// Reach class of an attack.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RangeClass {
    #[default]
    Short,
    Medium,
    Long,
}

impl RangeClass {
    /// Hitbox reach in world units.
    pub const fn reach(self) -> f32 {
        match self {
            Self::Short => 100.0,
            Self::Medium => 300.0,
            Self::Long => 800.0,
        }
    }
}

/// Elemental flavor. Cosmetic for now; carried through to events.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Ice,
    Thunder,
    Wind,
    Earth,
    Light,
    Dark,
    #[default]
    #[strum(serialize = "none")]
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    Neutral,
}

/// Visual used by the presentation layer when the item is used.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackAnimation {
    #[default]
    Slash,
    SlashWide,
    Thrust,
    Projectile,
    Explosion,
    Beam,
}

impl AttackAnimation {
    /// Animation used when a payload does not name a usable one.
    pub const fn default_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Melee | ItemKind::Heal => Self::Slash,
            ItemKind::Ranged => Self::Projectile,
            ItemKind::Magic => Self::Explosion,
        }
    }
}

/// A validated weapon, spell or heal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "serde_json::Value", from = "serde_json::Value")
)]
pub struct Item {
    name: String,
    kind: ItemKind,
    damage: u32,
    mp_cost: u32,
    range: RangeClass,
    element: Element,
    sprite: String,
    color: String,
    animation: AttackAnimation,
    description: String,
    uniqueness: u32,
    image_ref: Option<String>,
}

impl Item {
    pub const DEFAULT_COLOR: &'static str = "#6B7280";
    pub const MAX_NAME_CHARS: usize = 40;
    pub const MAX_DESCRIPTION_CHARS: usize = 120;
    pub const MAX_SPRITE_CHARS: usize = 8;

    /// Creates an item with fallback stats for everything but name and kind.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        let mut item = validate::fallback(match kind.category() {
            ItemCategory::Weapon => GenerationContext::Weapon,
            ItemCategory::Magic => GenerationContext::Magic,
        });
        item.kind = kind;
        item.animation = AttackAnimation::default_for(kind);
        let name = validate::clean_text(&name.into(), Self::MAX_NAME_CHARS);
        if !name.is_empty() {
            item.name = name;
        }
        item
    }

    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage.min(GameConfig::MAX_ITEM_STAT);
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeClass) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        if validate::is_hex_color(color) {
            self.color = color.to_string();
        }
        self
    }

    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        let image_ref = image_ref.into();
        self.image_ref = (!image_ref.trim().is_empty()).then(|| image_ref.trim().to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn mp_cost(&self) -> u32 {
        self.mp_cost
    }

    pub fn range(&self) -> RangeClass {
        self.range
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn animation(&self) -> AttackAnimation {
        self.animation
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn uniqueness(&self) -> u32 {
        self.uniqueness
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Canonical external representation, accepted back by the validator.
    pub fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "weapon_name": self.name,
            "type": self.kind.as_ref(),
            "damage": self.damage,
            "mp_cost": self.mp_cost,
            "range": self.range.as_ref(),
            "element": self.element.as_ref(),
            "sprite_emoji": self.sprite,
            "color": self.color,
            "attack_animation": self.animation.as_ref(),
            "description": self.description,
            "uniqueness_score": self.uniqueness,
        });
        if let (Some(image), Some(map)) = (&self.image_ref, payload.as_object_mut()) {
            map.insert("image_url".into(), serde_json::Value::String(image.clone()));
        }
        payload
    }
}

impl From<Item> for serde_json::Value {
    fn from(item: Item) -> Self {
        item.to_payload()
    }
}

impl From<serde_json::Value> for Item {
    fn from(value: serde_json::Value) -> Self {
        normalize(&value, GenerationContext::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_route_to_categories() {
        assert_eq!(ItemKind::Melee.category(), ItemCategory::Weapon);
        assert_eq!(ItemKind::Ranged.category(), ItemCategory::Weapon);
        assert_eq!(ItemKind::Magic.category(), ItemCategory::Magic);
        assert_eq!(ItemKind::Heal.category(), ItemCategory::Magic);
        assert!(ItemKind::Heal.is_single_use());
        assert!(!ItemKind::Ranged.is_single_use());
    }

    #[test]
    fn reach_matches_range_class() {
        assert_eq!(RangeClass::Short.reach(), 100.0);
        assert_eq!(RangeClass::Medium.reach(), 300.0);
        assert_eq!(RangeClass::Long.reach(), 800.0);
    }

    #[test]
    fn builder_clamps_and_rejects_bad_colors() {
        let item = Item::new("Banana Boomerang", ItemKind::Ranged)
            .with_damage(5_000)
            .with_color("red");
        assert_eq!(item.damage(), GameConfig::MAX_ITEM_STAT);
        assert_eq!(item.color(), Item::DEFAULT_COLOR);
        assert_eq!(item.animation(), AttackAnimation::Projectile);
    }

    #[test]
    fn element_none_round_trips_through_strings() {
        assert_eq!(Element::Neutral.as_ref(), "none");
        assert_eq!("NONE".parse::<Element>(), Ok(Element::Neutral));
        assert_eq!(AttackAnimation::SlashWide.as_ref(), "slash_wide");
    }
}
