//! Trust boundary between the external item generator and the simulation.
//!
//! Generated payloads have drifted through many shapes (renamed keys,
//! numbers as strings, wrapper objects). Each logical field is looked up
//! through a list of accepted key aliases, coerced, clamped, and replaced by
//! a typed fallback when unusable. [`normalize`] never fails.

use serde_json::{Map, Value};

use super::{AttackAnimation, Element, Item, ItemKind, RangeClass};
use crate::config::GameConfig;

const NAME_KEYS: &[&str] = &["weapon_name", "name", "item_name", "magic_name", "title"];
const KIND_KEYS: &[&str] = &["type", "kind", "weapon_type", "item_type", "category"];
const DAMAGE_KEYS: &[&str] = &["damage", "power", "attack", "dmg"];
const MP_COST_KEYS: &[&str] = &["mp_cost", "mpCost", "cost", "mana_cost"];
const RANGE_KEYS: &[&str] = &["range", "reach"];
const ELEMENT_KEYS: &[&str] = &["element", "attribute"];
const SPRITE_KEYS: &[&str] = &["sprite_emoji", "emoji", "sprite", "icon"];
const COLOR_KEYS: &[&str] = &["color", "colour", "hex_color"];
const ANIMATION_KEYS: &[&str] = &["attack_animation", "animation", "animation_kind"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "flavor_text"];
const UNIQUENESS_KEYS: &[&str] = &["uniqueness_score", "uniqueness", "originality"];
const IMAGE_KEYS: &[&str] = &["image_url", "imageUrl", "image", "image_ref"];

/// Objects some generator revisions wrapped the item in.
const WRAPPER_KEYS: &[&str] = &["weapon", "item", "magic", "data"];

const FALLBACK_DAMAGE: u32 = 20;
const FALLBACK_MP_COST: u32 = 8;
const FALLBACK_UNIQUENESS: u32 = 30;

/// Which kinds a generation request may yield.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GenerationContext {
    /// Weapon request: melee or ranged.
    Weapon,
    /// Magic request: magic or heal.
    Magic,
    /// Persisted or already-classified items: any kind.
    #[default]
    Any,
}

impl GenerationContext {
    pub const fn allows(self, kind: ItemKind) -> bool {
        match self {
            Self::Weapon => matches!(kind, ItemKind::Melee | ItemKind::Ranged),
            Self::Magic => matches!(kind, ItemKind::Magic | ItemKind::Heal),
            Self::Any => true,
        }
    }

    pub const fn default_kind(self) -> ItemKind {
        match self {
            Self::Weapon | Self::Any => ItemKind::Melee,
            Self::Magic => ItemKind::Magic,
        }
    }

    const fn fallback_name(self) -> &'static str {
        match self {
            Self::Weapon | Self::Any => "Mysterious Snapshot",
            Self::Magic => "Mysterious Spell",
        }
    }

    const fn fallback_sprite(self) -> &'static str {
        match self {
            Self::Weapon | Self::Any => "📷",
            Self::Magic => "✨",
        }
    }
}

impl From<super::ItemCategory> for GenerationContext {
    fn from(category: super::ItemCategory) -> Self {
        match category {
            super::ItemCategory::Weapon => Self::Weapon,
            super::ItemCategory::Magic => Self::Magic,
        }
    }
}

/// Normalizes an untrusted payload into an [`Item`].
pub fn normalize(raw: &Value, context: GenerationContext) -> Item {
    let Some(fields) = item_object(raw) else {
        return fallback(context);
    };
    let base = fallback(context);

    let kind = lookup(fields, KIND_KEYS)
        .and_then(as_text)
        .and_then(|text| text.trim().parse::<ItemKind>().ok())
        .filter(|kind| context.allows(*kind))
        .unwrap_or(base.kind);

    let name = lookup(fields, NAME_KEYS)
        .and_then(as_text)
        .map(|text| clean_text(text, Item::MAX_NAME_CHARS))
        .filter(|text| !text.is_empty())
        .unwrap_or(base.name);

    let sprite = lookup(fields, SPRITE_KEYS)
        .and_then(as_text)
        .map(|text| clean_text(text, Item::MAX_SPRITE_CHARS))
        .filter(|text| !text.is_empty())
        .unwrap_or(base.sprite);

    let description = lookup(fields, DESCRIPTION_KEYS)
        .and_then(as_text)
        .map(|text| clean_text(text, Item::MAX_DESCRIPTION_CHARS))
        .unwrap_or(base.description);

    let color = lookup(fields, COLOR_KEYS)
        .and_then(as_text)
        .map(str::trim)
        .filter(|text| is_hex_color(text))
        .map(str::to_string)
        .unwrap_or(base.color);

    let image_ref = lookup(fields, IMAGE_KEYS)
        .and_then(as_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Item {
        name,
        kind,
        damage: lookup(fields, DAMAGE_KEYS)
            .and_then(as_integer)
            .map(|n| clamp(n, GameConfig::MAX_ITEM_STAT))
            .unwrap_or(base.damage),
        mp_cost: lookup(fields, MP_COST_KEYS)
            .and_then(as_integer)
            .map(|n| clamp(n, GameConfig::MAX_ITEM_STAT))
            .unwrap_or(base.mp_cost),
        range: parse_enum(fields, RANGE_KEYS).unwrap_or(base.range),
        element: parse_enum(fields, ELEMENT_KEYS).unwrap_or(base.element),
        sprite,
        color,
        animation: parse_enum(fields, ANIMATION_KEYS)
            .unwrap_or_else(|| AttackAnimation::default_for(kind)),
        description,
        uniqueness: lookup(fields, UNIQUENESS_KEYS)
            .and_then(as_integer)
            .map(|n| clamp(n, GameConfig::MAX_UNIQUENESS))
            .unwrap_or(base.uniqueness),
        image_ref,
    }
}

/// True when the payload carries a non-blank name under any accepted key.
///
/// Persisted lists use this to skip entries that were never real items.
pub fn has_name(raw: &Value) -> bool {
    item_object(raw)
        .and_then(|fields| lookup(fields, NAME_KEYS))
        .and_then(as_text)
        .is_some_and(|text| !text.trim().is_empty())
}

/// Item produced when a payload is unusable as a whole.
pub(crate) fn fallback(context: GenerationContext) -> Item {
    let kind = context.default_kind();
    Item {
        name: context.fallback_name().to_string(),
        kind,
        damage: FALLBACK_DAMAGE,
        mp_cost: FALLBACK_MP_COST,
        range: RangeClass::Short,
        element: Element::Neutral,
        sprite: context.fallback_sprite().to_string(),
        color: Item::DEFAULT_COLOR.to_string(),
        animation: AttackAnimation::default_for(kind),
        description: String::new(),
        uniqueness: FALLBACK_UNIQUENESS,
        image_ref: None,
    }
}

/// `^#[0-9A-Fa-f]{6}$`
pub(crate) fn is_hex_color(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// Trims and truncates to `max_chars` characters.
pub(crate) fn clean_text(text: &str, max_chars: usize) -> String {
    let truncated: String = text.trim().chars().take(max_chars).collect();
    truncated.trim_end().to_string()
}

fn item_object(raw: &Value) -> Option<&Map<String, Value>> {
    let root = raw.as_object()?;
    if lookup(root, NAME_KEYS).is_some() {
        return Some(root);
    }
    WRAPPER_KEYS
        .iter()
        .find_map(|key| root.get(*key).and_then(Value::as_object))
        .or(Some(root))
}

fn lookup<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

fn as_integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_i64().map(|n| n as f64).or_else(|| n.as_f64())?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then(|| number.round() as i64)
}

fn clamp(value: i64, max: u32) -> u32 {
    value.clamp(0, i64::from(max)) as u32
}

fn parse_enum<T: core::str::FromStr>(fields: &Map<String, Value>, aliases: &[&str]) -> Option<T> {
    lookup(fields, aliases)
        .and_then(as_text)
        .and_then(|text| text.trim().parse().ok())
}
