//! Deterministic item generator that needs no network.
//!
//! The same prompt always yields the same payload, so sessions replay. The
//! payloads use the loose key names the remote generators produced, which
//! keeps the validator's alias handling exercised.

use std::time::Duration;

use async_trait::async_trait;
use game_core::ItemCategory;
use runtime::{GenerationError, GenerationRequest, GenerationSource, ItemGenerator};
use serde_json::{Value, json};

const ELEMENTS: &[&str] = &["fire", "ice", "thunder", "wind", "earth", "none"];
const COLORS: &[&str] = &["#EF4444", "#3B82F6", "#FACC15", "#10B981", "#A855F7"];
const WEAPON_SUFFIXES: &[&str] = &["Blade", "Hammer", "Launcher", "Bow"];
const MAGIC_SUFFIXES: &[&str] = &["Nova", "Hex", "Bloom", "Ward"];
const WEAPON_SPRITES: &[&str] = &["🗡️", "🔨", "🏹", "🪃"];
const MAGIC_SPRITES: &[&str] = &["🔥", "❄️", "⚡", "💚"];

/// Offline stand-in for the remote item generator.
pub struct OfflineGenerator {
    latency: Duration,
}

impl OfflineGenerator {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

    pub fn new() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Simulated round-trip time before the payload is returned.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Payload for `request`, without the simulated latency.
    pub fn payload_for(request: &GenerationRequest) -> Value {
        let (seed_text, title) = match &request.source {
            GenerationSource::Text(prompt) => (prompt.as_str(), title_case(prompt)),
            GenerationSource::Image(reference) => (reference.as_str(), String::from("Snapshot")),
        };
        let seed = fnv1a(seed_text.as_bytes()) ^ (request.category as u64);
        let pick = |table: &[&'static str], salt: u64| table[((seed >> salt) % table.len() as u64) as usize];

        match request.category {
            ItemCategory::Weapon => {
                let ranged = seed % 3 == 0;
                json!({
                    "weapon_name": format!("{} {}", title, pick(WEAPON_SUFFIXES, 4)),
                    "weapon_type": if ranged { "ranged" } else { "melee" },
                    "damage": 10 + seed % 40,
                    "mpCost": 5 + (seed >> 8) % 15,
                    "range": if ranged { "long" } else { "short" },
                    "element": pick(ELEMENTS, 12),
                    "emoji": pick(WEAPON_SPRITES, 16),
                    "color": pick(COLORS, 20),
                    "animation": if ranged { "projectile" } else { "slash" },
                    "description": format!("Forged from \"{}\".", seed_text),
                    "uniqueness_score": 20 + (seed >> 24) % 80,
                })
            }
            ItemCategory::Magic => {
                let heal = seed % 4 == 0;
                json!({
                    "magic": {
                        "name": format!("{} {}", title, pick(MAGIC_SUFFIXES, 4)),
                        "type": if heal { "heal" } else { "magic" },
                        "power": 15 + seed % 45,
                        "cost": 10 + (seed >> 8) % 20,
                        "range": "medium",
                        "element": if heal { "none" } else { pick(ELEMENTS, 12) },
                        "sprite": pick(MAGIC_SPRITES, 16),
                        "color": pick(COLORS, 20),
                        "animation": if heal { "slash" } else { "beam" },
                        "uniqueness": 20 + (seed >> 24) % 80,
                    }
                })
            }
        }
    }
}

impl Default for OfflineGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemGenerator for OfflineGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        if let GenerationSource::Text(prompt) = &request.source
            && prompt.trim().is_empty()
        {
            return Err(GenerationError::Rejected("empty prompt".into()));
        }
        tokio::time::sleep(self.latency).await;
        Ok(Self::payload_for(request))
    }
}

fn title_case(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .take(2)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
