//! Asynchronous abstraction over the external item generator.
//!
//! Runtime users plug in [`ItemGenerator`] implementations so the simulation
//! can run against a remote model, an offline table, or test fixtures. The
//! generator returns the raw payload; the runtime validates it before it
//! reaches the arsenal.
use async_trait::async_trait;
use game_core::{GenerationContext, ItemCategory};
use serde_json::Value;

use super::errors::GenerationError;

/// What the player handed to the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationSource {
    /// Free-form description typed by the player.
    Text(String),
    /// Reference to a captured image (path, URL or data URI).
    Image(String),
}

/// A single request for a new weapon or spell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub category: ItemCategory,
    pub source: GenerationSource,
    /// MP charged up front.
    pub cost: u32,
}

impl GenerationRequest {
    /// Text request at the nominal cost for the category.
    pub fn text(category: ItemCategory, prompt: impl Into<String>) -> Self {
        Self {
            category,
            source: GenerationSource::Text(prompt.into()),
            cost: category.generation_cost(),
        }
    }

    /// Image request at the nominal cost for the category.
    pub fn image(category: ItemCategory, image_ref: impl Into<String>) -> Self {
        Self {
            category,
            source: GenerationSource::Image(image_ref.into()),
            cost: category.generation_cost(),
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Validation context for the payload this request produces.
    pub fn context(&self) -> GenerationContext {
        GenerationContext::from(self.category)
    }
}

/// Trait for turning a player request into a raw item payload.
///
/// Different implementations can handle:
/// - Remote language or vision models
/// - Offline deterministic tables
/// - Testing fixtures
#[async_trait]
pub trait ItemGenerator: Send + Sync {
    /// Produce a raw payload for the request.
    ///
    /// Payload shape is not trusted; anything that is not a usable item
    /// object degrades to the fallback item for the request's category.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError>;
}

/// Generator that always returns an empty payload, which validates to the
/// fallback item. Useful as a placeholder or in tests.
pub struct FallbackGenerator;

#[async_trait]
impl ItemGenerator for FallbackGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, GenerationError> {
        Ok(Value::Object(Default::default()))
    }
}
