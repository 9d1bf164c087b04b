//! Persisted arsenal loader.
//!
//! Saved items are stored as a JSON array of item payloads. Loading is
//! tolerant: an unreadable file, bytes that are not UTF-8, malformed JSON or
//! a non-list document all yield an empty arsenal. Individual entries go
//! through the item validator, and entries without a name are skipped.

use std::io::ErrorKind;
use std::path::Path;

use game_core::{GenerationContext, Item, has_name, normalize};
use serde_json::Value;
use tracing::warn;

use crate::loaders::LoadResult;

/// Loader for the persisted item list.
pub struct ArsenalLoader;

impl ArsenalLoader {
    /// Load saved items. A missing or corrupt file is an empty arsenal.
    pub fn load(path: &Path) -> LoadResult<Vec<Item>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(
                    target: "content::arsenal",
                    path = %path.display(),
                    error = %e,
                    "Saved arsenal unreadable, starting empty"
                );
                return Ok(Vec::new());
            }
        };
        match std::str::from_utf8(&bytes) {
            Ok(content) => Ok(Self::parse(content)),
            Err(e) => {
                warn!(
                    target: "content::arsenal",
                    path = %path.display(),
                    error = %e,
                    "Saved arsenal is not UTF-8, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Parses a saved list, ignoring anything that is not a list of named objects.
    pub fn parse(content: &str) -> Vec<Item> {
        let entries = match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!(target: "content::arsenal", "Saved arsenal is not a list, ignoring it");
                return Vec::new();
            }
            Err(e) => {
                warn!(target: "content::arsenal", error = %e, "Saved arsenal is malformed, ignoring it");
                return Vec::new();
            }
        };
        entries
            .iter()
            .filter(|entry| entry.is_object() && has_name(entry))
            .map(|entry| normalize(entry, GenerationContext::Any))
            .collect()
    }

    /// Writes items in their canonical payload shape, creating parent directories.
    pub fn save(path: &Path, items: &[Item]) -> LoadResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }
        let payloads: Vec<Value> = items.iter().map(Item::to_payload).collect();
        let content = serde_json::to_string_pretty(&payloads)?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
    }
}
