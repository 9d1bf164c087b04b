//! Content factory for loading everything a session needs from one directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, Item};

use crate::loaders::{ArsenalLoader, ConfigLoader, LoadResult};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── arsenal.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load `config.toml`, falling back to the bundled config when absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            ConfigLoader::bundled()
        }
    }

    pub fn arsenal_path(&self) -> PathBuf {
        self.data_dir.join("arsenal.json")
    }

    pub fn load_arsenal(&self) -> LoadResult<Vec<Item>> {
        ArsenalLoader::load(&self.arsenal_path())
    }

    pub fn save_arsenal(&self, items: &[Item]) -> LoadResult<()> {
        ArsenalLoader::save(&self.arsenal_path(), items)
    }
}
