//! Platform-specific directory utilities

use std::path::PathBuf;

const APP_NAME: &str = "arsenal";

/// Platform cache directory for session logs
///
/// - macOS: `~/Library/Caches/arsenal/logs`
/// - Linux: `~/.cache/arsenal/logs` (or `$XDG_CACHE_HOME/arsenal/logs`)
/// - Windows: `%LOCALAPPDATA%\arsenal\logs`
/// - Fallback: `/tmp/arsenal/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp").join(APP_NAME))
        .join("logs")
}

/// Platform data directory holding `config.toml` and `arsenal.json`
///
/// - macOS: `~/Library/Application Support/arsenal`
/// - Linux: `~/.local/share/arsenal` (or `$XDG_DATA_HOME/arsenal`)
/// - Windows: `%APPDATA%\arsenal`
/// - Fallback: `./save_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}
