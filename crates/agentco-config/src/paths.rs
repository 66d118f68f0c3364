//! Well-known locations.

use std::path::PathBuf;

/// Application name used for config directories.
pub const APP_NAME: &str = "agentco";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "AGENTCO_CONFIG_DIR";

/// Backend used when no flag, environment variable or context names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000/api";

/// Get the XDG config directory for agentco.
///
/// Checks `AGENTCO_CONFIG_DIR` env var first, then falls back to platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Directory for rotated log files.
pub fn log_dir() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join("logs"))
}
