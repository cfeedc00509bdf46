//! Where dockpanel keeps its files outside a host
//!
//! Hosts normally persist panel state through their own configuration API.
//! Standalone tools and hosts without one use a directory of their own:
//! `$XDG_CONFIG_HOME/dockpanel` or `~/.config/dockpanel` on Unix,
//! `%APPDATA%\dockpanel` on Windows.

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "dockpanel";
const SETTINGS_FILE: &str = "config.yaml";
const STATE_FILE: &str = "panels.yaml";
const LOGS_DIR: &str = "logs";

/// Base directory, `None` when no home or app-data directory is known
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);

    #[cfg(not(target_os = "windows"))]
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")));

    base.map(|b| b.join(APP_DIR))
}

/// [`PanelSettings`](crate::config::PanelSettings) YAML
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Panel state blobs and column layouts (a [`YamlStore`](crate::config::YamlStore))
pub fn state_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(STATE_FILE))
}

/// Create the log directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = config_dir()
        .context("No config directory available")?
        .join(LOGS_DIR);
    std::fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create log directory {}", logs.display()))?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Some(dir) = config_dir() else {
            return;
        };
        assert!(dir.ends_with(APP_DIR));
        assert_eq!(state_file(), Some(dir.join("panels.yaml")));
        assert_eq!(settings_file(), Some(dir.join("config.yaml")));
    }
}
