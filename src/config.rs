//! Configuration: the host key/value store and framework settings
//!
//! Panels persist two things through a [`ConfigStore`]: a binary state blob
//! per panel id and a column-layout line per list view. Framework tunables
//! live in [`PanelSettings`], stored in `~/.config/dockpanel/config.yaml`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::listview::SelectionProtocol;

/// Section + key store provided by the host
///
/// Reads of missing keys return `None`; writes are best-effort.
pub trait ConfigStore {
    fn read_blob(&self, section: &str, key: &str) -> Option<Vec<u8>>;
    fn write_blob(&mut self, section: &str, key: &str, data: &[u8]);
    fn read_string(&self, section: &str, key: &str) -> Option<String>;
    fn write_string(&mut self, section: &str, key: &str, value: &str);
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<(String, String), Vec<u8>>,
    strings: HashMap<(String, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn read_blob(&self, section: &str, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn write_blob(&mut self, section: &str, key: &str, data: &[u8]) {
        self.blobs
            .insert((section.to_string(), key.to_string()), data.to_vec());
    }

    fn read_string(&self, section: &str, key: &str) -> Option<String> {
        self.strings
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn write_string(&mut self, section: &str, key: &str, value: &str) {
        self.strings
            .insert((section.to_string(), key.to_string()), value.to_string());
    }
}

/// One section of the YAML store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Binary values, hex encoded
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blobs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub strings: BTreeMap<String, String>,
}

/// File-backed store, written through on every change
///
/// Used when running outside a host that provides its own configuration
/// API, and by the `panelstate` inspector.
#[derive(Debug, Clone)]
pub struct YamlStore {
    path: PathBuf,
    sections: BTreeMap<String, StoreSection>,
}

impl YamlStore {
    /// Open `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sections = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store at {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse store at {}", path.display()))?
            }
        } else {
            tracing::debug!("Store not found at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, sections })
    }

    /// Open the default `panels.yaml` in the config directory
    pub fn open_default() -> Result<Self> {
        let path = crate::config_paths::state_file().context("No config directory available")?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sections(&self) -> &BTreeMap<String, StoreSection> {
        &self.sections
    }

    /// Write the whole store to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory {}", parent.display())
            })?;
        }
        let content = serde_yaml::to_string(&self.sections).context("Failed to serialize store")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store to {}", self.path.display()))?;
        tracing::trace!("Saved store to {}", self.path.display());
        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("{:#}", e);
        }
    }
}

impl ConfigStore for YamlStore {
    fn read_blob(&self, section: &str, key: &str) -> Option<Vec<u8>> {
        let encoded = self.sections.get(section)?.blobs.get(key)?;
        match hex::decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Ignoring corrupt blob {}/{}: {}", section, key, e);
                None
            }
        }
    }

    fn write_blob(&mut self, section: &str, key: &str, data: &[u8]) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .blobs
            .insert(key.to_string(), hex::encode(data));
        self.save_or_warn();
    }

    fn read_string(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.strings.get(key).cloned()
    }

    fn write_string(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .strings
            .insert(key.to_string(), value.to_string());
        self.save_or_warn();
    }
}

/// Which selection notification ordering the host's list controls use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolChoice {
    /// Pick by target platform
    #[default]
    Auto,
    PreCommitVeto,
    DeferredReplay,
}

impl ProtocolChoice {
    pub fn resolve(self) -> SelectionProtocol {
        match self {
            ProtocolChoice::Auto if cfg!(target_os = "windows") => SelectionProtocol::PreCommitVeto,
            ProtocolChoice::Auto => SelectionProtocol::DeferredReplay,
            ProtocolChoice::PreCommitVeto => SelectionProtocol::PreCommitVeto,
            ProtocolChoice::DeferredReplay => SelectionProtocol::DeferredReplay,
        }
    }
}

/// Framework tunables that persist across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Config store section for panel blobs and column layouts
    #[serde(default = "default_section")]
    pub section: String,

    /// Inline edit focus-loss check interval
    #[serde(default = "default_cell_edit_timeout")]
    pub cell_edit_timeout_ms: u32,

    /// Hover time before a tooltip appears
    #[serde(default = "default_tooltip_delay")]
    pub tooltip_delay_ms: u32,

    /// Selection-changing notifications closer together than this belong to
    /// one user gesture
    #[serde(default = "default_selection_coalesce")]
    pub selection_coalesce_ms: u32,

    /// Draw tooltips for custom-drawn controls
    #[serde(default = "default_true")]
    pub ui_tooltips: bool,

    #[serde(default)]
    pub selection_protocol: ProtocolChoice,
}

fn default_section() -> String {
    "dockpanel".to_string()
}

fn default_cell_edit_timeout() -> u32 {
    50
}

fn default_tooltip_delay() -> u32 {
    350
}

fn default_selection_coalesce() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            section: default_section(),
            cell_edit_timeout_ms: default_cell_edit_timeout(),
            tooltip_delay_ms: default_tooltip_delay(),
            selection_coalesce_ms: default_selection_coalesce(),
            ui_tooltips: true,
            selection_protocol: ProtocolChoice::Auto,
        }
    }
}

impl PanelSettings {
    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, or defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating the directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn protocol(&self) -> SelectionProtocol {
        self.selection_protocol.resolve()
    }
}
