//! Dockable panel framework for DAW host plugins
//!
//! This crate provides the window plumbing plugin panels share: panels that
//! float or dock in the host's docker, sortable list views with inline cell
//! editing, and the binary and text formats their state is persisted in.
//! Everything host-specific sits behind the traits in [`host`].

pub mod columns;
pub mod config;
pub mod config_paths;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod keys;
pub mod listview;
pub mod menu;
pub mod panel;
pub mod screenset;
pub mod state;
pub mod tracing;

// Re-export commonly used types
pub use columns::{Column, ColumnLayout, SortKey};
pub use config::{ConfigStore, MemoryStore, PanelSettings, YamlStore};
pub use host::Host;
pub use listview::{ItemSource, ListView, ListViewSpec};
pub use panel::{DockablePanel, PanelConfig, PanelHooks, PanelRegistry};
pub use state::PanelState;
