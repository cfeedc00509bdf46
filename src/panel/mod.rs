//! Dockable panels
//!
//! - [`DockablePanel`]: one panel window's lifecycle, docking state,
//!   persistence and message routing
//! - [`PanelHooks`]: what a concrete panel plugs in
//! - [`PanelRegistry`]: owns the panels and routes host callbacks to them

mod dockable;
mod hooks;
mod registry;

pub use dockable::{DockablePanel, MsgReply, PanelConfig, WindowMsg, WINDOW_BG};
pub use hooks::{ContextMenu, PanelCtx, PanelHooks, WidgetTree, DEFAULT_MIN_SIZE};
pub use registry::{PanelKey, PanelRegistry};
