//! The seam between the framework and the host application
//!
//! Everything the panels need from the host's window system, list
//! controls, docking engine and registration tables is expressed as a
//! trait here. A real plugin implements them over the host's native API;
//! [`headless::HeadlessHost`] implements them in memory.
//!
//! Calls into the host never call back into the framework. Where the
//! native API would deliver a message synchronously (destroying a window
//! sends its destroy notification, creating one sends its init
//! notification) the panel performs that transition itself before or
//! after the call.
//!
//! All host calls are best-effort: a stale handle yields `None`, an empty
//! string or a no-op.

pub mod headless;

use std::cmp::Ordering;

use crate::config::ConfigStore;
use crate::frame::Frame;
use crate::geometry::{Point, Rect, Size};
use crate::keys::Modifiers;
use crate::menu::Menu;

/// Opaque host window (or control) handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

/// Timer identifier, unique per window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

impl TimerId {
    /// Inline edit auto-commit check
    pub const CELL_EDIT: TimerId = TimerId(0x1000);
    /// Hover tooltip delay
    pub const TOOLTIP: TimerId = TimerId(0x1001);
}

/// Menu or button command identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(pub u32);

impl CommandId {
    pub const NONE: CommandId = CommandId(0);
    pub const OK: CommandId = CommandId(1);
    pub const CANCEL: CommandId = CommandId(2);
    /// "Dock in docker" toggle appended to every panel context menu
    pub const TOGGLE_DOCK: CommandId = CommandId(0xF0D0);
}

/// Identity of the data behind one list row
///
/// Items are owned by the panel's data source; rows only remember which
/// item they show. Two items with identical text stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

/// Selection/focus flags of one row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowState {
    pub selected: bool,
    pub focused: bool,
}

impl RowState {
    pub const SELECTED: RowState = RowState {
        selected: true,
        focused: false,
    };
}

/// Row/column under a point in list client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellHit {
    pub row: Option<usize>,
    pub col: Option<usize>,
}

/// What the host needs to create a panel window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowTemplate {
    /// Dialog resource the host builds the window from
    pub resource: u32,
    pub title: String,
    pub id: String,
}

/// Window creation, geometry, focus, timers and painting
pub trait WindowSystem {
    fn create_window(&mut self, template: &WindowTemplate) -> Option<WindowHandle>;
    fn destroy_window(&mut self, hwnd: WindowHandle);
    fn is_window(&self, hwnd: WindowHandle) -> bool;
    fn is_visible(&self, hwnd: WindowHandle) -> bool;
    fn show_window(&mut self, hwnd: WindowHandle, show: bool);
    fn parent(&self, hwnd: WindowHandle) -> Option<WindowHandle>;
    fn is_child(&self, parent: WindowHandle, child: WindowHandle) -> bool;
    /// Control created from the dialog template with resource id `id`
    fn dialog_item(&self, dialog: WindowHandle, id: u32) -> Option<WindowHandle>;

    fn focus(&self) -> Option<WindowHandle>;
    fn set_focus(&mut self, hwnd: WindowHandle);

    /// Window rectangle in screen coordinates
    fn window_rect(&self, hwnd: WindowHandle) -> Option<Rect>;
    /// Client rectangle, origin at 0,0
    fn client_rect(&self, hwnd: WindowHandle) -> Option<Rect>;
    /// Move/resize: screen coordinates for top-level windows, parent client
    /// coordinates for child controls
    fn set_window_rect(&mut self, hwnd: WindowHandle, rect: Rect);
    fn bring_to_top(&mut self, hwnd: WindowHandle);
    fn screen_to_client(&self, hwnd: WindowHandle, pt: Point) -> Point;
    fn client_to_screen(&self, hwnd: WindowHandle, pt: Point) -> Point;
    /// Move a rectangle so that it is at least partially on a monitor
    fn ensure_on_screen(&self, rect: Rect) -> Rect;

    fn window_text(&self, hwnd: WindowHandle) -> String;
    fn set_window_text(&mut self, hwnd: WindowHandle, text: &str);
    /// Select the whole text of an edit control
    fn select_all_text(&mut self, hwnd: WindowHandle);

    fn invalidate(&mut self, hwnd: WindowHandle);
    fn set_timer(&mut self, hwnd: WindowHandle, id: TimerId, interval_ms: u32);
    fn kill_timer(&mut self, hwnd: WindowHandle, id: TimerId);
    /// Millisecond tick counter; wraps
    fn tick_count(&self) -> u32;

    /// Mouse position in screen coordinates
    fn cursor_pos(&self) -> Point;
    /// Modifier keys currently held
    fn modifiers(&self) -> Modifiers;
    fn capture(&self) -> Option<WindowHandle>;
    fn set_capture(&mut self, hwnd: WindowHandle);
    fn release_capture(&mut self);

    /// Show a popup menu and return the picked command
    fn track_popup_menu(&mut self, owner: WindowHandle, menu: &Menu, at: Point)
        -> Option<CommandId>;

    /// Re-apply the anchoring of a window's child controls after a resize
    fn relayout_children(&mut self, hwnd: WindowHandle);
    /// Pin button and resize grip on floating windows, where supported
    fn attach_float_decorations(&mut self, _hwnd: WindowHandle) {}

    fn measure_text(&self, text: &str) -> Size;
    fn present(&mut self, hwnd: WindowHandle, frame: &Frame);
    /// Host status/help line
    fn set_help_text(&mut self, _text: &str) {}
}

/// Native report-style list controls
///
/// `col` arguments are control columns (visible columns only). Rows carry
/// an [`ItemId`] set at insertion.
pub trait ListControls {
    fn row_count(&self, list: WindowHandle) -> usize;
    fn row_item(&self, list: WindowHandle, row: usize) -> Option<ItemId>;
    fn row_state(&self, list: WindowHandle, row: usize) -> RowState;
    fn set_row_state(&mut self, list: WindowHandle, row: usize, state: RowState);
    /// Insert a row with empty cells, returns its index
    fn insert_row(&mut self, list: WindowHandle, row: usize, item: ItemId, state: RowState)
        -> usize;
    fn delete_row(&mut self, list: WindowHandle, row: usize);
    fn clear_rows(&mut self, list: WindowHandle);
    fn cell_text(&self, list: WindowHandle, row: usize, col: usize) -> String;
    fn set_cell_text(&mut self, list: WindowHandle, row: usize, col: usize, text: &str);
    fn sort_rows(&mut self, list: WindowHandle, cmp: &mut dyn FnMut(ItemId, ItemId) -> Ordering);

    fn column_count(&self, list: WindowHandle) -> usize;
    fn insert_column(&mut self, list: WindowHandle, col: usize, label: &str, width: i32);
    fn clear_columns(&mut self, list: WindowHandle);
    fn column_width(&self, list: WindowHandle, col: usize) -> i32;
    /// Header position of each control column
    fn column_order(&self, list: WindowHandle) -> Vec<usize>;
    fn set_column_order(&mut self, list: WindowHandle, order: &[usize]);
    fn set_sort_indicator(&mut self, list: WindowHandle, col: Option<usize>, descending: bool);

    /// Label rectangle of a cell in list client coordinates
    fn cell_rect(&self, list: WindowHandle, row: usize, col: usize) -> Option<Rect>;
    /// Full row bounds in list client coordinates
    fn row_rect(&self, list: WindowHandle, row: usize) -> Option<Rect>;
    fn hit_test(&self, list: WindowHandle, pt: Point) -> CellHit;
    /// Header rectangle in screen coordinates
    fn header_rect(&self, list: WindowHandle) -> Option<Rect>;
    fn is_row_visible(&self, list: WindowHandle, row: usize) -> bool;
    fn ensure_visible(&mut self, list: WindowHandle, row: usize);
    fn is_single_select(&self, list: WindowHandle) -> bool;

    fn clear_row_tooltips(&mut self, list: WindowHandle);
    fn add_row_tooltip(&mut self, list: WindowHandle, rect: Rect, text: &str);

    fn selected_count(&self, list: WindowHandle) -> usize {
        (0..self.row_count(list))
            .filter(|&row| self.row_state(list, row).selected)
            .count()
    }
}

/// The host's docking engine
pub trait DockEngine {
    fn dock_add(&mut self, hwnd: WindowHandle, title: &str, id: &str, order: i32, activate: bool);
    /// Safe to call for windows that are not docked
    fn dock_remove(&mut self, hwnd: WindowHandle);
    /// Docker slot holding `hwnd`, `None` if not docked
    fn dock_slot_of(&self, hwnd: WindowHandle) -> Option<i32>;
    fn dock_activate(&mut self, hwnd: WindowHandle);
    /// Tell the engine which slot `id` should reopen in
    fn dock_set_slot(&mut self, id: &str, slot: i32);
}

/// Host callback tables the panels register with
pub trait Registrar {
    fn register_screenset(&mut self, id: &str);
    fn register_accelerator(&mut self, id: &str);
    fn unregister_accelerator(&mut self, id: &str);
    /// Repaint the toolbar button bound to `command`
    fn refresh_toolbar(&mut self, command: u32);
}

/// Everything a panel needs from its host
pub trait Host: WindowSystem + ListControls + DockEngine + Registrar + ConfigStore {}

impl<T> Host for T where T: WindowSystem + ListControls + DockEngine + Registrar + ConfigStore {}
