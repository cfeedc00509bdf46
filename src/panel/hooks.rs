//! Extension points for concrete panels

use std::path::PathBuf;

use crate::config::PanelSettings;
use crate::frame::Frame;
use crate::geometry::{Point, Rect, Size};
use crate::host::{CommandId, Host, TimerId, WindowHandle, WindowSystem};
use crate::keys::{KeyDisposition, KeyEvent};
use crate::listview::{ItemSource, ListNotify, ListView, ListViewSpec};
use crate::menu::Menu;

/// Smallest size a panel can be dragged to unless it says otherwise
pub const DEFAULT_MIN_SIZE: Size = Size::new(147, 100);

/// What hooks get to work with while the window exists
pub struct PanelCtx<'a> {
    pub host: &'a mut dyn Host,
    pub hwnd: WindowHandle,
    pub lists: &'a mut Vec<ListView>,
    pub settings: &'a PanelSettings,
}

impl<'a> PanelCtx<'a> {
    pub(super) fn new(
        host: &'a mut dyn Host,
        hwnd: WindowHandle,
        lists: &'a mut Vec<ListView>,
        settings: &'a PanelSettings,
    ) -> Self {
        Self {
            host,
            hwnd,
            lists,
            settings,
        }
    }

    /// Bind a list view to one of the window's list controls
    ///
    /// Returns its index; notifications for the control are routed to the
    /// source returned by [`PanelHooks::item_source`] for that index.
    pub fn add_list(&mut self, spec: ListViewSpec) -> usize {
        let lv = ListView::new(self.host, spec, self.settings);
        self.lists.push(lv);
        self.lists.len() - 1
    }

    pub fn client_rect(&self) -> Rect {
        self.host.client_rect(self.hwnd).unwrap_or_default()
    }
}

/// Menu a panel supplies for a right click
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextMenu {
    pub menu: Option<Menu>,
    /// Append the "Dock in Docker" and "Close Window" items
    pub want_default: bool,
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self {
            menu: None,
            want_default: true,
        }
    }
}

impl ContextMenu {
    pub fn with(menu: Menu) -> Self {
        Self {
            menu: Some(menu),
            want_default: true,
        }
    }
}

/// Lightweight controls drawn into the panel's paint buffer instead of
/// being host windows
pub trait WidgetTree {
    fn is_empty(&self) -> bool;
    fn paint(&mut self, frame: &mut Frame, bounds: Rect);
    /// Returns true to take the mouse capture
    fn on_mouse_down(&mut self, pt: Point) -> bool;
    fn on_mouse_up(&mut self, pt: Point);
    fn on_mouse_move(&mut self, pt: Point);
    fn tooltip_at(&self, pt: Point) -> Option<String>;
    /// Drop all children; called when the window goes away
    fn clear(&mut self);
}

/// Behavior a concrete panel layers on top of [`DockablePanel`](super::DockablePanel)
///
/// Every method has a default, so a panel only overrides what it needs.
/// Mouse hooks return true when they consumed the event.
pub trait PanelHooks {
    /// The window exists; create list views and fill controls here
    fn on_init(&mut self, _ctx: &mut PanelCtx<'_>) {}

    /// The window is going away; list views are still attached
    fn on_destroy(&mut self, _ctx: &mut PanelCtx<'_>) {}

    fn on_resize(&mut self, _ctx: &mut PanelCtx<'_>) {}

    /// Custom painting of native parts, before the paint buffer is composed
    fn on_paint(&mut self, _ctx: &mut PanelCtx<'_>) {}

    /// Draw into the paint buffer; returns the bottom edge tooltips must
    /// stay above, or 0 for the whole client area
    fn draw_controls(&mut self, _ctx: &mut PanelCtx<'_>, _frame: &mut Frame) -> i32 {
        0
    }

    fn on_context_menu(&mut self, _ctx: &mut PanelCtx<'_>, _at: Point) -> ContextMenu {
        ContextMenu::default()
    }

    fn on_command(&mut self, _ctx: &mut PanelCtx<'_>, _cmd: CommandId) {}

    fn on_key(&mut self, _ctx: &mut PanelCtx<'_>, _key: &KeyEvent) -> KeyDisposition {
        KeyDisposition::Ignored
    }

    fn on_mouse_down(&mut self, _ctx: &mut PanelCtx<'_>, _pt: Point) -> bool {
        false
    }

    fn on_mouse_up(&mut self, _ctx: &mut PanelCtx<'_>, _pt: Point) -> bool {
        false
    }

    fn on_mouse_move(&mut self, _ctx: &mut PanelCtx<'_>, _pt: Point) -> bool {
        false
    }

    fn on_mouse_dbl_click(&mut self, _ctx: &mut PanelCtx<'_>, _pt: Point) -> bool {
        false
    }

    fn on_dropped_files(&mut self, _ctx: &mut PanelCtx<'_>, _files: &[PathBuf]) {}

    /// Background color for an edit control, `None` for the default
    fn on_color_edit(&mut self, _ctx: &mut PanelCtx<'_>, _control: WindowHandle) -> Option<u32> {
        None
    }

    fn min_size(&self) -> Size {
        DEFAULT_MIN_SIZE
    }

    /// Panel-specific bytes appended to the persisted state
    fn save_view(&self) -> Vec<u8> {
        Vec::new()
    }

    fn load_view(&mut self, _view: &[u8]) {}

    fn on_timer(&mut self, _ctx: &mut PanelCtx<'_>, _id: TimerId) {}

    /// Notification from a control that is not a bound list view
    fn on_notify(&mut self, _ctx: &mut PanelCtx<'_>, _from: WindowHandle, _notify: ListNotify) -> isize {
        0
    }

    /// Tooltip for a client point not covered by a widget
    fn tooltip_at(&self, _ctx: &PanelCtx<'_>, _pt: Point) -> Option<String> {
        None
    }

    /// Any message the framework does not route
    fn on_unhandled(
        &mut self,
        _ctx: &mut PanelCtx<'_>,
        _msg: u32,
        _wparam: usize,
        _lparam: isize,
    ) -> isize {
        0
    }

    /// Data behind list view `list`
    fn item_source(&mut self, _list: usize) -> Option<&mut dyn ItemSource> {
        None
    }

    fn widgets(&mut self) -> Option<&mut dyn WidgetTree> {
        None
    }
}
