//! The dockable panel state machine
//!
//! A panel is `Closed` (no window), `Floating` or `Docked`. Closing always
//! destroys the window; geometry and dock placement survive in the panel's
//! [`PanelState`] and in the config store.

use std::path::PathBuf;

use crate::config::{ConfigStore, PanelSettings};
use crate::frame::Frame;
use crate::geometry::{Point, Size};
use crate::host::{
    CommandId, DockEngine, Host, Registrar, TimerId, WindowHandle, WindowSystem, WindowTemplate,
};
use crate::keys::{KeyDisposition, KeyEvent};
use crate::listview::{ListHit, ListNotify, ListView};
use crate::menu::Menu;
use crate::state::{self, PanelState};

use super::hooks::{PanelCtx, PanelHooks};

/// Paint buffer background
pub const WINDOW_BG: u32 = 0xFFFF_FFFF;

/// Static description of a panel type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    /// Persistence and screenset key
    pub id: String,
    pub title: String,
    /// Dialog resource the window is built from
    pub resource: u32,
    /// Position hint for the docker
    pub dock_order: i32,
    /// Toolbar command whose button reflects whether the panel is open
    pub command: u32,
}

/// Messages the host delivers to a panel window
///
/// Points are in the panel's client coordinates except for
/// [`WindowMsg::ContextMenu`], which is in screen coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowMsg {
    Timer(TimerId),
    Notify {
        from: WindowHandle,
        notify: ListNotify,
    },
    ContextMenu(Point),
    Command(CommandId),
    Resize {
        minimized: bool,
    },
    GetMinSize,
    DropFiles(Vec<PathBuf>),
    Destroy,
    Paint,
    MouseDown(Point),
    MouseUp(Point),
    MouseMove(Point),
    DoubleClick(Point),
    ColorEdit(WindowHandle),
    Other {
        msg: u32,
        wparam: usize,
        lparam: isize,
    },
}

/// Answer to a [`WindowMsg`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgReply {
    Handled,
    Value(isize),
    MinSize(Size),
    Color(Option<u32>),
}

/// Teardown in progress; the native destroy message would re-enter the panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Destroying,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Tooltip {
    text: String,
    at: Point,
}

/// A panel window that can float or live in the host's docker
pub struct DockablePanel {
    config: PanelConfig,
    settings: PanelSettings,
    hwnd: Option<WindowHandle>,
    state: PanelState,
    user_closed: bool,
    loading_state: bool,
    resizing: bool,
    phase: Phase,
    tooltip: Option<Tooltip>,
    lists: Vec<ListView>,
    hooks: Box<dyn PanelHooks>,
}

impl std::fmt::Debug for DockablePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockablePanel")
            .field("id", &self.config.id)
            .field("hwnd", &self.hwnd)
            .field("state", &self.state)
            .field("lists", &self.lists.len())
            .finish_non_exhaustive()
    }
}

impl DockablePanel {
    pub fn new(config: PanelConfig, settings: PanelSettings, hooks: Box<dyn PanelHooks>) -> Self {
        Self {
            config,
            settings,
            hwnd: None,
            state: PanelState::default(),
            user_closed: false,
            loading_state: false,
            resizing: false,
            phase: Phase::Idle,
            tooltip: None,
            lists: Vec::new(),
            hooks,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Window handle while the panel is open
    pub fn hwnd(&self) -> Option<WindowHandle> {
        self.hwnd
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_docked(&self) -> bool {
        self.state.is_docked()
    }

    pub fn lists(&self) -> &[ListView] {
        &self.lists
    }

    pub fn hooks(&self) -> &dyn PanelHooks {
        self.hooks.as_ref()
    }

    pub fn hooks_mut(&mut self) -> &mut dyn PanelHooks {
        self.hooks.as_mut()
    }

    /// Current tooltip text, if one is showing
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|t| t.text.as_str())
    }

    /// The window exists
    pub fn is_open(&self, host: &dyn Host) -> bool {
        self.live_hwnd(host).is_some()
    }

    fn live_hwnd(&self, host: &dyn Host) -> Option<WindowHandle> {
        self.hwnd.filter(|&h| host.is_window(h))
    }

    /// Refresh list view `index` from its source
    pub fn update_list(&mut self, host: &mut dyn Host, index: usize) {
        let Some(lv) = self.lists.get_mut(index) else {
            return;
        };
        if let Some(source) = self.hooks.item_source(index) {
            lv.update(host, source);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open, raise or (with `toggle`) close the panel
    pub fn show(&mut self, host: &mut dyn Host, toggle: bool, activate: bool) {
        match self.live_hwnd(host) {
            None => {
                self.realize(host);
                if let Some(hwnd) = self.hwnd {
                    if self.state.is_docked() && activate {
                        host.dock_activate(hwnd);
                    }
                }
            }
            Some(hwnd) if !host.is_visible(hwnd) || (activate && !toggle) => {
                if self.state.is_docked() {
                    host.dock_activate(hwnd);
                } else {
                    host.show_window(hwnd, true);
                }
                host.set_focus(hwnd);
            }
            Some(_) if toggle => {
                self.handle(host, WindowMsg::Command(CommandId::CANCEL));
            }
            Some(_) => {}
        }
    }

    /// Create the window and run what the native init message would
    fn realize(&mut self, host: &mut dyn Host) {
        let template = WindowTemplate {
            resource: self.config.resource,
            title: self.config.title.clone(),
            id: self.config.id.clone(),
        };
        let Some(hwnd) = host.create_window(&template) else {
            tracing::warn!("Host failed to create window for panel {}", self.config.id);
            return;
        };
        self.hwnd = Some(hwnd);
        self.user_closed = false;

        self.hooks.on_init(&mut PanelCtx::new(
            host,
            hwnd,
            &mut self.lists,
            &self.settings,
        ));

        if self.state.is_docked() {
            host.dock_add(
                hwnd,
                &self.config.title,
                &self.config.id,
                self.config.dock_order,
                true,
            );
        } else {
            if !self.state.rect.is_zero() {
                self.state.rect = host.ensure_on_screen(self.state.rect);
                host.set_window_rect(hwnd, self.state.rect);
            }
            host.attach_float_decorations(hwnd);
            host.show_window(hwnd, true);
        }
        host.refresh_toolbar(self.config.command);
        tracing::debug!(
            id = %self.config.id,
            docked = self.state.is_docked(),
            "Panel realized"
        );
    }

    /// Close the window; the panel remembers it was open
    pub fn destroy(&mut self, host: &mut dyn Host) {
        let Some(hwnd) = self.hwnd else {
            return;
        };
        self.teardown(host);
        host.destroy_window(hwnd);
    }

    /// Everything the native destroy message triggers, while the window
    /// still exists
    fn teardown(&mut self, host: &mut dyn Host) {
        if self.phase == Phase::Destroying {
            return;
        }
        let Some(hwnd) = self.hwnd else {
            return;
        };
        self.phase = Phase::Destroying;

        host.kill_timer(hwnd, TimerId::CELL_EDIT);
        self.kill_tooltip(host, false);

        self.hooks.on_destroy(&mut PanelCtx::new(
            host,
            hwnd,
            &mut self.lists,
            &self.settings,
        ));
        if let Some(widgets) = self.hooks.widgets() {
            widgets.clear();
        }
        for lv in &mut self.lists {
            lv.on_destroy(host);
        }

        let blob = self.save_state(host);
        if !blob.is_empty() {
            host.write_blob(&self.settings.section, &self.config.id, &blob);
        }
        self.user_closed = false;
        host.dock_remove(hwnd);

        self.lists.clear();
        self.hwnd = None;
        host.refresh_toolbar(self.config.command);
        self.phase = Phase::Idle;
        tracing::debug!(id = %self.config.id, "Panel destroyed");
    }

    /// Close at the user's request; the saved state records the panel as
    /// closed
    pub fn close(&mut self, host: &mut dyn Host) {
        if self.live_hwnd(host).is_some() {
            self.user_closed = true;
            self.destroy(host);
        }
    }

    /// Open (recreating the window if needed) floating or docked
    pub fn reopen(&mut self, host: &mut dyn Host, docked: bool) {
        if self.live_hwnd(host).is_some() {
            self.destroy(host);
        }
        self.state.set_docked(docked);
        self.show(host, false, true);
    }

    /// Destroy and reopen in the other dock mode
    pub fn toggle_docking(&mut self, host: &mut dyn Host) {
        if !self.state.is_docked() {
            if let Some(r) = self.live_hwnd(host).and_then(|h| host.window_rect(h)) {
                self.state.rect = r;
            }
        }
        self.destroy(host);
        self.state.toggle_docked();
        tracing::debug!(
            id = %self.config.id,
            docked = self.state.is_docked(),
            "Toggled docking"
        );
        self.show(host, false, true);
    }

    /// A list view has focus (or is editing, with `want_edit`), or the
    /// panel window or one of its children has focus
    pub fn is_active(&self, host: &dyn Host, want_edit: bool) -> bool {
        let Some(hwnd) = self.live_hwnd(host) else {
            return false;
        };
        if self.lists.iter().any(|lv| lv.is_active(host, want_edit)) {
            return true;
        }
        match host.focus() {
            Some(f) => f == hwnd || host.is_child(hwnd, f),
            None => false,
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serialize geometry, dock placement and view bytes
    ///
    /// Returns an empty blob while a load is in progress.
    pub fn save_state(&mut self, host: &dyn Host) -> Vec<u8> {
        if self.loading_state {
            return Vec::new();
        }
        let live = self.live_hwnd(host);
        if let Some(hwnd) = live {
            if self.state.is_docked() {
                if let Some(slot) = host.dock_slot_of(hwnd) {
                    self.state.dock_slot = slot;
                }
            } else if let Some(r) = host.window_rect(hwnd) {
                self.state.rect = r;
            }
        }
        self.state.set_open(!self.user_closed && live.is_some());
        state::encode(&self.state, &self.hooks.save_view())
    }

    /// Apply a saved blob, opening, closing or re-docking the window to match
    pub fn load_state(&mut self, host: &mut dyn Host, blob: &[u8]) {
        self.loading_state = true;
        let was_docked = self.state.is_docked();

        let view = match state::decode(blob) {
            Ok((loaded, view)) => {
                self.state = loaded;
                view
            }
            Err(e) => {
                tracing::debug!("No usable state for {}: {}", self.config.id, e);
                self.state.flags = 0;
                &[][..]
            }
        };
        host.dock_set_slot(&self.config.id, self.state.dock_slot);

        let live = self.live_hwnd(host);
        if self.state.is_open() {
            if let Some(hwnd) = live {
                let dock_changed = was_docked != self.state.is_docked();
                let slot_changed =
                    was_docked && host.dock_slot_of(hwnd) != Some(self.state.dock_slot);
                if dock_changed || slot_changed {
                    self.destroy(host);
                }
            }
            self.show(host, false, false);
        } else if live.is_some() {
            self.destroy(host);
        }

        if !view.is_empty() {
            self.hooks.load_view(view);
        }
        self.loading_state = false;
        tracing::debug!(
            id = %self.config.id,
            open = self.state.is_open(),
            docked = self.state.is_docked(),
            "Loaded panel state"
        );
    }

    /// Restore the state saved under this panel's id
    pub fn init_from_config(&mut self, host: &mut dyn Host) {
        let blob = host
            .read_blob(&self.settings.section, &self.config.id)
            .unwrap_or_default();
        self.load_state(host, &blob);
    }

    // =========================================================================
    // Message routing
    // =========================================================================

    /// Route one host message
    pub fn handle(&mut self, host: &mut dyn Host, msg: WindowMsg) -> MsgReply {
        let Some(hwnd) = self.hwnd else {
            return MsgReply::Value(0);
        };
        if self.phase == Phase::Destroying && !matches!(msg, WindowMsg::Destroy) {
            return MsgReply::Value(0);
        }

        match msg {
            WindowMsg::Timer(id) => self.on_timer(host, hwnd, id),
            WindowMsg::Notify { from, notify } => {
                if let Some(i) = self.lists.iter().position(|lv| lv.handle() == from) {
                    if let Some(source) = self.hooks.item_source(i) {
                        return MsgReply::Value(self.lists[i].on_notify(host, source, notify));
                    }
                    return MsgReply::Value(0);
                }
                let mut ctx = PanelCtx::new(host, hwnd, &mut self.lists, &self.settings);
                MsgReply::Value(self.hooks.on_notify(&mut ctx, from, notify))
            }
            WindowMsg::ContextMenu(at) => {
                self.context_menu(host, hwnd, at);
                MsgReply::Handled
            }
            WindowMsg::Command(cmd) => {
                self.hooks.on_command(
                    &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                    cmd,
                );
                match cmd {
                    CommandId::TOGGLE_DOCK => self.toggle_docking(host),
                    CommandId::OK | CommandId::CANCEL => {
                        self.user_closed = true;
                        self.destroy(host);
                    }
                    _ => {}
                }
                MsgReply::Handled
            }
            WindowMsg::Resize { minimized } => {
                if !minimized && !self.resizing {
                    self.resizing = true;
                    self.kill_tooltip(host, false);
                    self.hooks.on_resize(&mut PanelCtx::new(
                        host,
                        hwnd,
                        &mut self.lists,
                        &self.settings,
                    ));
                    host.relayout_children(hwnd);
                    self.resizing = false;
                }
                MsgReply::Handled
            }
            WindowMsg::GetMinSize => MsgReply::MinSize(self.hooks.min_size()),
            WindowMsg::DropFiles(files) => {
                self.hooks.on_dropped_files(
                    &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                    &files,
                );
                MsgReply::Handled
            }
            WindowMsg::Destroy => {
                self.teardown(host);
                MsgReply::Handled
            }
            WindowMsg::Paint => {
                self.paint(host, hwnd);
                MsgReply::Handled
            }
            WindowMsg::MouseDown(pt) => {
                self.kill_tooltip(host, true);
                host.set_focus(hwnd);
                let claimed = self.hooks.on_mouse_down(
                    &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                    pt,
                ) || self.hooks.widgets().is_some_and(|w| w.on_mouse_down(pt));
                if claimed {
                    host.set_capture(hwnd);
                }
                MsgReply::Handled
            }
            WindowMsg::MouseUp(pt) => {
                if host.capture() == Some(hwnd) {
                    let handled = self.hooks.on_mouse_up(
                        &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                        pt,
                    );
                    if !handled {
                        if let Some(w) = self.hooks.widgets() {
                            w.on_mouse_up(pt);
                        }
                    }
                    host.release_capture();
                }
                self.kill_tooltip(host, true);
                MsgReply::Handled
            }
            WindowMsg::MouseMove(pt) => {
                self.mouse_move(host, hwnd, pt);
                MsgReply::Handled
            }
            WindowMsg::DoubleClick(pt) => {
                let handled = self.hooks.on_mouse_dbl_click(
                    &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                    pt,
                );
                if !handled {
                    if let Some(w) = self.hooks.widgets() {
                        if w.on_mouse_down(pt) {
                            w.on_mouse_up(pt);
                        }
                    }
                }
                MsgReply::Handled
            }
            WindowMsg::ColorEdit(control) => MsgReply::Color(self.hooks.on_color_edit(
                &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                control,
            )),
            WindowMsg::Other {
                msg,
                wparam,
                lparam,
            } => MsgReply::Value(self.hooks.on_unhandled(
                &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                msg,
                wparam,
                lparam,
            )),
        }
    }

    fn on_timer(&mut self, host: &mut dyn Host, hwnd: WindowHandle, id: TimerId) -> MsgReply {
        match id {
            TimerId::CELL_EDIT => {
                if let Some(i) = self.lists.iter().position(|lv| lv.editing().is_some()) {
                    match self.hooks.item_source(i) {
                        Some(source) => self.lists[i].on_editing_timer(host, source),
                        None => self.lists[i].cancel_edit(host),
                    }
                }
            }
            TimerId::TOOLTIP => {
                host.kill_timer(hwnd, TimerId::TOOLTIP);
                let pt = host.screen_to_client(hwnd, host.cursor_pos());
                let inside = host.client_rect(hwnd).is_some_and(|r| r.contains(pt));
                let text = if inside {
                    self.tooltip_text(host, hwnd, pt).unwrap_or_default()
                } else {
                    String::new()
                };
                let current = self.tooltip.as_ref().map_or("", |t| t.text.as_str());
                if text != current {
                    self.tooltip = (!text.is_empty()).then_some(Tooltip { text, at: pt });
                    host.invalidate(hwnd);
                }
            }
            other => self.hooks.on_timer(
                &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                other,
            ),
        }
        MsgReply::Handled
    }

    /// Widgets first, then the panel hook, then the row under the cursor in
    /// the focused list
    fn tooltip_text(
        &mut self,
        host: &mut dyn Host,
        hwnd: WindowHandle,
        pt: Point,
    ) -> Option<String> {
        if let Some(text) = self.hooks.widgets().and_then(|w| w.tooltip_at(pt)) {
            return Some(text);
        }
        let ctx = PanelCtx::new(host, hwnd, &mut self.lists, &self.settings);
        if let Some(text) = self.hooks.tooltip_at(&ctx, pt) {
            return Some(text);
        }

        let screen_pt = host.client_to_screen(hwnd, pt);
        let i = self.lists.iter().position(|lv| lv.is_active(host, false))?;
        let ListHit::Row { item, .. } = self.lists[i].hit_test(host, screen_pt) else {
            return None;
        };
        let text = self.hooks.item_source(i)?.item_tooltip(item);
        (!text.is_empty()).then_some(text)
    }

    /// Drop the tooltip and its timer, repainting if one was showing
    pub fn kill_tooltip(&mut self, host: &mut dyn Host, refresh: bool) {
        let Some(hwnd) = self.hwnd else {
            return;
        };
        host.kill_timer(hwnd, TimerId::TOOLTIP);
        let had = self.tooltip.take().is_some();
        if had && refresh {
            host.invalidate(hwnd);
        }
    }

    fn mouse_move(&mut self, host: &mut dyn Host, hwnd: WindowHandle, pt: Point) {
        if let Some(w) = self.hooks.widgets() {
            w.on_mouse_move(pt);
        }
        if host.capture() == Some(hwnd) {
            let handled = self.hooks.on_mouse_move(
                &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
                pt,
            );
            if handled {
                return;
            }
            let screen_pt = host.client_to_screen(hwnd, pt);
            let over = self.lists.iter().position(|lv| {
                host.window_rect(lv.handle())
                    .is_some_and(|r| r.contains(screen_pt))
            });
            if let Some(i) = over {
                if let Some(source) = self.hooks.item_source(i) {
                    self.lists[i].on_drag(source);
                }
            }
        } else {
            self.kill_tooltip(host, true);
            host.set_timer(hwnd, TimerId::TOOLTIP, self.settings.tooltip_delay_ms);
        }
    }

    fn context_menu(&mut self, host: &mut dyn Host, hwnd: WindowHandle, at: Point) {
        self.kill_tooltip(host, true);

        for i in 0..self.lists.len() {
            let Some(source) = self.hooks.item_source(i) else {
                self.lists[i].cancel_edit(host);
                continue;
            };
            self.lists[i].end_edit(host, source, true, true);
            if self.lists[i].do_column_menu(host, source, at) {
                return;
            }
        }

        let reply = self.hooks.on_context_menu(
            &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
            at,
        );
        let mut menu = reply.menu;
        if reply.want_default {
            if let Some(m) = menu.as_mut() {
                m.add_separator();
            }
            let m = menu.get_or_insert_with(Menu::new);
            m.add(
                format!("Dock {} in Docker", self.config.title),
                CommandId::TOGGLE_DOCK,
            );
            m.check(CommandId::TOGGLE_DOCK, self.state.is_docked());
            m.add("Close Window", CommandId::CANCEL);
        }

        let Some(menu) = menu else {
            return;
        };
        let at = if at.is_keyboard() {
            host.window_rect(hwnd).map_or(at, |r| r.origin())
        } else {
            at
        };
        if let Some(cmd) = host.track_popup_menu(hwnd, &menu, at) {
            self.handle(host, WindowMsg::Command(cmd));
        }
    }

    fn paint(&mut self, host: &mut dyn Host, hwnd: WindowHandle) {
        self.hooks.on_paint(&mut PanelCtx::new(
            host,
            hwnd,
            &mut self.lists,
            &self.settings,
        ));
        if self.hooks.widgets().map_or(true, |w| w.is_empty()) {
            return;
        }

        let client = host.client_rect(hwnd).unwrap_or_default();
        let mut frame = Frame::new(client.size(), WINDOW_BG);
        let limit = self.hooks.draw_controls(
            &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
            &mut frame,
        );
        if let Some(w) = self.hooks.widgets() {
            w.paint(&mut frame, client);
        }

        if let Some(tip) = &self.tooltip {
            if self.settings.ui_tooltips {
                let mut bounds = client;
                if limit > 0 {
                    bounds.bottom = limit;
                }
                let size = host.measure_text(&tip.text);
                frame.tooltip(tip.at, bounds, &tip.text, size);
            }
            host.set_help_text(&tip.text);
        }
        host.present(hwnd, &frame);
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Accelerator hook
    ///
    /// An editing list view gets the key first, then the panel's key hook,
    /// then the focused list view. A key nobody wants while the panel is
    /// active goes back to the host's global handling.
    pub fn key_handler(&mut self, host: &mut dyn Host, key: &KeyEvent) -> KeyDisposition {
        let Some(hwnd) = self.live_hwnd(host) else {
            return KeyDisposition::Ignored;
        };
        if !self.is_active(host, true) {
            return KeyDisposition::Ignored;
        }

        let active = self.lists.iter().position(|lv| lv.is_active(host, true));
        if let Some(i) = active {
            if let Some(source) = self.hooks.item_source(i) {
                let r = self.lists[i].editing_key_handler(host, source, key);
                if r.is_claimed() {
                    return r;
                }
            }
        }

        let r = self.hooks.on_key(
            &mut PanelCtx::new(host, hwnd, &mut self.lists, &self.settings),
            key,
        );
        if r.is_claimed() {
            return r;
        }

        if let Some(i) = active {
            let r = self.lists[i].key_handler(host, key);
            if r.is_claimed() {
                return r;
            }
        }
        KeyDisposition::PassToHost
    }
}
