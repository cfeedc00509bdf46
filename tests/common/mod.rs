//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use dockpanel::columns::Column;
use dockpanel::config::PanelSettings;
use dockpanel::geometry::{Rect, Size};
use dockpanel::host::headless::{ControlKind, DialogTemplate, HeadlessHost};
use dockpanel::host::{ItemId, RowState, TimerId, WindowHandle, WindowSystem};
use dockpanel::keys::Modifiers;
use dockpanel::listview::{ItemSource, ListNotify, ListViewSpec};
use dockpanel::panel::{DockablePanel, PanelConfig, PanelCtx, PanelHooks};

pub const PANEL_RESOURCE: u32 = 100;
pub const LIST_ID: u32 = 1001;
pub const EDIT_ID: u32 = 1002;
pub const TOOLBAR_COMMAND: u32 = 4242;

/// Headless host that knows the sample panel's dialog
pub fn host() -> HeadlessHost {
    let mut host = HeadlessHost::new();
    host.define_template(
        PANEL_RESOURCE,
        DialogTemplate::new(Size::new(400, 300))
            .with_control(LIST_ID, ControlKind::List, Rect::new(0, 0, 400, 260))
            .with_control(EDIT_ID, ControlKind::Edit, Rect::new(0, 0, 0, 0)),
    );
    host
}

pub fn config(id: &str) -> PanelConfig {
    PanelConfig {
        id: id.to_string(),
        title: "Tracks".to_string(),
        resource: PANEL_RESOURCE,
        dock_order: 0,
        command: TOOLBAR_COMMAND,
    }
}

/// One row of the sample data: name, volume and a mute button column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: ItemId,
    pub name: String,
    pub volume: String,
}

pub fn track(id: u64, name: &str, volume: &str) -> Track {
    Track {
        id: ItemId(id),
        name: name.to_string(),
        volume: volume.to_string(),
    }
}

/// Callbacks the sample source saw, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Click(Option<ItemId>, Option<usize>),
    DoubleClick(ItemId, Option<usize>),
    Button(ItemId, usize, Modifiers),
    Changed(ItemId, bool),
    SetText(ItemId, usize, String),
    BeginDrag(Option<ItemId>),
    Drag,
}

/// Panel hooks the sample panel saw, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookCall {
    Dropped(Vec<PathBuf>),
    ColorEdit(WindowHandle),
    Unhandled(u32, usize, isize),
    Timer(TimerId),
    Notify(WindowHandle, ListNotify),
}

/// Background the sample panel asks for in edit controls
pub const EDIT_BG: u32 = 0xFF20_4060;
/// Result the sample panel returns from notify and unhandled hooks
pub const HOOK_RESULT: isize = 77;

pub type Model = Rc<RefCell<Vec<Track>>>;
pub type Log = Rc<RefCell<Vec<Event>>>;
pub type Calls = Rc<RefCell<Vec<HookCall>>>;

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("Name", 120).editable(),
        Column::new("Volume", 60),
        Column::new("Mute", 40).button(),
    ]
}

/// Item source over a shared model, logging every callback
pub struct Tracks {
    pub model: Model,
    pub log: Log,
}

impl Tracks {
    fn get(&self, item: ItemId) -> Option<Track> {
        self.model.borrow().iter().find(|t| t.id == item).cloned()
    }
}

impl ItemSource for Tracks {
    fn items(&mut self, out: &mut Vec<ItemId>) {
        out.extend(self.model.borrow().iter().map(|t| t.id));
    }

    fn item_text(&self, item: ItemId, col: usize) -> String {
        let Some(t) = self.get(item) else {
            return String::new();
        };
        match col {
            0 => t.name,
            1 => t.volume,
            _ => "M".to_string(),
        }
    }

    fn set_item_text(&mut self, item: ItemId, col: usize, text: &str) {
        self.log
            .borrow_mut()
            .push(Event::SetText(item, col, text.to_string()));
        if let Some(t) = self.model.borrow_mut().iter_mut().find(|t| t.id == item) {
            match col {
                0 => t.name = text.to_string(),
                1 => t.volume = text.to_string(),
                _ => {}
            }
        }
    }

    fn item_tooltip(&self, item: ItemId) -> String {
        self.get(item).map(|t| format!("Track {}", t.name)).unwrap_or_default()
    }

    fn on_item_click(&mut self, item: Option<ItemId>, col: Option<usize>, _mods: Modifiers) {
        self.log.borrow_mut().push(Event::Click(item, col));
    }

    fn on_item_dbl_click(&mut self, item: ItemId, col: Option<usize>) {
        self.log.borrow_mut().push(Event::DoubleClick(item, col));
    }

    fn on_item_button_click(&mut self, item: ItemId, col: usize, mods: Modifiers) {
        self.log.borrow_mut().push(Event::Button(item, col, mods));
    }

    fn on_item_sel_changed(&mut self, item: ItemId, state: RowState) {
        self.log
            .borrow_mut()
            .push(Event::Changed(item, state.selected));
    }

    fn on_begin_drag(&mut self, item: Option<ItemId>) {
        self.log.borrow_mut().push(Event::BeginDrag(item));
    }

    fn on_drag(&mut self) {
        self.log.borrow_mut().push(Event::Drag);
    }
}

/// Sample panel: one list view of tracks and a one-byte view state
pub struct TrackPanel {
    pub tracks: Tracks,
    pub zoom: Rc<RefCell<u8>>,
    pub calls: Calls,
}

impl PanelHooks for TrackPanel {
    fn on_init(&mut self, ctx: &mut PanelCtx<'_>) {
        let Some(list) = ctx.host.dialog_item(ctx.hwnd, LIST_ID) else {
            return;
        };
        let mut spec = ListViewSpec::new(list, "tracks", columns()).with_tooltips();
        if let Some(edit) = ctx.host.dialog_item(ctx.hwnd, EDIT_ID) {
            spec = spec.with_edit(edit);
        }
        let index = ctx.add_list(spec);
        ctx.lists[index].update(&mut *ctx.host, &mut self.tracks);
    }

    fn save_view(&self) -> Vec<u8> {
        vec![*self.zoom.borrow()]
    }

    fn load_view(&mut self, view: &[u8]) {
        if let Some(&z) = view.first() {
            *self.zoom.borrow_mut() = z;
        }
    }

    fn on_dropped_files(&mut self, _ctx: &mut PanelCtx<'_>, files: &[PathBuf]) {
        self.calls.borrow_mut().push(HookCall::Dropped(files.to_vec()));
    }

    fn on_color_edit(&mut self, _ctx: &mut PanelCtx<'_>, control: WindowHandle) -> Option<u32> {
        self.calls.borrow_mut().push(HookCall::ColorEdit(control));
        Some(EDIT_BG)
    }

    fn on_timer(&mut self, _ctx: &mut PanelCtx<'_>, id: TimerId) {
        self.calls.borrow_mut().push(HookCall::Timer(id));
    }

    fn on_notify(&mut self, _ctx: &mut PanelCtx<'_>, from: WindowHandle, notify: ListNotify) -> isize {
        self.calls.borrow_mut().push(HookCall::Notify(from, notify));
        HOOK_RESULT
    }

    fn on_unhandled(
        &mut self,
        _ctx: &mut PanelCtx<'_>,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        self.calls
            .borrow_mut()
            .push(HookCall::Unhandled(msg, wparam, lparam));
        HOOK_RESULT
    }

    fn item_source(&mut self, list: usize) -> Option<&mut dyn ItemSource> {
        (list == 0).then_some(&mut self.tracks as &mut dyn ItemSource)
    }
}

/// Handles tests keep after the panel takes ownership of its hooks
pub struct Fixture {
    pub model: Model,
    pub log: Log,
    pub zoom: Rc<RefCell<u8>>,
    pub calls: Calls,
}

pub fn track_panel(id: &str, tracks: Vec<Track>) -> (DockablePanel, Fixture) {
    track_panel_with(id, tracks, PanelSettings::default())
}

pub fn track_panel_with(
    id: &str,
    tracks: Vec<Track>,
    settings: PanelSettings,
) -> (DockablePanel, Fixture) {
    let model: Model = Rc::new(RefCell::new(tracks));
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let zoom = Rc::new(RefCell::new(1u8));
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let hooks = TrackPanel {
        tracks: Tracks {
            model: model.clone(),
            log: log.clone(),
        },
        zoom: zoom.clone(),
        calls: calls.clone(),
    };
    let panel = DockablePanel::new(config(id), settings, Box::new(hooks));
    (
        panel,
        Fixture {
            model,
            log,
            zoom,
            calls,
        },
    )
}

pub fn sample_tracks() -> Vec<Track> {
    vec![
        track(1, "Drums", "10"),
        track(2, "bass", "2"),
        track(3, "Vocals", "9"),
    ]
}

/// Text of every row in one control column
pub fn column_text(host: &HeadlessHost, list: WindowHandle, col: usize) -> Vec<String> {
    use dockpanel::host::ListControls;
    (0..host.row_count(list))
        .map(|row| host.cell_text(list, row, col))
        .collect()
}
