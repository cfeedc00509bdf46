//! In-memory host
//!
//! Simulates just enough of a desktop window system to drive panels and
//! list views without a display: a window tree with geometry, focus,
//! capture and timers, report-style list controls with a header, a docker
//! that remembers slots, scripted popup menus and a [`MemoryStore`].
//!
//! Nothing happens on its own. Time advances through [`HeadlessHost::advance`],
//! and notifications the real controls would send are constructed by the
//! caller and handed to the panel.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::config::{ConfigStore, MemoryStore};
use crate::frame::Frame;
use crate::geometry::{Point, Rect, Size};
use crate::keys::Modifiers;
use crate::menu::Menu;

use super::{
    CellHit, CommandId, DockEngine, ItemId, ListControls, Registrar, RowState, TimerId,
    WindowHandle, WindowSystem, WindowTemplate,
};

/// Pixel metrics of the simulated list control
pub const HEADER_HEIGHT: i32 = 20;
pub const ROW_HEIGHT: i32 = 16;

/// Simulated glyph size for [`WindowSystem::measure_text`]
const CHAR_WIDTH: i32 = 7;
const LINE_HEIGHT: i32 = 13;

/// Kind of control a dialog template creates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    List,
    Edit,
    Static,
}

/// One control of a dialog template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlDef {
    pub id: u32,
    pub kind: ControlKind,
    /// Position in the dialog's client area
    pub rect: Rect,
}

/// Dialog resource: initial size plus child controls
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogTemplate {
    pub size: Size,
    pub controls: Vec<ControlDef>,
}

impl DialogTemplate {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            controls: Vec::new(),
        }
    }

    pub fn with_control(mut self, id: u32, kind: ControlKind, rect: Rect) -> Self {
        self.controls.push(ControlDef { id, kind, rect });
        self
    }
}

#[derive(Debug)]
struct Window {
    parent: Option<WindowHandle>,
    /// Screen coordinates for top-level windows, parent client otherwise
    rect: Rect,
    visible: bool,
    text: String,
    control_id: Option<u32>,
}

#[derive(Debug)]
struct Row {
    item: ItemId,
    state: RowState,
    cells: Vec<String>,
}

#[derive(Debug)]
struct HeaderColumn {
    label: String,
    width: i32,
}

#[derive(Debug, Default)]
struct ListData {
    rows: Vec<Row>,
    columns: Vec<HeaderColumn>,
    order: Vec<usize>,
    sort_indicator: Option<(usize, bool)>,
    single_select: bool,
    tooltips: Vec<(Rect, String)>,
}

impl ListData {
    /// Left/right edges of each control column, honoring header order
    fn column_spans(&self) -> Vec<(i32, i32)> {
        let mut by_position: Vec<usize> = (0..self.columns.len()).collect();
        by_position.sort_by_key(|&c| self.order.get(c).copied().unwrap_or(c));

        let mut spans = vec![(0, 0); self.columns.len()];
        let mut x = 0;
        for c in by_position {
            let w = self.columns[c].width.max(0);
            spans[c] = (x, x + w);
            x += w;
        }
        spans
    }

    fn column_at(&self, x: i32) -> Option<usize> {
        self.column_spans()
            .iter()
            .position(|&(l, r)| x >= l && x < r)
    }

    fn total_width(&self) -> i32 {
        self.columns.iter().map(|c| c.width.max(0)).sum()
    }
}

/// In-memory implementation of every host trait
#[derive(Debug)]
pub struct HeadlessHost {
    next_handle: u64,
    windows: BTreeMap<WindowHandle, Window>,
    lists: HashMap<WindowHandle, ListData>,
    templates: HashMap<u32, DialogTemplate>,
    created: Vec<WindowTemplate>,
    focus: Option<WindowHandle>,
    capture: Option<WindowHandle>,
    timers: BTreeMap<(WindowHandle, TimerId), u32>,
    clock: u32,
    cursor: Point,
    mods: Modifiers,
    screen: Rect,

    docked: BTreeMap<WindowHandle, i32>,
    dock_slots: HashMap<String, i32>,
    default_dock_slot: i32,
    dock_activations: Vec<WindowHandle>,

    menu_replies: VecDeque<Option<CommandId>>,
    menus_shown: Vec<Menu>,
    frames: HashMap<WindowHandle, Frame>,
    invalidations: HashMap<WindowHandle, usize>,
    relayouts: HashMap<WindowHandle, usize>,
    selected_text: Option<WindowHandle>,
    help_text: String,

    store: MemoryStore,
    screensets: Vec<String>,
    accelerators: Vec<String>,
    toolbar_refreshes: Vec<u32>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            windows: BTreeMap::new(),
            lists: HashMap::new(),
            templates: HashMap::new(),
            created: Vec::new(),
            focus: None,
            capture: None,
            timers: BTreeMap::new(),
            clock: 1000,
            cursor: Point::default(),
            mods: Modifiers::NONE,
            screen: Rect::new(0, 0, 1920, 1080),
            docked: BTreeMap::new(),
            dock_slots: HashMap::new(),
            default_dock_slot: 0,
            dock_activations: Vec::new(),
            menu_replies: VecDeque::new(),
            menus_shown: Vec::new(),
            frames: HashMap::new(),
            invalidations: HashMap::new(),
            relayouts: HashMap::new(),
            selected_text: None,
            help_text: String::new(),
            store: MemoryStore::new(),
            screensets: Vec::new(),
            accelerators: Vec::new(),
            toolbar_refreshes: Vec::new(),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    fn alloc(&mut self) -> WindowHandle {
        let h = WindowHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    /// Create a visible window directly, outside any template
    pub fn add_window(&mut self, parent: Option<WindowHandle>, rect: Rect) -> WindowHandle {
        let h = self.alloc();
        self.windows.insert(
            h,
            Window {
                parent,
                rect,
                visible: true,
                text: String::new(),
                control_id: None,
            },
        );
        h
    }

    /// Create a list control child of `parent`
    pub fn add_list(&mut self, parent: WindowHandle, rect: Rect) -> WindowHandle {
        let h = self.add_window(Some(parent), rect);
        self.lists.insert(h, ListData::default());
        h
    }

    /// Register the dialog resource `resource` for [`WindowSystem::create_window`]
    pub fn define_template(&mut self, resource: u32, template: DialogTemplate) {
        self.templates.insert(resource, template);
    }

    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    pub fn set_single_select(&mut self, list: WindowHandle, single: bool) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.single_select = single;
        }
    }

    pub fn set_modifiers(&mut self, mods: Modifiers) {
        self.mods = mods;
    }

    pub fn set_cursor(&mut self, pt: Point) {
        self.cursor = pt;
    }

    /// Slot `dock_add` uses for ids without a remembered slot
    pub fn set_default_dock_slot(&mut self, slot: i32) {
        self.default_dock_slot = slot;
    }

    /// Answer the next popup menu with `reply` (`None` dismisses it)
    pub fn queue_menu_reply(&mut self, reply: Option<CommandId>) {
        self.menu_replies.push_back(reply);
    }

    /// Advance the tick counter
    pub fn advance(&mut self, ms: u32) {
        self.clock = self.clock.wrapping_add(ms);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Templates passed to `create_window`, oldest first
    pub fn created(&self) -> &[WindowTemplate] {
        &self.created
    }

    pub fn timer_active(&self, id: TimerId) -> bool {
        self.timers.keys().any(|(_, t)| *t == id)
    }

    pub fn timer_interval(&self, hwnd: WindowHandle, id: TimerId) -> Option<u32> {
        self.timers.get(&(hwnd, id)).copied()
    }

    pub fn is_docked(&self, hwnd: WindowHandle) -> bool {
        self.docked.contains_key(&hwnd)
    }

    pub fn remembered_dock_slot(&self, id: &str) -> Option<i32> {
        self.dock_slots.get(id).copied()
    }

    pub fn dock_activations(&self) -> &[WindowHandle] {
        &self.dock_activations
    }

    pub fn menus_shown(&self) -> &[Menu] {
        &self.menus_shown
    }

    pub fn last_frame(&self, hwnd: WindowHandle) -> Option<&Frame> {
        self.frames.get(&hwnd)
    }

    pub fn invalidation_count(&self, hwnd: WindowHandle) -> usize {
        self.invalidations.get(&hwnd).copied().unwrap_or(0)
    }

    pub fn relayout_count(&self, hwnd: WindowHandle) -> usize {
        self.relayouts.get(&hwnd).copied().unwrap_or(0)
    }

    pub fn text_selected(&self, hwnd: WindowHandle) -> bool {
        self.selected_text == Some(hwnd)
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn screensets(&self) -> &[String] {
        &self.screensets
    }

    pub fn accelerators(&self) -> &[String] {
        &self.accelerators
    }

    pub fn toolbar_refreshes(&self) -> &[u32] {
        &self.toolbar_refreshes
    }

    pub fn sort_indicator(&self, list: WindowHandle) -> Option<(usize, bool)> {
        self.lists.get(&list)?.sort_indicator
    }

    pub fn row_tooltips(&self, list: WindowHandle) -> Vec<(Rect, String)> {
        self.lists
            .get(&list)
            .map(|l| l.tooltips.clone())
            .unwrap_or_default()
    }

    pub fn column_labels(&self, list: WindowHandle) -> Vec<String> {
        self.lists
            .get(&list)
            .map(|l| l.columns.iter().map(|c| c.label.clone()).collect())
            .unwrap_or_default()
    }

    /// Resize a control column as if the user dragged its divider
    pub fn drag_column_width(&mut self, list: WindowHandle, col: usize, width: i32) {
        if let Some(c) = self
            .lists
            .get_mut(&list)
            .and_then(|l| l.columns.get_mut(col))
        {
            c.width = width;
        }
    }

    /// Screen point in the middle of a cell
    pub fn cell_center(&self, list: WindowHandle, row: usize, col: usize) -> Option<Point> {
        let r = self.cell_rect(list, row, col)?;
        let pt = Point::new((r.left + r.right) / 2, (r.top + r.bottom) / 2);
        Some(self.client_to_screen(list, pt))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Screen position of a window's client origin
    fn screen_origin(&self, hwnd: WindowHandle) -> Point {
        let mut origin = Point::default();
        let mut cur = Some(hwnd);
        while let Some(h) = cur {
            let Some(w) = self.windows.get(&h) else {
                break;
            };
            origin = origin.offset(w.rect.left, w.rect.top);
            cur = w.parent;
        }
        origin
    }

    fn descendants(&self, hwnd: WindowHandle) -> Vec<WindowHandle> {
        let mut out = vec![hwnd];
        let mut i = 0;
        while i < out.len() {
            let cur = out[i];
            out.extend(
                self.windows
                    .iter()
                    .filter(|(_, w)| w.parent == Some(cur))
                    .map(|(h, _)| *h),
            );
            i += 1;
        }
        out
    }
}

impl WindowSystem for HeadlessHost {
    fn create_window(&mut self, template: &WindowTemplate) -> Option<WindowHandle> {
        let dialog = self.templates.get(&template.resource).cloned()?;
        self.created.push(template.clone());

        let hwnd = self.alloc();
        self.windows.insert(
            hwnd,
            Window {
                parent: None,
                rect: Rect::from_origin_size(Point::default(), dialog.size),
                visible: false,
                text: template.title.clone(),
                control_id: None,
            },
        );
        for control in &dialog.controls {
            let child = match control.kind {
                ControlKind::List => self.add_list(hwnd, control.rect),
                ControlKind::Edit => {
                    let h = self.add_window(Some(hwnd), control.rect);
                    if let Some(w) = self.windows.get_mut(&h) {
                        w.visible = false;
                    }
                    h
                }
                ControlKind::Static => self.add_window(Some(hwnd), control.rect),
            };
            if let Some(w) = self.windows.get_mut(&child) {
                w.control_id = Some(control.id);
            }
        }
        Some(hwnd)
    }

    fn destroy_window(&mut self, hwnd: WindowHandle) {
        for h in self.descendants(hwnd) {
            self.windows.remove(&h);
            self.lists.remove(&h);
            self.docked.remove(&h);
            self.frames.remove(&h);
            self.timers.retain(|(w, _), _| *w != h);
            if self.focus == Some(h) {
                self.focus = None;
            }
            if self.capture == Some(h) {
                self.capture = None;
            }
        }
    }

    fn is_window(&self, hwnd: WindowHandle) -> bool {
        self.windows.contains_key(&hwnd)
    }

    fn is_visible(&self, hwnd: WindowHandle) -> bool {
        let mut cur = Some(hwnd);
        while let Some(h) = cur {
            match self.windows.get(&h) {
                Some(w) if w.visible => cur = w.parent,
                _ => return false,
            }
        }
        true
    }

    fn show_window(&mut self, hwnd: WindowHandle, show: bool) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.visible = show;
        }
    }

    fn parent(&self, hwnd: WindowHandle) -> Option<WindowHandle> {
        self.windows.get(&hwnd)?.parent
    }

    fn is_child(&self, parent: WindowHandle, child: WindowHandle) -> bool {
        let mut cur = self.parent(child);
        while let Some(h) = cur {
            if h == parent {
                return true;
            }
            cur = self.parent(h);
        }
        false
    }

    fn dialog_item(&self, dialog: WindowHandle, id: u32) -> Option<WindowHandle> {
        self.windows
            .iter()
            .find(|(_, w)| w.parent == Some(dialog) && w.control_id == Some(id))
            .map(|(h, _)| *h)
    }

    fn focus(&self) -> Option<WindowHandle> {
        self.focus
    }

    fn set_focus(&mut self, hwnd: WindowHandle) {
        if self.windows.contains_key(&hwnd) {
            self.focus = Some(hwnd);
        }
    }

    fn window_rect(&self, hwnd: WindowHandle) -> Option<Rect> {
        let w = self.windows.get(&hwnd)?;
        let origin = self.screen_origin(hwnd);
        Some(Rect::from_origin_size(origin, w.rect.size()))
    }

    fn client_rect(&self, hwnd: WindowHandle) -> Option<Rect> {
        let w = self.windows.get(&hwnd)?;
        Some(Rect::from_origin_size(Point::default(), w.rect.size()))
    }

    fn set_window_rect(&mut self, hwnd: WindowHandle, rect: Rect) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.rect = rect;
        }
    }

    fn bring_to_top(&mut self, _hwnd: WindowHandle) {}

    fn screen_to_client(&self, hwnd: WindowHandle, pt: Point) -> Point {
        let origin = self.screen_origin(hwnd);
        pt.offset(-origin.x, -origin.y)
    }

    fn client_to_screen(&self, hwnd: WindowHandle, pt: Point) -> Point {
        let origin = self.screen_origin(hwnd);
        pt.offset(origin.x, origin.y)
    }

    fn ensure_on_screen(&self, rect: Rect) -> Rect {
        rect.nudged_onto(&self.screen, 20)
    }

    fn window_text(&self, hwnd: WindowHandle) -> String {
        self.windows
            .get(&hwnd)
            .map(|w| w.text.clone())
            .unwrap_or_default()
    }

    fn set_window_text(&mut self, hwnd: WindowHandle, text: &str) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.text = text.to_string();
        }
    }

    fn select_all_text(&mut self, hwnd: WindowHandle) {
        self.selected_text = Some(hwnd);
    }

    fn invalidate(&mut self, hwnd: WindowHandle) {
        *self.invalidations.entry(hwnd).or_default() += 1;
    }

    fn set_timer(&mut self, hwnd: WindowHandle, id: TimerId, interval_ms: u32) {
        if self.windows.contains_key(&hwnd) {
            self.timers.insert((hwnd, id), interval_ms);
        }
    }

    fn kill_timer(&mut self, hwnd: WindowHandle, id: TimerId) {
        self.timers.remove(&(hwnd, id));
    }

    fn tick_count(&self) -> u32 {
        self.clock
    }

    fn cursor_pos(&self) -> Point {
        self.cursor
    }

    fn modifiers(&self) -> Modifiers {
        self.mods
    }

    fn capture(&self) -> Option<WindowHandle> {
        self.capture
    }

    fn set_capture(&mut self, hwnd: WindowHandle) {
        self.capture = Some(hwnd);
    }

    fn release_capture(&mut self) {
        self.capture = None;
    }

    fn track_popup_menu(
        &mut self,
        _owner: WindowHandle,
        menu: &Menu,
        _at: Point,
    ) -> Option<CommandId> {
        self.menus_shown.push(menu.clone());
        self.menu_replies.pop_front().flatten()
    }

    fn relayout_children(&mut self, hwnd: WindowHandle) {
        *self.relayouts.entry(hwnd).or_default() += 1;
    }

    fn measure_text(&self, text: &str) -> Size {
        Size::new(text.chars().count() as i32 * CHAR_WIDTH, LINE_HEIGHT)
    }

    fn present(&mut self, hwnd: WindowHandle, frame: &Frame) {
        self.frames.insert(hwnd, frame.clone());
    }

    fn set_help_text(&mut self, text: &str) {
        self.help_text = text.to_string();
    }
}

impl ListControls for HeadlessHost {
    fn row_count(&self, list: WindowHandle) -> usize {
        self.lists.get(&list).map_or(0, |l| l.rows.len())
    }

    fn row_item(&self, list: WindowHandle, row: usize) -> Option<ItemId> {
        self.lists.get(&list)?.rows.get(row).map(|r| r.item)
    }

    fn row_state(&self, list: WindowHandle, row: usize) -> RowState {
        self.lists
            .get(&list)
            .and_then(|l| l.rows.get(row))
            .map(|r| r.state)
            .unwrap_or_default()
    }

    fn set_row_state(&mut self, list: WindowHandle, row: usize, state: RowState) {
        if let Some(r) = self.lists.get_mut(&list).and_then(|l| l.rows.get_mut(row)) {
            r.state = state;
        }
    }

    fn insert_row(
        &mut self,
        list: WindowHandle,
        row: usize,
        item: ItemId,
        state: RowState,
    ) -> usize {
        let Some(data) = self.lists.get_mut(&list) else {
            return row;
        };
        let at = row.min(data.rows.len());
        data.rows.insert(
            at,
            Row {
                item,
                state,
                cells: vec![String::new(); data.columns.len()],
            },
        );
        at
    }

    fn delete_row(&mut self, list: WindowHandle, row: usize) {
        if let Some(data) = self.lists.get_mut(&list) {
            if row < data.rows.len() {
                data.rows.remove(row);
            }
        }
    }

    fn clear_rows(&mut self, list: WindowHandle) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.rows.clear();
        }
    }

    fn cell_text(&self, list: WindowHandle, row: usize, col: usize) -> String {
        self.lists
            .get(&list)
            .and_then(|l| l.rows.get(row))
            .and_then(|r| r.cells.get(col))
            .cloned()
            .unwrap_or_default()
    }

    fn set_cell_text(&mut self, list: WindowHandle, row: usize, col: usize, text: &str) {
        if let Some(r) = self.lists.get_mut(&list).and_then(|l| l.rows.get_mut(row)) {
            if r.cells.len() <= col {
                r.cells.resize(col + 1, String::new());
            }
            r.cells[col] = text.to_string();
        }
    }

    fn sort_rows(&mut self, list: WindowHandle, cmp: &mut dyn FnMut(ItemId, ItemId) -> Ordering) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.rows.sort_by(|a, b| cmp(a.item, b.item));
        }
    }

    fn column_count(&self, list: WindowHandle) -> usize {
        self.lists.get(&list).map_or(0, |l| l.columns.len())
    }

    fn insert_column(&mut self, list: WindowHandle, col: usize, label: &str, width: i32) {
        if let Some(data) = self.lists.get_mut(&list) {
            let at = col.min(data.columns.len());
            data.columns.insert(
                at,
                HeaderColumn {
                    label: label.to_string(),
                    width,
                },
            );
            data.order = (0..data.columns.len()).collect();
            for r in &mut data.rows {
                if at <= r.cells.len() {
                    r.cells.insert(at, String::new());
                }
            }
        }
    }

    fn clear_columns(&mut self, list: WindowHandle) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.columns.clear();
            data.order.clear();
            data.sort_indicator = None;
            for r in &mut data.rows {
                r.cells.clear();
            }
        }
    }

    fn column_width(&self, list: WindowHandle, col: usize) -> i32 {
        self.lists
            .get(&list)
            .and_then(|l| l.columns.get(col))
            .map_or(0, |c| c.width)
    }

    fn column_order(&self, list: WindowHandle) -> Vec<usize> {
        self.lists
            .get(&list)
            .map(|l| l.order.clone())
            .unwrap_or_default()
    }

    fn set_column_order(&mut self, list: WindowHandle, order: &[usize]) {
        if let Some(data) = self.lists.get_mut(&list) {
            if order.len() == data.columns.len() {
                data.order = order.to_vec();
            }
        }
    }

    fn set_sort_indicator(&mut self, list: WindowHandle, col: Option<usize>, descending: bool) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.sort_indicator = col.map(|c| (c, descending));
        }
    }

    fn cell_rect(&self, list: WindowHandle, row: usize, col: usize) -> Option<Rect> {
        let data = self.lists.get(&list)?;
        if row >= data.rows.len() {
            return None;
        }
        let (l, r) = *data.column_spans().get(col)?;
        let top = HEADER_HEIGHT + row as i32 * ROW_HEIGHT;
        Some(Rect::new(l, top, r, top + ROW_HEIGHT))
    }

    fn row_rect(&self, list: WindowHandle, row: usize) -> Option<Rect> {
        let data = self.lists.get(&list)?;
        if row >= data.rows.len() {
            return None;
        }
        let top = HEADER_HEIGHT + row as i32 * ROW_HEIGHT;
        Some(Rect::new(0, top, data.total_width(), top + ROW_HEIGHT))
    }

    fn hit_test(&self, list: WindowHandle, pt: Point) -> CellHit {
        let Some(data) = self.lists.get(&list) else {
            return CellHit::default();
        };
        let col = data.column_at(pt.x);
        if pt.y < HEADER_HEIGHT {
            return CellHit { row: None, col };
        }
        let row = ((pt.y - HEADER_HEIGHT) / ROW_HEIGHT) as usize;
        if row >= data.rows.len() || col.is_none() {
            return CellHit { row: None, col };
        }
        CellHit {
            row: Some(row),
            col,
        }
    }

    fn header_rect(&self, list: WindowHandle) -> Option<Rect> {
        if !self.lists.contains_key(&list) {
            return None;
        }
        let client = self.client_rect(list)?;
        let origin = self.screen_origin(list);
        Some(Rect::new(
            origin.x,
            origin.y,
            origin.x + client.width(),
            origin.y + HEADER_HEIGHT,
        ))
    }

    fn is_row_visible(&self, list: WindowHandle, row: usize) -> bool {
        let Some(client) = self.client_rect(list) else {
            return false;
        };
        row < self.row_count(list)
            && HEADER_HEIGHT + (row as i32 + 1) * ROW_HEIGHT <= client.bottom
    }

    fn ensure_visible(&mut self, _list: WindowHandle, _row: usize) {}

    fn is_single_select(&self, list: WindowHandle) -> bool {
        self.lists.get(&list).is_some_and(|l| l.single_select)
    }

    fn clear_row_tooltips(&mut self, list: WindowHandle) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.tooltips.clear();
        }
    }

    fn add_row_tooltip(&mut self, list: WindowHandle, rect: Rect, text: &str) {
        if let Some(data) = self.lists.get_mut(&list) {
            data.tooltips.push((rect, text.to_string()));
        }
    }
}

impl DockEngine for HeadlessHost {
    fn dock_add(&mut self, hwnd: WindowHandle, _title: &str, id: &str, _order: i32, activate: bool) {
        if !self.windows.contains_key(&hwnd) {
            return;
        }
        let slot = self
            .dock_slots
            .get(id)
            .copied()
            .unwrap_or(self.default_dock_slot);
        self.docked.insert(hwnd, slot);
        self.show_window(hwnd, true);
        if activate {
            self.dock_activations.push(hwnd);
        }
    }

    fn dock_remove(&mut self, hwnd: WindowHandle) {
        self.docked.remove(&hwnd);
    }

    fn dock_slot_of(&self, hwnd: WindowHandle) -> Option<i32> {
        self.docked.get(&hwnd).copied()
    }

    fn dock_activate(&mut self, hwnd: WindowHandle) {
        if self.docked.contains_key(&hwnd) {
            self.dock_activations.push(hwnd);
        }
    }

    fn dock_set_slot(&mut self, id: &str, slot: i32) {
        self.dock_slots.insert(id.to_string(), slot);
    }
}

impl Registrar for HeadlessHost {
    fn register_screenset(&mut self, id: &str) {
        self.screensets.push(id.to_string());
    }

    fn register_accelerator(&mut self, id: &str) {
        self.accelerators.push(id.to_string());
    }

    fn unregister_accelerator(&mut self, id: &str) {
        self.accelerators.retain(|a| a != id);
    }

    fn refresh_toolbar(&mut self, command: u32) {
        self.toolbar_refreshes.push(command);
    }
}

impl ConfigStore for HeadlessHost {
    fn read_blob(&self, section: &str, key: &str) -> Option<Vec<u8>> {
        self.store.read_blob(section, key)
    }

    fn write_blob(&mut self, section: &str, key: &str, data: &[u8]) {
        self.store.write_blob(section, key, data);
    }

    fn read_string(&self, section: &str, key: &str) -> Option<String> {
        self.store.read_string(section, key)
    }

    fn write_string(&mut self, section: &str, key: &str, value: &str) {
        self.store.write_string(section, key, value);
    }
}
