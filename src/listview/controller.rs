//! List view state, reconciliation, sorting and notification routing

use std::collections::HashSet;

use crate::columns::ColumnLayout;
use crate::config::{ConfigStore, PanelSettings};
use crate::geometry::Point;
use crate::host::{CommandId, Host, ItemId, ListControls, RowState, WindowHandle, WindowSystem};
use crate::keys::{KeyCode, KeyDisposition, KeyEvent, Modifiers};
use crate::menu::Menu;

use super::edit::EditState;
use super::selection::SelectionTracker;
use super::{ItemSource, ListHit, ListNotify, ListViewSpec, SelectedLookup};

/// Controller for one host list control
#[derive(Debug)]
pub struct ListView {
    pub(super) list: WindowHandle,
    pub(super) edit: Option<WindowHandle>,
    section: String,
    key: String,
    pub(super) layout: ColumnLayout,
    pub(super) editing: Option<EditState>,
    pub(super) edit_timeout_ms: u32,
    pub(super) updates_disabled: bool,
    /// Sort key in effect at the last refresh
    last_sort: Option<i32>,
    tooltips: bool,
    pub(super) selection: SelectionTracker,
    /// Reused across refreshes
    scratch: Vec<ItemId>,
}

impl ListView {
    /// Bind to a list control, loading its saved column layout
    pub fn new(host: &mut dyn Host, spec: ListViewSpec, settings: &PanelSettings) -> Self {
        let saved = host.read_string(&settings.section, &spec.key);
        let layout = ColumnLayout::load(spec.columns, saved.as_deref());

        let mut lv = Self {
            list: spec.list,
            edit: spec.edit,
            section: settings.section.clone(),
            key: spec.key,
            layout,
            editing: None,
            edit_timeout_ms: settings.cell_edit_timeout_ms,
            updates_disabled: false,
            last_sort: None,
            tooltips: spec.tooltips,
            selection: SelectionTracker::new(settings.protocol(), settings.selection_coalesce_ms),
            scratch: Vec::new(),
        };
        lv.show_columns(host);
        lv
    }

    pub fn handle(&self) -> WindowHandle {
        self.list
    }

    pub fn edit_handle(&self) -> Option<WindowHandle> {
        self.edit
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Suspend or resume refreshes
    pub fn disable_updates(&mut self, disable: bool) {
        self.updates_disabled = disable;
    }

    pub fn updates_disabled(&self) -> bool {
        self.updates_disabled
    }

    /// The list has focus, or with `want_edit` one of its cells is being edited
    pub fn is_active(&self, host: &dyn Host, want_edit: bool) -> bool {
        host.focus() == Some(self.list) || (want_edit && self.editing.is_some())
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Create the control columns for every visible column, in display order
    pub fn show_columns(&mut self, host: &mut dyn Host) {
        let visible: Vec<usize> = self.layout.visible_columns().collect();
        for (display, data) in visible.into_iter().enumerate() {
            if let Some(col) = self.layout.column(data) {
                host.insert_column(self.list, display, &col.label, col.width);
            }
        }
        host.set_column_order(self.list, &self.layout.order());
    }

    /// Pull widths and order back from the control into the layout
    fn capture_columns(&mut self, host: &dyn Host) {
        let order = host.column_order(self.list);
        if order.len() == self.layout.visible_count() {
            self.layout.set_order(&order);
        }
        let visible: Vec<usize> = self.layout.visible_columns().collect();
        for (display, data) in visible.into_iter().enumerate() {
            let width = host.column_width(self.list, display);
            if width > 0 {
                self.layout.set_width(data, width);
            }
        }
    }

    /// Persist the column layout
    pub fn save_columns(&mut self, host: &mut dyn Host) {
        self.capture_columns(host);
        let line = self.layout.encode();
        host.write_string(&self.section, &self.key, &line);
        tracing::debug!("Saved columns for {}: {}", self.key, line);
    }

    /// Header context menu: column visibility checklist plus "Reset"
    ///
    /// Returns false when `at` is not over the header.
    pub fn do_column_menu(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        at: Point,
    ) -> bool {
        if !matches!(self.hit_test(host, at), ListHit::Header { .. }) {
            return false;
        }
        self.end_edit(host, source, true, true);

        let count = self.layout.len();
        let mut menu = Menu::new();
        menu.add_caption("Visible columns");
        for (i, col) in self.layout.columns().iter().enumerate() {
            let cmd = CommandId(i as u32 + 1);
            menu.add(col.label.clone(), cmd);
            menu.check(cmd, col.is_visible());
        }
        menu.add_separator();
        menu.add("Reset", CommandId(count as u32 + 1));

        let Some(CommandId(picked)) = host.track_popup_menu(self.list, &menu, at) else {
            return true;
        };
        let picked = picked as usize;
        if picked == 0 || picked > count + 1 {
            return true;
        }

        if picked == count + 1 {
            self.layout.reset();
        } else {
            self.capture_columns(host);
            self.layout.toggle(picked - 1);
        }
        tracing::debug!("Column layout for {} now {}", self.key, self.layout.encode());

        host.clear_rows(self.list);
        host.clear_columns(self.list);
        self.show_columns(host);
        self.update(host, source);
        true
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Reconcile the control's rows with the source's current items
    ///
    /// Rows whose item is gone are deleted, surviving rows are refreshed
    /// only where text or selection differ, new items are appended. The list
    /// is re-sorted when anything changed or the sort key moved.
    pub fn update(&mut self, host: &mut dyn Host, source: &mut dyn ItemSource) {
        if self.editing.is_some() || self.updates_disabled {
            return;
        }
        self.updates_disabled = true;

        let sort_code = self.layout.sort().code();
        let mut resort = self.last_sort != Some(sort_code);
        self.last_sort = Some(sort_code);

        let mut desired = std::mem::take(&mut self.scratch);
        desired.clear();
        source.items(&mut desired);

        let mut remaining: HashSet<ItemId> = desired.iter().copied().collect();
        let mut row = 0;
        let mut count = host.row_count(self.list);
        while row < count {
            let keep = host
                .row_item(self.list, row)
                .filter(|item| remaining.remove(item));
            match keep {
                Some(item) => {
                    resort |= self.refresh_row(host, source, row, item);
                    row += 1;
                }
                None => {
                    host.delete_row(self.list, row);
                    count -= 1;
                }
            }
        }

        for &item in &desired {
            if !remaining.remove(&item) {
                continue;
            }
            let state = RowState {
                selected: source.item_selected(item) == Some(true),
                focused: false,
            };
            let row = host.insert_row(self.list, count, item, state);
            let visible: Vec<usize> = self.layout.visible_columns().collect();
            for (display, data) in visible.into_iter().enumerate() {
                host.set_cell_text(self.list, row, display, &source.item_text(item, data));
            }
            count += 1;
            resort = true;
        }

        if resort {
            self.sort(host, source);
        }
        if self.tooltips {
            self.rebuild_tooltips(host, source);
        }

        tracing::trace!("Updated {}: {} rows", self.key, count);
        self.scratch = desired;
        self.updates_disabled = false;
    }

    /// Bring one matched row in line with its item, returns true if anything changed
    fn refresh_row(
        &mut self,
        host: &mut dyn Host,
        source: &dyn ItemSource,
        row: usize,
        item: ItemId,
    ) -> bool {
        let mut changed = false;

        if let Some(want) = source.item_selected(item) {
            let cur = host.row_state(self.list, row);
            if want != cur.selected {
                let state = RowState {
                    selected: want,
                    focused: want && cur.focused,
                };
                host.set_row_state(self.list, row, state);
                changed = true;
            }
        }

        let visible: Vec<usize> = self.layout.visible_columns().collect();
        for (display, data) in visible.into_iter().enumerate() {
            let text = source.item_text(item, data);
            if host.cell_text(self.list, row, display) != text {
                host.set_cell_text(self.list, row, display, &text);
                changed = true;
            }
        }
        changed
    }

    fn rebuild_tooltips(&self, host: &mut dyn Host, source: &dyn ItemSource) {
        host.clear_row_tooltips(self.list);
        for row in 0..host.row_count(self.list) {
            let Some(item) = host.row_item(self.list, row) else {
                continue;
            };
            let Some(rect) = host.row_rect(self.list, row) else {
                continue;
            };
            let text = source.item_tooltip(item);
            host.add_row_tooltip(self.list, rect, &text);
        }
    }

    /// Order rows by the sort column and move the header indicator
    pub fn sort(&mut self, host: &mut dyn Host, source: &dyn ItemSource) {
        let key = self.layout.sort();
        let Some(col) = key.column() else {
            return;
        };
        let descending = key.is_descending();
        host.sort_rows(self.list, &mut |a, b| {
            let ord = source.compare_items(a, b, col);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        host.set_sort_indicator(self.list, self.layout.data_to_display(col), descending);
    }

    // =========================================================================
    // Notifications and keys
    // =========================================================================

    /// Handle a notification from the bound control
    ///
    /// Returns 1 to veto a pending selection change, 0 otherwise.
    pub fn on_notify(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        notify: ListNotify,
    ) -> isize {
        match notify {
            ListNotify::ItemChanging {
                row: Some(row),
                old,
                new,
            } if !self.updates_disabled && old.selected != new.selected => {
                isize::from(self.selection_changing(host, source, row, new))
            }
            ListNotify::ItemChanged {
                row: Some(row),
                old,
                new,
            } if !self.updates_disabled => {
                self.selection_changed(host, source, row, old, new);
                0
            }
            ListNotify::Click { row, col, mods } => {
                // A second click arrives right after the double-click that
                // opened the editor
                if self.editing.is_some() {
                    return 0;
                }
                let data_col = col.and_then(|c| self.layout.display_to_data(c));
                let mods = mods.unwrap_or_else(|| host.modifiers());
                let item = row.and_then(|r| host.row_item(self.list, r));
                source.on_item_click(item, data_col, mods);

                if let (Some(row), Some(item), Some(data_col)) = (row, item, data_col) {
                    if self.layout.column(data_col).is_some_and(|c| c.button) {
                        self.button_click(host, source, row, item, data_col, mods);
                    }
                }
                0
            }
            ListNotify::DoubleClick { row: Some(row), col } => {
                let Some(item) = host.row_item(self.list, row) else {
                    return 0;
                };
                let data_col = col.and_then(|c| self.layout.display_to_data(c));
                match data_col {
                    Some(dc)
                        if self.layout.column(dc).is_some_and(|c| c.editable)
                            && source.is_edit_allowed(item, dc) =>
                    {
                        self.begin_edit(host, source, row, dc);
                    }
                    _ => source.on_item_dbl_click(item, data_col),
                }
                0
            }
            ListNotify::ColumnClick { col } => {
                if let Some(dc) = self.layout.display_to_data(col) {
                    self.layout.click_column(dc);
                    self.sort(host, source);
                }
                0
            }
            ListNotify::BeginDrag { row } => {
                self.end_edit(host, source, true, true);
                let item = row.and_then(|r| host.row_item(self.list, r));
                source.on_begin_drag(item);
                0
            }
            _ => 0,
        }
    }

    /// Keys the control handles natively, plus Ctrl+A select-all
    pub fn key_handler(&mut self, host: &mut dyn Host, key: &KeyEvent) -> KeyDisposition {
        if !key.is_down() {
            return KeyDisposition::Ignored;
        }
        match key.key {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab => KeyDisposition::ToControl,
            KeyCode::Char('a') | KeyCode::Char('A')
                if key.mods == Modifiers::CTRL && !host.is_single_select(self.list) =>
            {
                for row in 0..host.row_count(self.list) {
                    let cur = host.row_state(self.list, row);
                    host.set_row_state(
                        self.list,
                        row,
                        RowState {
                            selected: true,
                            focused: cur.focused,
                        },
                    );
                }
                KeyDisposition::Handled
            }
            _ => KeyDisposition::Ignored,
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Classify a screen point as header, row or empty space
    pub fn hit_test(&self, host: &dyn Host, at: Point) -> ListHit {
        if host.header_rect(self.list).is_some_and(|r| r.contains(at)) {
            let hit = host.hit_test(self.list, host.screen_to_client(self.list, at));
            return ListHit::Header {
                column: hit.col.and_then(|c| self.layout.display_to_data(c)),
            };
        }

        let hit = host.hit_test(self.list, host.screen_to_client(self.list, at));
        let Some(row) = hit.row else {
            return ListHit::Nowhere;
        };
        if !host.is_row_visible(self.list, row) {
            return ListHit::Nowhere;
        }
        match host.row_item(self.list, row) {
            Some(item) => ListHit::Row {
                item,
                row,
                column: hit.col.and_then(|c| self.layout.display_to_data(c)),
            },
            None => ListHit::Nowhere,
        }
    }

    pub fn item_at(&self, host: &dyn Host, row: usize) -> Option<ItemId> {
        host.row_item(self.list, row)
    }

    pub fn row_of(&self, host: &dyn Host, item: ItemId) -> Option<usize> {
        (0..host.row_count(self.list)).find(|&row| host.row_item(self.list, row) == Some(item))
    }

    pub fn is_selected(&self, host: &dyn Host, row: usize) -> bool {
        row < host.row_count(self.list) && host.row_state(self.list, row).selected
    }

    /// Items of all selected rows, in row order
    pub fn selected_items(&self, host: &dyn Host) -> Vec<ItemId> {
        (0..host.row_count(self.list))
            .filter(|&row| host.row_state(self.list, row).selected)
            .filter_map(|row| host.row_item(self.list, row))
            .collect()
    }

    /// Make `item` the only selected row and scroll it into view
    pub fn select_item(&mut self, host: &mut dyn Host, item: ItemId) -> bool {
        let Some(target) = self.row_of(host, item) else {
            return false;
        };
        for row in 0..host.row_count(self.list) {
            let cur = host.row_state(self.list, row);
            host.set_row_state(
                self.list,
                row,
                RowState {
                    selected: row == target,
                    focused: cur.focused,
                },
            );
        }
        host.ensure_visible(self.list, target);
        true
    }

    /// Resolve the first selected row's item to a caller index
    pub fn selected_lookup(
        &self,
        host: &dyn Host,
        resolve: impl FnOnce(ItemId) -> Option<usize>,
    ) -> SelectedLookup {
        let first = (0..host.row_count(self.list))
            .find(|&row| host.row_state(self.list, row).selected)
            .and_then(|row| host.row_item(self.list, row));
        match first {
            None => SelectedLookup::Nothing,
            Some(item) => match resolve(item) {
                Some(n) => SelectedLookup::Found(n),
                None => SelectedLookup::Unresolved,
            },
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The owning window is going away: drop the edit, save the layout
    pub fn on_destroy(&mut self, host: &mut dyn Host) {
        self.cancel_edit(host);
        self.save_columns(host);
        if self.tooltips {
            host.clear_row_tooltips(self.list);
        }
        self.selection.reset();
        self.last_sort = None;
    }

    /// Mouse moved with capture after a drag started in this list
    pub fn on_drag(&mut self, source: &mut dyn ItemSource) {
        source.on_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Column;
    use crate::host::headless::HeadlessHost;

    struct Names(Vec<(ItemId, &'static str)>);

    impl ItemSource for Names {
        fn items(&mut self, out: &mut Vec<ItemId>) {
            out.extend(self.0.iter().map(|(id, _)| *id));
        }

        fn item_text(&self, item: ItemId, _col: usize) -> String {
            self.0
                .iter()
                .find(|(id, _)| *id == item)
                .map(|(_, s)| s.to_string())
                .unwrap_or_default()
        }
    }

    fn setup() -> (HeadlessHost, ListView) {
        let mut host = HeadlessHost::new();
        let panel = host.add_window(None, crate::geometry::Rect::new(0, 0, 300, 200));
        let list = host.add_list(panel, crate::geometry::Rect::new(0, 0, 300, 200));
        let spec = ListViewSpec::new(list, "names", vec![Column::new("Name", 100)]);
        let lv = ListView::new(&mut host, spec, &PanelSettings::default());
        (host, lv)
    }

    fn shown(host: &HeadlessHost, lv: &ListView) -> Vec<String> {
        (0..host.row_count(lv.handle()))
            .map(|r| host.cell_text(lv.handle(), r, 0))
            .collect()
    }

    #[test]
    fn test_update_sorts_numerically() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "10"), (ItemId(2), "2"), (ItemId(3), "9")]);
        lv.update(&mut host, &mut src);
        assert_eq!(shown(&host, &lv), vec!["2", "9", "10"]);
    }

    #[test]
    fn test_update_is_skipped_while_disabled() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "a")]);
        lv.disable_updates(true);
        lv.update(&mut host, &mut src);
        assert_eq!(host.row_count(lv.handle()), 0);
        lv.disable_updates(false);
        lv.update(&mut host, &mut src);
        assert_eq!(host.row_count(lv.handle()), 1);
    }

    #[test]
    fn test_update_dedupes_repeated_items() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "a"), (ItemId(1), "a")]);
        lv.update(&mut host, &mut src);
        assert_eq!(host.row_count(lv.handle()), 1);
    }

    #[test]
    fn test_ctrl_a_selects_all() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "a"), (ItemId(2), "b")]);
        lv.update(&mut host, &mut src);
        let key = KeyEvent::char('a', Modifiers::CTRL);
        assert_eq!(lv.key_handler(&mut host, &key), KeyDisposition::Handled);
        assert_eq!(lv.selected_items(&host), vec![ItemId(1), ItemId(2)]);
    }

    #[test]
    fn test_arrow_keys_go_to_control() {
        let (mut host, mut lv) = setup();
        let key = KeyEvent::down(KeyCode::Down, Modifiers::NONE);
        assert_eq!(lv.key_handler(&mut host, &key), KeyDisposition::ToControl);
        let key = KeyEvent::down(KeyCode::Char('x'), Modifiers::NONE);
        assert_eq!(lv.key_handler(&mut host, &key), KeyDisposition::Ignored);
    }

    #[test]
    fn test_select_item_clears_others() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "a"), (ItemId(2), "b")]);
        lv.update(&mut host, &mut src);
        lv.select_item(&mut host, ItemId(1));
        assert!(lv.select_item(&mut host, ItemId(2)));
        assert_eq!(lv.selected_items(&host), vec![ItemId(2)]);
        assert!(!lv.select_item(&mut host, ItemId(9)));
    }

    #[test]
    fn test_selected_lookup_three_ways() {
        let (mut host, mut lv) = setup();
        let mut src = Names(vec![(ItemId(1), "a"), (ItemId(2), "b")]);
        lv.update(&mut host, &mut src);
        assert_eq!(lv.selected_lookup(&host, |_| Some(0)), SelectedLookup::Nothing);
        lv.select_item(&mut host, ItemId(2));
        assert_eq!(
            lv.selected_lookup(&host, |item| (item == ItemId(2)).then_some(7)),
            SelectedLookup::Found(7)
        );
        assert_eq!(lv.selected_lookup(&host, |_| None), SelectedLookup::Unresolved);
    }

    #[test]
    fn test_destroy_saves_column_layout() {
        let (mut host, mut lv) = setup();
        lv.on_destroy(&mut host);
        assert_eq!(
            host.read_string("dockpanel", "names").as_deref(),
            Some("1 100 0")
        );
    }
}
