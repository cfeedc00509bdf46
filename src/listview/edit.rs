//! Inline cell editing
//!
//! One edit control per panel is moved over the cell being edited. A
//! timer on the panel window polls focus; once the edit control loses it
//! the edit is committed.

use crate::geometry::{Point, Rect};
use crate::host::{Host, ListControls, TimerId, WindowSystem};
use crate::keys::{KeyCode, KeyDisposition, KeyEvent};

use super::{ItemSource, ListView};

/// Horizontal inset that keeps the edit control off the list border
const EDGE_INSET: i32 = 4;

/// Row and data column being edited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct EditState {
    pub row: usize,
    pub col: usize,
}

impl ListView {
    /// Row and data column of the open editor
    pub fn editing(&self) -> Option<(usize, usize)> {
        self.editing.map(|e| (e.row, e.col))
    }

    /// Open the editor over a cell
    ///
    /// Does nothing without an edit control or when the column is hidden.
    pub fn begin_edit(
        &mut self,
        host: &mut dyn Host,
        source: &dyn ItemSource,
        row: usize,
        col: usize,
    ) {
        let Some(edit) = self.edit else {
            return;
        };
        let Some(display) = self.layout.data_to_display(col) else {
            return;
        };
        let Some(item) = host.row_item(self.list, row) else {
            return;
        };
        let Some(cell) = host.cell_rect(self.list, row, display) else {
            return;
        };

        let top_left = host.client_to_screen(self.list, cell.origin());
        let bottom_right = host.client_to_screen(self.list, Point::new(cell.right, cell.bottom));
        let mut sr = Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y);
        if let Some(bounds) = host.window_rect(self.list) {
            sr.left = sr.left.max(bounds.left + EDGE_INSET);
            sr.right = sr.right.min(bounds.right - EDGE_INSET);
        }
        // Keep the top grid line visible
        sr.top += 1;

        if let Some(parent) = host.parent(edit) {
            let tl = host.screen_to_client(parent, sr.origin());
            let br = host.screen_to_client(parent, Point::new(sr.right, sr.bottom));
            sr = Rect::new(tl.x, tl.y, br.x, br.y);
        }

        self.editing = Some(EditState { row, col });
        host.bring_to_top(edit);
        host.set_window_rect(edit, sr.offset(-1, 0));
        host.show_window(edit, true);
        host.set_window_text(edit, &source.item_text(item, col));
        host.set_focus(edit);
        host.select_all_text(edit);
        if let Some(owner) = host.parent(self.list) {
            host.set_timer(owner, TimerId::CELL_EDIT, self.edit_timeout_ms);
        }
        tracing::debug!(row, col, "Editing cell");
    }

    /// Close the editor, committing its text when `save` is set
    ///
    /// Returns true if the item's text changed.
    pub fn end_edit(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        save: bool,
        resort: bool,
    ) -> bool {
        if save {
            self.finish_edit(host, Some(source), resort)
        } else {
            self.finish_edit(host, None, false)
        }
    }

    /// Close the editor without saving
    pub fn cancel_edit(&mut self, host: &mut dyn Host) {
        self.finish_edit(host, None, false);
    }

    fn finish_edit(
        &mut self,
        host: &mut dyn Host,
        source: Option<&mut dyn ItemSource>,
        resort: bool,
    ) -> bool {
        let Some(state) = self.editing.take() else {
            return false;
        };
        let Some(edit) = self.edit else {
            return false;
        };
        if !host.is_window(self.list) || !host.is_window(edit) {
            return false;
        }
        if let Some(owner) = host.parent(self.list) {
            host.kill_timer(owner, TimerId::CELL_EDIT);
        }

        let mut updated = false;
        if let Some(source) = source {
            let new_text = host.window_text(edit);
            if let Some(item) = host.row_item(self.list, state.row) {
                if source.item_text(item, state.col) != new_text {
                    source.set_item_text(item, state.col, &new_text);
                    if let Some(display) = self.layout.data_to_display(state.col) {
                        let shown = source.item_text(item, state.col);
                        host.set_cell_text(self.list, state.row, display, &shown);
                    }
                    updated = true;
                }
            }
            if resort {
                self.sort(host, source);
            }
            tracing::debug!(row = state.row, col = state.col, updated, "Committed cell edit");
        } else {
            tracing::debug!(row = state.row, col = state.col, "Cancelled cell edit");
        }

        host.show_window(edit, false);
        host.set_focus(self.list);
        updated
    }

    /// Edit timer tick: commit once the editor no longer has focus
    pub fn on_editing_timer(&mut self, host: &mut dyn Host, source: &mut dyn ItemSource) {
        if self.editing.is_none() {
            return;
        }
        if host.focus() != self.edit {
            self.end_edit(host, source, true, true);
        }
    }

    /// Keys while a cell is being edited
    ///
    /// Escape cancels, Enter commits, Tab commits and moves to the same
    /// column of the next row (Shift+Tab: previous row), wrapping around.
    /// Everything else belongs to the edit control.
    pub fn editing_key_handler(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        key: &KeyEvent,
    ) -> KeyDisposition {
        let Some(state) = self.editing else {
            return KeyDisposition::Ignored;
        };
        if !key.is_down() {
            return KeyDisposition::Ignored;
        }

        match key.key {
            KeyCode::Escape => {
                self.cancel_edit(host);
                KeyDisposition::Handled
            }
            KeyCode::Enter => {
                self.end_edit(host, source, true, true);
                KeyDisposition::Handled
            }
            KeyCode::Tab => {
                let prev = self.updates_disabled;
                self.updates_disabled = true;
                self.end_edit(host, source, true, false);
                let count = host.row_count(self.list);
                if count > 0 {
                    let next = if key.mods.shift() {
                        if state.row == 0 {
                            count - 1
                        } else {
                            state.row - 1
                        }
                    } else {
                        (state.row + 1) % count
                    };
                    self.begin_edit(host, source, next, state.col);
                }
                self.updates_disabled = prev;
                KeyDisposition::Handled
            }
            _ => KeyDisposition::ToControl,
        }
    }
}
