//! Sortable, editable list views bound to an item source
//!
//! A [`ListView`] owns no data. Each refresh pulls the current items from
//! an [`ItemSource`] and reconciles the host list control against them in
//! place, so selection and scroll position survive refreshes.

mod controller;
mod edit;
mod selection;
pub mod sort;

use std::cmp::Ordering;

pub use controller::ListView;
pub use selection::SelectionProtocol;

use crate::columns::Column;
use crate::host::{ItemId, RowState, WindowHandle};
use crate::keys::Modifiers;

/// The data behind a list view
///
/// Only [`items`](ItemSource::items) and [`item_text`](ItemSource::item_text)
/// are required; every callback defaults to doing nothing.
pub trait ItemSource {
    /// Push the items to display onto `out`, which arrives empty
    fn items(&mut self, out: &mut Vec<ItemId>);

    /// Text of one cell; `col` is the data column
    fn item_text(&self, item: ItemId, col: usize) -> String;

    /// Inline edit committed with changed text
    fn set_item_text(&mut self, _item: ItemId, _col: usize, _text: &str) {}

    /// Selection the item should have after a refresh, `None` to leave the
    /// row as the user left it
    fn item_selected(&self, _item: ItemId) -> Option<bool> {
        None
    }

    fn item_tooltip(&self, _item: ItemId) -> String {
        String::new()
    }

    /// Per-item veto on editing a column marked editable
    fn is_edit_allowed(&self, _item: ItemId, _col: usize) -> bool {
        true
    }

    /// Ascending order of two items on data column `col`
    fn compare_items(&self, a: ItemId, b: ItemId, col: usize) -> Ordering {
        sort::compare_cells(&self.item_text(a, col), &self.item_text(b, col))
    }

    fn on_item_click(&mut self, _item: Option<ItemId>, _col: Option<usize>, _mods: Modifiers) {}
    fn on_item_dbl_click(&mut self, _item: ItemId, _col: Option<usize>) {}
    fn on_item_button_click(&mut self, _item: ItemId, _col: usize, _mods: Modifiers) {}

    /// Return true to veto the change
    fn on_item_sel_changing(&mut self, _item: ItemId, _selected: bool) -> bool {
        false
    }
    fn on_item_sel_changed(&mut self, _item: ItemId, _state: RowState) {}

    fn on_begin_drag(&mut self, _item: Option<ItemId>) {}
    /// Mouse moved with capture while a drag from this list is under way
    fn on_drag(&mut self) {}
}

/// Notifications a host list control sends its owner
///
/// Row and column indices are control indices (display columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListNotify {
    ItemChanging {
        row: Option<usize>,
        old: RowState,
        new: RowState,
    },
    ItemChanged {
        row: Option<usize>,
        old: RowState,
        new: RowState,
    },
    Click {
        row: Option<usize>,
        col: Option<usize>,
        /// Modifier flags carried by the notification, if the host sends any
        mods: Option<Modifiers>,
    },
    DoubleClick {
        row: Option<usize>,
        col: Option<usize>,
    },
    ColumnClick {
        col: usize,
    },
    BeginDrag {
        row: Option<usize>,
    },
    /// Anything else, by host notification code
    Other(u32),
}

/// What is under a screen point in a list view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListHit {
    /// The column header; `column` is the data column, if over one
    Header { column: Option<usize> },
    Row {
        item: ItemId,
        row: usize,
        column: Option<usize>,
    },
    Nowhere,
}

/// Outcome of looking up the first selected row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectedLookup {
    Found(usize),
    /// No row is selected
    Nothing,
    /// A row is selected but its item is unknown to the caller
    Unresolved,
}

impl SelectedLookup {
    /// `n`, `-1` for nothing, `-2` for unresolved
    pub fn code(self) -> i64 {
        match self {
            SelectedLookup::Found(n) => n as i64,
            SelectedLookup::Nothing => -1,
            SelectedLookup::Unresolved => -2,
        }
    }
}

/// Everything needed to bind a list view to a host list control
#[derive(Clone, Debug)]
pub struct ListViewSpec {
    pub list: WindowHandle,
    /// Shared edit control used for inline editing
    pub edit: Option<WindowHandle>,
    /// Config key for the column layout
    pub key: String,
    pub columns: Vec<Column>,
    pub tooltips: bool,
}

impl ListViewSpec {
    pub fn new(list: WindowHandle, key: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            list,
            edit: None,
            key: key.into(),
            columns,
            tooltips: false,
        }
    }

    pub fn with_edit(mut self, edit: WindowHandle) -> Self {
        self.edit = Some(edit);
        self
    }

    pub fn with_tooltips(mut self) -> Self {
        self.tooltips = true;
        self
    }
}
