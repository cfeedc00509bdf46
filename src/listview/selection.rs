//! Selection notification protocols
//!
//! Host list controls disagree on the order in which they report a click
//! and the resulting selection change. Under [`SelectionProtocol::PreCommitVeto`]
//! every change is announced before it happens and can be vetoed; a button
//! click arrives afterwards, so a click on a row of a multi-selection has
//! already collapsed that selection by the time we see it. Under
//! [`SelectionProtocol::DeferredReplay`] the click arrives first and the
//! change is only reported once committed.
//!
//! Either way a button click on one row of a multi-selection must leave the
//! multi-selection intact and fire exactly one button callback.

use crate::host::{Host, ItemId, ListControls, RowState, WindowHandle, WindowSystem};
use crate::keys::Modifiers;

use super::{ItemSource, ListView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionProtocol {
    /// Changing (vetoable) before changed; click after both
    PreCommitVeto,
    /// Click before changed; no changing notification
    DeferredReplay,
}

/// A button click held back until the selection change it caused lands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct PendingClick {
    pub item: ItemId,
    pub col: usize,
    pub mods: Modifiers,
}

/// Row states remembered across the notifications of one gesture
#[derive(Debug)]
pub(super) struct SelectionTracker {
    pub protocol: SelectionProtocol,
    pub coalesce_ms: u32,
    pub saved: Vec<RowState>,
    /// Tick of the last snapshot, `None` before the first one
    pub saved_at: Option<u32>,
    /// Shift was held when the current gesture started
    pub shift_sel: bool,
    pub pending: Option<PendingClick>,
}

impl SelectionTracker {
    pub fn new(protocol: SelectionProtocol, coalesce_ms: u32) -> Self {
        Self {
            protocol,
            coalesce_ms,
            saved: Vec::new(),
            saved_at: None,
            shift_sel: false,
            pending: None,
        }
    }

    fn snapshot(&mut self, host: &dyn Host, list: WindowHandle) {
        self.saved.clear();
        self.saved
            .extend((0..host.row_count(list)).map(|row| host.row_state(list, row)));
    }

    /// Within `coalesce_ms` of the last snapshot, boundary included
    fn is_fresh(&self, now: u32) -> bool {
        self.saved_at
            .is_some_and(|t| now.wrapping_sub(t) <= self.coalesce_ms)
    }

    pub fn reset(&mut self) {
        self.saved.clear();
        self.saved_at = None;
        self.shift_sel = false;
        self.pending = None;
    }
}

impl ListView {
    /// A selection change is about to happen; returns true to veto it
    pub(super) fn selection_changing(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        row: usize,
        new: RowState,
    ) -> bool {
        if self.selection.protocol != SelectionProtocol::PreCommitVeto {
            return false;
        }
        let Some(item) = host.row_item(self.list, row) else {
            return false;
        };

        // Changes arriving in a burst belong to the same click; snapshot
        // only at the start of the burst
        let now = host.tick_count();
        if !self.selection.is_fresh(now) {
            self.selection.snapshot(host, self.list);
            self.selection.saved_at = Some(now);
            self.selection.shift_sel = host.modifiers().shift();
        }

        source.on_item_sel_changing(item, new.selected)
    }

    /// A selection change has happened
    pub(super) fn selection_changed(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        row: usize,
        old: RowState,
        new: RowState,
    ) {
        if let Some(item) = host.row_item(self.list, row) {
            if old.selected != new.selected {
                source.on_item_sel_changed(item, new);
            }
        }

        if self.selection.protocol != SelectionProtocol::DeferredReplay {
            return;
        }

        let count = host.row_count(self.list);
        let saved = std::mem::take(&mut self.selection.saved);
        if !saved.is_empty() && saved.len() == count {
            // Put back the multi-selection the button click collapsed
            for (row, state) in saved.iter().enumerate() {
                host.set_row_state(self.list, row, *state);
            }
        }
        for row in 0..count {
            if let Some(item) = host.row_item(self.list, row) {
                source.on_item_sel_changed(item, host.row_state(self.list, row));
            }
        }

        if let Some(click) = self.selection.pending.take() {
            source.on_item_button_click(click.item, click.col, click.mods);
        }
    }

    /// Click on a button column cell
    pub(super) fn button_click(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        row: usize,
        item: ItemId,
        col: usize,
        mods: Modifiers,
    ) {
        match self.selection.protocol {
            SelectionProtocol::PreCommitVeto => {
                self.button_click_after_commit(host, source, row, item, col, mods)
            }
            SelectionProtocol::DeferredReplay => {
                self.button_click_before_commit(host, source, row, item, col, mods)
            }
        }
    }

    fn button_click_after_commit(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        row: usize,
        item: ItemId,
        col: usize,
        mut mods: Modifiers,
    ) {
        let now = host.tick_count();
        let saved_len_ok = self.selection.saved.len() == host.row_count(self.list);
        let was_selected = self
            .selection
            .saved
            .get(row)
            .is_some_and(|state| state.selected);

        if (self.selection.is_fresh(now) || mods.shift()) && saved_len_ok && was_selected {
            // The click landed on a row of the previous selection: undo the
            // collapse the control already committed
            let prev = self.updates_disabled;
            self.updates_disabled = true;
            let saved = self.selection.saved.clone();
            for (i, state) in saved.iter().enumerate() {
                if let Some(it) = host.row_item(self.list, i) {
                    source.on_item_sel_changed(it, *state);
                }
                host.set_row_state(self.list, i, *state);
            }
            self.updates_disabled = prev;
            tracing::trace!("Restored {} row states after button click", saved.len());
        } else if self.selection.shift_sel {
            // Shift extended the selection; do not let it also modify the
            // button action
            mods = mods.without_shift();
            self.selection.shift_sel = false;
        }

        source.on_item_button_click(item, col, mods);
    }

    fn button_click_before_commit(
        &mut self,
        host: &mut dyn Host,
        source: &mut dyn ItemSource,
        row: usize,
        item: ItemId,
        col: usize,
        mods: Modifiers,
    ) {
        let state = host.row_state(self.list, row);
        if !state.selected {
            // The click is about to select this row; fire once it has
            self.selection.pending = Some(PendingClick {
                item,
                col,
                mods: mods.without_shift(),
            });
            return;
        }

        if host.selected_count(self.list) <= 1 {
            self.selection.saved.clear();
        } else {
            self.selection.snapshot(host, self.list);
        }
        source.on_item_button_click(item, col, mods);
    }
}
