//! Column layout model for list views
//!
//! Each list view has a fixed set of logical columns declared by its panel.
//! The user can hide columns, drag them into a different order, resize them
//! and pick a sort column. All of that is persisted as one text line:
//!
//! ```text
//! <sort> <width_0> <pos_0> <width_1> <pos_1> ...
//! ```
//!
//! One `(width, pos)` pair per logical column in declaration order. `pos` is
//! `-1` for a hidden column. `sort` is a signed 1-based column number whose
//! sign is the direction.
//!
//! Hiding the column that is currently sorted moves sorting to the first
//! column still visible, ascending. Callers that care about the sort column
//! must re-read it after `toggle`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnLayoutError {
    #[error("column layout string is empty")]
    Empty,
    #[error("column layout sort token {0:?} is not an integer")]
    BadSortToken(String),
}

/// One logical column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub width: i32,
    /// Display position, `None` when hidden
    pub position: Option<usize>,
    /// Double-click opens the inline editor
    pub editable: bool,
    /// Clicking a cell fires the item "button" callback
    pub button: bool,
}

impl Column {
    /// Visible, read-only column
    pub fn new(label: impl Into<String>, width: i32) -> Self {
        Self {
            label: label.into(),
            width,
            position: Some(0),
            editable: false,
            button: false,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn button(mut self) -> Self {
        self.button = true;
        self
    }

    /// Declared but hidden until the user enables it
    pub fn hidden(mut self) -> Self {
        self.position = None;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }
}

/// Signed 1-based sort column; negative means descending, 0 is unused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortKey(i32);

impl SortKey {
    pub const DEFAULT: SortKey = SortKey(1);

    pub fn ascending(column: usize) -> Self {
        SortKey(column as i32 + 1)
    }

    pub fn descending(column: usize) -> Self {
        SortKey(-(column as i32 + 1))
    }

    pub fn from_code(code: i32) -> Self {
        SortKey(code)
    }

    pub fn code(self) -> i32 {
        self.0
    }

    /// Logical column index, `None` for the unused 0 key
    pub fn column(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.unsigned_abs() as usize - 1)
        }
    }

    pub fn is_descending(self) -> bool {
        self.0 < 0
    }

    /// Result of clicking a column header: the same column flips direction,
    /// any other column starts ascending
    pub fn clicked(self, column: usize) -> Self {
        if self.column() == Some(column) {
            SortKey(-self.0)
        } else {
            SortKey::ascending(column)
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visibility, order, widths and sort state of a list view's columns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    defaults: Vec<Column>,
    columns: Vec<Column>,
    sort: SortKey,
}

impl ColumnLayout {
    /// Layout straight from the declared defaults
    pub fn new(defaults: Vec<Column>) -> Self {
        let mut columns = defaults.clone();
        renumber_in_declaration_order(&mut columns);
        let defaults_normalized = columns.clone();
        Self {
            defaults: defaults_normalized,
            columns,
            sort: SortKey::DEFAULT,
        }
    }

    /// Decode a persisted layout line
    ///
    /// Per-column entries that are missing or malformed fall back to that
    /// column's default; only an empty line or an unreadable sort token is
    /// an error.
    pub fn decode(defaults: Vec<Column>, line: &str) -> Result<Self, ColumnLayoutError> {
        let mut layout = Self::new(defaults);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(ColumnLayoutError::Empty);
        };
        let sort: i32 = first
            .parse()
            .map_err(|_| ColumnLayoutError::BadSortToken(first.to_string()))?;

        let int_at = |i: usize| tokens.get(i).and_then(|t| t.parse::<i32>().ok());
        let mut next_pos = 0usize;
        for (i, column) in layout.columns.iter_mut().enumerate() {
            let default_visible = layout.defaults[i].is_visible();
            match (int_at(i * 2 + 1), int_at(i * 2 + 2)) {
                (Some(width), Some(pos)) if width != 0 && pos >= -1 => {
                    column.width = width;
                    column.position = usize::try_from(pos).ok();
                    if let Some(p) = column.position {
                        next_pos = next_pos.max(p + 1);
                    }
                }
                _ => {
                    tracing::debug!(column = i, "column layout entry missing, using default");
                    column.position = default_visible.then(|| {
                        let p = next_pos;
                        next_pos += 1;
                        p
                    });
                }
            }
        }

        layout.normalize_positions();
        layout.sort = SortKey::from_code(sort);
        if layout.sort.column().map_or(true, |c| c >= layout.columns.len()) {
            tracing::debug!(sort, "column layout sort key out of range, using default");
            layout.sort = SortKey::DEFAULT;
        }
        Ok(layout)
    }

    /// Decode `line` if present and valid, otherwise use the defaults
    pub fn load(defaults: Vec<Column>, line: Option<&str>) -> Self {
        match line {
            Some(line) => match Self::decode(defaults.clone(), line) {
                Ok(layout) => layout,
                Err(e) => {
                    tracing::warn!("Ignoring stored column layout: {}", e);
                    Self::new(defaults)
                }
            },
            None => Self::new(defaults),
        }
    }

    /// Persisted text form
    pub fn encode(&self) -> String {
        let mut out = self.sort.code().to_string();
        for column in &self.columns {
            let pos = column.position.map_or(-1, |p| p as i64);
            out.push_str(&format!(" {} {}", column.width, pos));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, data_col: usize) -> Option<&Column> {
        self.columns.get(data_col)
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Apply a header click on a logical column
    pub fn click_column(&mut self, data_col: usize) {
        self.sort = self.sort.clicked(data_col);
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_visible()).count()
    }

    /// Logical column indices of visible columns, in declaration order
    pub fn visible_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible())
            .map(|(i, _)| i)
    }

    /// Map a control column (visible columns in declaration order) to a
    /// logical column
    pub fn display_to_data(&self, display_col: usize) -> Option<usize> {
        self.visible_columns().nth(display_col)
    }

    /// Map a logical column to its control column, `None` if hidden
    pub fn data_to_display(&self, data_col: usize) -> Option<usize> {
        if !self.columns.get(data_col)?.is_visible() {
            return None;
        }
        Some(
            self.columns[..data_col]
                .iter()
                .filter(|c| c.is_visible())
                .count(),
        )
    }

    /// Positions of visible columns in declaration order, as handed to the
    /// control's header
    pub fn order(&self) -> Vec<usize> {
        self.columns.iter().filter_map(|c| c.position).collect()
    }

    /// Take the header order back from the control after the user dragged
    /// columns around. Arrays of the wrong length are ignored.
    pub fn set_order(&mut self, order: &[usize]) {
        if order.len() != self.visible_count() {
            return;
        }
        let mut it = order.iter();
        for column in self.columns.iter_mut().filter(|c| c.is_visible()) {
            column.position = it.next().copied();
        }
        self.normalize_positions();
    }

    pub fn set_width(&mut self, data_col: usize, width: i32) {
        if let Some(column) = self.columns.get_mut(data_col) {
            column.width = width;
        }
    }

    /// Show a hidden column or hide a visible one
    pub fn toggle(&mut self, data_col: usize) {
        let Some(column) = self.columns.get(data_col) else {
            return;
        };
        match column.position {
            None => {
                let insert_at = data_col.min(self.visible_count());
                for c in self.columns.iter_mut() {
                    if let Some(p) = c.position.as_mut() {
                        if *p >= insert_at {
                            *p += 1;
                        }
                    }
                }
                self.columns[data_col].position = Some(insert_at);
            }
            Some(removed) => {
                self.columns[data_col].position = None;
                for c in self.columns.iter_mut() {
                    if let Some(p) = c.position.as_mut() {
                        if *p > removed {
                            *p -= 1;
                        }
                    }
                }
                if self.sort.column() == Some(data_col) {
                    let first = self.visible_columns().next();
                    if let Some(first) = first {
                        tracing::debug!(
                            hidden = data_col,
                            now = first,
                            "sorted column hidden, sorting by first visible column"
                        );
                        self.sort = SortKey::ascending(first);
                    }
                }
            }
        }
    }

    /// Restore declared visibility, order and widths. The sort key is kept.
    pub fn reset(&mut self) {
        self.columns = self.defaults.clone();
    }

    /// The line a fresh install would persist
    pub fn defaults_line(&self) -> String {
        let mut fresh = Self::new(self.defaults.clone());
        fresh.sort = SortKey::DEFAULT;
        fresh.encode()
    }

    /// Make visible positions a permutation of `0..visible_count`, keeping
    /// their relative order
    fn normalize_positions(&mut self) {
        let mut visible: Vec<(usize, usize)> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.position.map(|p| (p, i)))
            .collect();
        visible.sort();
        for (rank, (_, i)) in visible.into_iter().enumerate() {
            self.columns[i].position = Some(rank);
        }
    }
}

fn renumber_in_declaration_order(columns: &mut [Column]) {
    let mut next = 0;
    for column in columns.iter_mut() {
        if column.position.is_some() {
            column.position = Some(next);
            next += 1;
        }
    }
}
