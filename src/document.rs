use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

/// A single cell value.
///
/// This is the least common denominator across the codec backends: plain
/// scalars plus chrono date types. Formulas and styles are out of scope for
/// the facade; backends that carry them drop down to the computed value.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::DateTime(v)
    }
}

/// One worksheet: a name plus a sparse cell map keyed by 1-based (row, col).
///
/// Only non-empty cells are stored; writing `CellValue::Empty` removes the
/// entry. Bounds are tracked from the maximum occupied coordinate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
    max_row: u32,
    max_col: u32,
}

impl Sheet {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a cell at 1-based (row, col). Empty values clear the cell.
    pub fn set_cell(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        debug_assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        let value = value.into();
        if value.is_empty() {
            let removed = self.cells.remove(&(row, col)).is_some();
            if removed && (row == self.max_row || col == self.max_col) {
                self.recompute_bounds();
            }
            return;
        }
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), value);
    }

    fn recompute_bounds(&mut self) {
        self.max_row = 0;
        self.max_col = 0;
        for &(r, c) in self.cells.keys() {
            self.max_row = self.max_row.max(r);
            self.max_col = self.max_col.max(c);
        }
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Iterate occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &CellValue)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// `(rows, cols)` of the occupied rectangle, or `None` when empty.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        if self.max_row == 0 || self.max_col == 0 {
            None
        } else {
            Some((self.max_row, self.max_col))
        }
    }
}

/// An in-memory spreadsheet document: an ordered list of sheets.
///
/// `Document::new()` is a genuinely fresh document with zero sheets; callers
/// (and readers) add sheets explicitly. Two fresh documents share nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    sheets: Vec<Sheet>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet with the given name, returning a handle to it.
    ///
    /// If a sheet with that name already exists, the existing sheet is
    /// returned instead of creating a duplicate.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut Sheet {
        let name = name.into();
        if let Some(idx) = self.sheets.iter().position(|s| s.name == name) {
            return &mut self.sheets[idx];
        }
        self.sheets.push(Sheet::new(name));
        self.sheets.last_mut().unwrap()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Total occupied cells across all sheets.
    pub fn cell_count(&self) -> usize {
        self.sheets.iter().map(|s| s.cell_count()).sum()
    }
}
