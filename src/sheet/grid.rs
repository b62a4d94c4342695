// src/sheet/grid.rs

/// Raw 2-D grid of text cells read from a workbook.
///
/// Row 0 is data, never column names; row and column order are preserved
/// from the source and the grid is immutable once built. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the grid. Ragged sources make this the effective
    /// column count (shorter rows read as empty on the right).
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Space-joined text of a row, the form every row-level pattern matches on.
pub fn row_text(row: &[String]) -> String {
    row.join(" ")
}
