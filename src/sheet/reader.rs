// src/sheet/reader.rs
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::sheet::Grid;
use crate::utils::error::SheetError;

/// Reads the first worksheet of a workbook into a [`Grid`].
///
/// No header inference is done and empty cells come back as `""`, so the
/// grid is a faithful positional copy of whatever the sheet contains.
pub fn read_grid(path: &Path) -> Result<Grid, SheetError> {
    tracing::info!("Reading workbook: {}", path.display());

    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet(path.to_path_buf()))??;

    if range.is_empty() {
        return Err(SheetError::EmptySheet(path.to_path_buf()));
    }

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let grid = Grid::from_rows(rows);
    tracing::debug!(
        "Read {} rows x {} columns from {}",
        grid.row_count(),
        grid.col_count(),
        path.display()
    );

    Ok(grid)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
