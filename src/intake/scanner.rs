// src/intake/scanner.rs
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::intake::models::FileInfo;
use crate::sheet::Grid;
use crate::utils::error::ValidationError;

// --- Constants ---
const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "xlsm"];
// Structural gate thresholds: the smallest grid worth attempting, how deep
// to look for the PO marker, and how far past it to expect data.
const MIN_ROWS: usize = 5;
const MIN_COLS: usize = 3;
const MARKER_SCAN_ROWS: usize = 20;
const DATA_SCAN_ROWS: usize = 50;

// --- Regex Patterns for Text Matching (Lazy Static) ---
// Accepts both "PO#" and "PO #" cell spellings.
static PO_CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)po\s?#").expect("Failed to compile PO_CELL_RE"));

static DATA_INDICATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)item|metal|qty|quantity|weight")
        .expect("Failed to compile DATA_INDICATOR_RE")
});

/// Collects supported workbook files from the input directory, sorted for
/// deterministic processing order.
///
/// A missing directory is created and reported as empty rather than being
/// an error, so a first run leaves the expected layout behind.
pub fn scan_input_dir(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    tracing::info!("Scanning directory: {}", dir.display());

    if !dir.exists() {
        tracing::warn!("Input directory '{}' not found, creating it", dir.display());
        fs::create_dir_all(dir)?;
        return Ok(Vec::new());
    }

    let mut found: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
            })
            .unwrap_or(false);
        if supported {
            found.push(path);
        }
    }
    found.sort();

    tracing::info!("Found {} workbook file(s)", found.len());
    Ok(found)
}

/// Structural gate run before extraction is attempted.
///
/// Checks minimum dimensions, a PO marker within the leading rows, at least
/// one invoice data indicator in the same window, and some non-empty
/// content after the marker row. A failed check skips the file, never the
/// batch.
pub fn validate_grid(grid: &Grid) -> Result<(), ValidationError> {
    let rows = grid.row_count();
    let cols = grid.col_count();
    if rows < MIN_ROWS || cols < MIN_COLS {
        return Err(ValidationError::TooSmall { rows, cols });
    }

    let mut po_row: Option<usize> = None;
    let mut has_indicator = false;

    for (index, row) in grid.rows().iter().take(MARKER_SCAN_ROWS).enumerate() {
        for cell in row {
            if PO_CELL_RE.is_match(cell) {
                po_row = Some(index);
            }
            if DATA_INDICATOR_RE.is_match(cell) {
                has_indicator = true;
            }
        }
    }

    let po_row = po_row.ok_or(ValidationError::PoMarkerNotFound)?;
    if !has_indicator {
        return Err(ValidationError::NoDataIndicators);
    }

    // Anything at the very bottom of the grid has no room for data rows;
    // only gate on content when there is space after the marker.
    if po_row < rows.saturating_sub(2) {
        let data_rows = grid.rows()[po_row + 1..]
            .iter()
            .take(DATA_SCAN_ROWS)
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .count();
        if data_rows == 0 {
            return Err(ValidationError::NoDataRows);
        }
    }

    Ok(())
}

/// Builds a catalog entry for a scanned workbook. Filesystem metadata is
/// best-effort; a file that vanished mid-scan still gets an entry.
pub fn file_info(path: &Path, is_valid: bool, message: impl Into<String>) -> FileInfo {
    let metadata = fs::metadata(path).ok();
    let size_bytes = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(|time| chrono::DateTime::<chrono::Local>::from(time).to_rfc3339());

    FileInfo {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_bytes,
        modified,
        is_valid,
        validation_message: message.into(),
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    fn valid_grid() -> Grid {
        grid(&[
            &["some", "cover", "sheet"],
            &["PO#", "Item", "Metal"],
            &["P1", "Widget", "gold"],
            &["P2", "Gadget", "silver"],
            &["footer", "", ""],
        ])
    }

    #[test]
    fn test_valid_grid_passes() {
        assert!(validate_grid(&valid_grid()).is_ok());
    }

    #[test]
    fn test_too_small_grid_is_rejected() {
        let grid = grid(&[&["PO#", "Item", "Metal"], &["P1", "w", "g"]]);
        assert!(matches!(
            validate_grid(&grid),
            Err(ValidationError::TooSmall { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_missing_po_marker_is_rejected() {
        let grid = grid(&[
            &["a", "b", "c"],
            &["Item", "Metal", "Qty"],
            &["1", "2", "3"],
            &["4", "5", "6"],
            &["7", "8", "9"],
        ]);
        assert!(matches!(
            validate_grid(&grid),
            Err(ValidationError::PoMarkerNotFound)
        ));
    }

    #[test]
    fn test_po_spelling_with_space_is_accepted() {
        let grid = grid(&[
            &["PO #", "Item", "Metal"],
            &["P1", "Widget", "gold"],
            &["", "", ""],
            &["", "", ""],
            &["", "", ""],
        ]);
        assert!(validate_grid(&grid).is_ok());
    }

    #[test]
    fn test_missing_indicators_are_rejected() {
        let grid = grid(&[
            &["PO#", "b", "c"],
            &["1", "2", "3"],
            &["4", "5", "6"],
            &["7", "8", "9"],
            &["10", "11", "12"],
        ]);
        assert!(matches!(
            validate_grid(&grid),
            Err(ValidationError::NoDataIndicators)
        ));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let grid = grid(&[
            &["PO#", "Item", "Metal"],
            &["", "", ""],
            &["", "", ""],
            &["", "", ""],
            &["", "", ""],
        ]);
        assert!(matches!(
            validate_grid(&grid),
            Err(ValidationError::NoDataRows)
        ));
    }

    #[test]
    fn test_scan_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_yet_there");
        let found = scan_input_dir(&missing).unwrap();
        assert!(found.is_empty());
        assert!(missing.is_dir());
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.XLS", "notes.txt", "c.xlsm"] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }
        let found = scan_input_dir(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.XLS", "b.xlsx", "c.xlsm"]);
    }
}
