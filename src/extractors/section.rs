// src/extractors/section.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::noise::filter_noise;
use crate::extractors::project::find_header_and_project;
use crate::sheet::Grid;
use crate::utils::error::ExtractError;

// --- Regex Patterns for Text Matching (Lazy Static) ---
// The payload section opens at a purchase-order marker row and closes at a
// fixed terminating phrase printed in the invoice footer.
static PO_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)po#").expect("Failed to compile PO_MARKER_RE"));

static TERMINATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)all unpaid balance will be charged")
        .expect("Failed to compile TERMINATOR_RE")
});

/// Which PO-marker occurrence fixes the section start when the marker
/// repeats before the terminator.
///
/// The source layouts rely on the last occurrence winning, so that is the
/// default; `First` is selectable for layouts where the first marker row is
/// the real cut point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MarkerPolicy {
    /// Keep the most recent marker row seen before the terminator.
    #[default]
    #[value(name = "last")]
    LastMatch,
    /// Keep the first marker row and ignore later occurrences.
    #[value(name = "first")]
    FirstMatch,
}

// --- Data Structures ---
/// Normalized table produced from one workbook: the subset of allowed
/// column labels found in the header, plus one record per retained row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedTable {
    /// Stem of the source file, used to derive output names.
    pub source_stem: String,
    /// Column labels, in allow-list order.
    pub columns: Vec<String>,
    /// One value per column per record, positionally aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

/// Finds the payload section bounds as a half-open row range.
///
/// A row matches a marker when any of its cells contains the marker text
/// (case-insensitive substring). The scan runs top to bottom exactly once
/// and stops at the first terminator row; the result is `None` unless both
/// bounds were set. `start <= end` holds by construction.
pub fn locate_section(grid: &Grid, policy: MarkerPolicy) -> Option<(usize, usize)> {
    let mut start_row: Option<usize> = None;
    let mut end_row: Option<usize> = None;

    for (index, row) in grid.rows().iter().enumerate() {
        if row.iter().any(|cell| PO_MARKER_RE.is_match(cell)) {
            match policy {
                MarkerPolicy::LastMatch => start_row = Some(index),
                MarkerPolicy::FirstMatch => {
                    if start_row.is_none() {
                        start_row = Some(index);
                    }
                }
            }
        }
        if row.iter().any(|cell| TERMINATOR_RE.is_match(cell)) {
            end_row = Some(index);
            break;
        }
    }

    match (start_row, end_row) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    }
}

// --- Main Extractor Structure ---
pub struct SectionExtractor {
    policy: MarkerPolicy,
}

impl SectionExtractor {
    pub fn new(policy: MarkerPolicy) -> Self {
        Self { policy }
    }

    /// Runs the full grid-to-table transformation for one workbook.
    ///
    /// Locates the marker-bounded section, strips noise rows, then binds
    /// the header row and projects everything after it onto the allowed
    /// column labels. Fails with a per-file [`ExtractError`] when either
    /// the section or the header cannot be found; there is no partial
    /// result.
    pub fn extract(
        &self,
        grid: &Grid,
        source_stem: &str,
    ) -> Result<ProjectedTable, ExtractError> {
        tracing::info!(
            "Extracting invoice table from '{}' ({} rows, policy {:?})",
            source_stem,
            grid.row_count(),
            self.policy
        );

        let (start, end) = locate_section(grid, self.policy).ok_or_else(|| {
            ExtractError::SectionNotFound(format!(
                "no PO marker / terminator pair in '{}'",
                source_stem
            ))
        })?;
        tracing::debug!("Section bounds for '{}': rows {}..{}", source_stem, start, end);

        let section = &grid.rows()[start..end];
        let cleaned = filter_noise(section);
        tracing::debug!(
            "Noise filter kept {} of {} section rows",
            cleaned.len(),
            section.len()
        );

        let (columns, rows) = find_header_and_project(&cleaned).ok_or_else(|| {
            ExtractError::HeaderNotFound(format!(
                "no recognizable column header in '{}'",
                source_stem
            ))
        })?;

        tracing::info!(
            "Extracted {} records across {} columns from '{}'",
            rows.len(),
            columns.len(),
            source_stem
        );

        Ok(ProjectedTable {
            source_stem: source_stem.to_string(),
            columns,
            rows,
        })
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

    const TERMINATOR: &str = "All unpaid balance will be charged";

    #[test]
    fn test_locate_section_basic() {
        let grid = grid(&[
            &["x"],
            &["PO#", "Item"],
            &["P1", "Widget"],
            &[TERMINATOR],
        ]);
        assert_eq!(
            locate_section(&grid, MarkerPolicy::LastMatch),
            Some((1, 3))
        );
    }

    #[test]
    fn test_locate_section_no_marker() {
        let grid = grid(&[&["x"], &["y"], &[TERMINATOR]]);
        assert_eq!(locate_section(&grid, MarkerPolicy::LastMatch), None);
    }

    #[test]
    fn test_locate_section_no_terminator() {
        let grid = grid(&[&["PO#", "Item"], &["P1", "Widget"]]);
        assert_eq!(locate_section(&grid, MarkerPolicy::LastMatch), None);
    }

    #[test]
    fn test_locate_section_last_marker_wins() {
        let grid = grid(&[
            &["PO#", "Item"],
            &["filler"],
            &["po# repeated"],
            &[TERMINATOR],
        ]);
        assert_eq!(
            locate_section(&grid, MarkerPolicy::LastMatch),
            Some((2, 3))
        );
        assert_eq!(
            locate_section(&grid, MarkerPolicy::FirstMatch),
            Some((0, 3))
        );
    }

    #[test]
    fn test_locate_section_ignores_markers_after_terminator() {
        let grid = grid(&[&["PO#"], &[TERMINATOR], &["PO#"]]);
        assert_eq!(
            locate_section(&grid, MarkerPolicy::LastMatch),
            Some((0, 1))
        );
    }

    #[test]
    fn test_extract_end_to_end() {
        let grid = grid(&[
            &["x"],
            &["PO#", "Item"],
            &["buyer no", "123"],
            &["P1", "Widget"],
            &[TERMINATOR],
        ]);

        let extractor = SectionExtractor::new(MarkerPolicy::LastMatch);
        let table = extractor.extract(&grid, "sample").unwrap();

        assert_eq!(table.source_stem, "sample");
        assert_eq!(table.columns, vec!["PO#", "Item"]);
        assert_eq!(table.rows, vec![vec!["P1".to_string(), "Widget".to_string()]]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let grid = grid(&[
            &["PO#", "Item", "total"],
            &["P1", "Widget", "10"],
            &["P2", "Gadget", "20"],
            &[TERMINATOR],
        ]);

        let extractor = SectionExtractor::new(MarkerPolicy::LastMatch);
        let first = extractor.extract(&grid, "sample").unwrap();
        let second = extractor.extract(&grid, "sample").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_reports_missing_section() {
        let grid = grid(&[&["nothing"], &["here"]]);
        let extractor = SectionExtractor::new(MarkerPolicy::LastMatch);
        let result = extractor.extract(&grid, "sample");
        assert!(matches!(result, Err(ExtractError::SectionNotFound(_))));
    }

    #[test]
    fn test_extract_reports_missing_header() {
        // Section exists but every payload row is dropped before a header
        // keyword can be seen: the marker row is the only candidate and it
        // is removed by the drop-on-sight filter.
        let grid = grid(&[
            &["buyer no PO#"],
            &["plain row"],
            &[TERMINATOR],
        ]);
        let extractor = SectionExtractor::new(MarkerPolicy::LastMatch);
        let result = extractor.extract(&grid, "sample");
        assert!(matches!(result, Err(ExtractError::HeaderNotFound(_))));
    }
}
