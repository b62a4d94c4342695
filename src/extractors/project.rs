// src/extractors/project.rs

// --- Imports ---
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sheet::grid::row_text;

// The header row is recognized by any of these column keywords appearing in
// its joined text.
static HEADER_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)po#|item|metal|qty|w't|maklon|total")
        .expect("Failed to compile HEADER_KEYWORDS_RE")
});

/// The fixed set of column labels the output table may contain, in output
/// order. Labels are matched against header cells exactly (case-sensitive).
pub const ALLOWED_LABELS: [&str; 8] = [
    "PO#",
    "Item",
    "No.",
    "Metal",
    "Q'ty",
    "Total w't",
    "maklon",
    "total",
];

/// Locates the header row and projects everything after it onto the
/// allowed labels.
///
/// The first row whose joined text contains a header keyword becomes the
/// header; its cell values bind positionally as labels, with a repeated
/// label resolving to its last column. Returns the found subset of
/// [`ALLOWED_LABELS`] (in allow-list order) and one record per following
/// row; labels missing from the header are simply absent from the output.
/// `None` means no row looked like a header at all.
pub fn find_header_and_project(rows: &[&[String]]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let header_index = rows
        .iter()
        .position(|row| HEADER_KEYWORDS_RE.is_match(&row_text(row)))?;
    let header = rows[header_index];

    // Positional label binding; inserting in column order makes the last
    // duplicate shadow earlier ones.
    let mut label_columns: HashMap<&str, usize> = HashMap::new();
    for (column, label) in header.iter().enumerate() {
        label_columns.insert(label.as_str(), column);
    }

    let columns: Vec<String> = ALLOWED_LABELS
        .iter()
        .filter(|label| label_columns.contains_key(**label))
        .map(|label| label.to_string())
        .collect();
    let indices: Vec<usize> = columns
        .iter()
        .map(|label| label_columns[label.as_str()])
        .collect();

    let records: Vec<Vec<String>> = rows[header_index + 1..]
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|&column| row.get(column).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Some((columns, records))
}
