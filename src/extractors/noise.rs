// src/extractors/noise.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::sheet::grid::row_text;

// --- Regex Patterns for Text Matching (Lazy Static) ---
// Label rows dropped wherever they occur inside the section.
static BUYER_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)buyer no").expect("Failed to compile BUYER_NO_RE"));

static CUST_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cust ref").expect("Failed to compile CUST_REF_RE"));

// Markers delimiting the diamond-weight detail block. The open marker is
// matched loosely ("dia w") since the source sheets vary the apostrophe in
// "Dia w't".
static SPAN_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)dia w").expect("Failed to compile SPAN_OPEN_RE"));

static SPAN_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)maklon").expect("Failed to compile SPAN_CLOSE_RE"));

/// State of the toggled-span filter while walking section rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanState {
    /// Rows flow through to the output.
    Passing,
    /// Rows are dropped until a close-marker row appears.
    Discarding,
}

/// Removes noise rows from the bounded section, preserving relative order.
///
/// Two passes over the slice:
/// 1. drop-on-sight: any row whose joined text contains a "buyer no" or
///    "cust ref" label is removed regardless of position;
/// 2. toggled span: an open-marker row switches the filter to
///    [`SpanState::Discarding`] and is itself dropped; a close-marker row
///    switches back to [`SpanState::Passing`] and is kept. A span left open
///    swallows every remaining row.
pub fn filter_noise(rows: &[Vec<String>]) -> Vec<&[String]> {
    let survivors = rows
        .iter()
        .map(Vec::as_slice)
        .filter(|row| !is_drop_on_sight(row));

    let mut state = SpanState::Passing;
    let mut kept: Vec<&[String]> = Vec::new();

    for row in survivors {
        let text = row_text(row);

        // The open marker takes priority: a row carrying both markers
        // opens the span and is dropped.
        if SPAN_OPEN_RE.is_match(&text) {
            state = SpanState::Discarding;
            continue;
        }
        if SPAN_CLOSE_RE.is_match(&text) {
            state = SpanState::Passing;
            kept.push(row);
            continue;
        }
        if state == SpanState::Passing {
            kept.push(row);
        }
    }

    kept
}

fn is_drop_on_sight(row: &[String]) -> bool {
    let text = row_text(row);
    BUYER_NO_RE.is_match(&text) || CUST_REF_RE.is_match(&text)
}
