// src/intake/models.rs
use std::path::PathBuf;

use serde::Serialize;

/// Catalog entry for one scanned workbook.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Last-modified time, when the filesystem provides one.
    pub modified: Option<String>,
    pub is_valid: bool,
    pub validation_message: String,
}

/// Summary of an intake scan, serialized to JSON alongside the logs.
#[derive(Debug, Serialize)]
pub struct FileCatalog {
    pub scan_date: String,
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub total_size_bytes: u64,
    pub files: Vec<FileInfo>,
}

impl FileCatalog {
    /// Builds a catalog from per-file entries, totalling the counters.
    pub fn new(files: Vec<FileInfo>) -> Self {
        let valid_files = files.iter().filter(|f| f.is_valid).count();
        Self {
            scan_date: chrono::Local::now().to_rfc3339(),
            total_files: files.len(),
            valid_files,
            invalid_files: files.len() - valid_files,
            total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
            files,
        }
    }
}
