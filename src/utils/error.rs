// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheets: {}", .0.display())]
    NoWorksheet(PathBuf),

    #[error("Worksheet is empty: {}", .0.display())]
    EmptySheet(PathBuf),
}

/// Reasons a workbook fails the structural gate before extraction is attempted.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Grid too small ({rows} rows, {cols} columns)")]
    TooSmall { rows: usize, cols: usize },

    #[error("PO marker not found in the leading rows")]
    PoMarkerNotFound,

    #[error("No invoice data indicators found")]
    NoDataIndicators,

    #[error("No data rows after the PO marker row")]
    NoDataRows,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Header row not found: {0}")]
    HeaderNotFound(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Workbook read failed: {0}")]
    Sheet(#[from] SheetError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
