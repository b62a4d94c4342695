// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::ProjectedTable;
use crate::intake::FileCatalog;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes the projected table as `processed_<stem>.csv`.
    ///
    /// The CSV bytes are fully materialized in memory before a single
    /// write, so a serialization failure leaves no partial artifact on
    /// disk.
    pub fn save_table(&self, table: &ProjectedTable) -> Result<PathBuf, StorageError> {
        let file_path = self
            .base_dir
            .join(format!("processed_{}.csv", table.source_stem));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&table.columns)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, bytes).map_err(StorageError::IoError)?;

        tracing::info!("Saved table to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves a JSON sidecar describing the extraction
    pub fn save_table_metadata(&self, table: &ProjectedTable) -> Result<PathBuf, StorageError> {
        let file_path = self
            .base_dir
            .join(format!("processed_{}_meta.json", table.source_stem));

        let metadata = serde_json::json!({
            "source": table.source_stem,
            "columns": table.columns,
            "row_count": table.rows.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

/// Writes the intake catalog under a timestamped name in the log directory.
pub fn save_catalog(log_dir: &Path, catalog: &FileCatalog) -> Result<PathBuf, StorageError> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir).map_err(StorageError::IoError)?;
    }

    let file_path = log_dir.join(format!(
        "file_catalog_{}.json",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));

    let catalog_str = serde_json::to_string_pretty(catalog)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    fs::write(&file_path, catalog_str).map_err(StorageError::IoError)?;

    tracing::info!("Saved catalog to {}", file_path.display());

    Ok(file_path)
}
