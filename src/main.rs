// src/main.rs
mod extractors;
mod intake;
mod sheet;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use extractors::{MarkerPolicy, SectionExtractor};
use intake::{scanner, FileCatalog};
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the invoice section extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory scanned for source workbooks (.xlsx/.xls/.xlsm)
    #[arg(short, long, default_value = "./master")]
    input_dir: PathBuf,

    /// Process a single workbook instead of scanning the input directory
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output directory for processed tables and metadata
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Directory for the intake catalog
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,

    /// Which PO-marker occurrence fixes the section start
    #[arg(long, value_enum, default_value_t = MarkerPolicy::LastMatch)]
    marker_policy: MarkerPolicy,

    /// Also write a JSON catalog of the scanned files
    #[arg(long)]
    catalog: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Initialize section extractor
    let extractor = SectionExtractor::new(args.marker_policy);

    // 5. Collect the workbooks to process
    let files = match &args.file {
        Some(path) => vec![path.clone()],
        None => scanner::scan_input_dir(&args.input_dir)?,
    };

    if files.is_empty() {
        tracing::warn!(
            "No workbooks found; place .xlsx/.xls/.xlsm files in {}",
            args.input_dir.display()
        );
        return Ok(());
    }

    // 6. Process each workbook
    let mut success_count = 0;
    let mut failure_count = 0;
    let mut catalog_entries = Vec::new();

    for path in &files {
        tracing::info!("Processing workbook: {}", path.display());

        let grid = match sheet::read_grid(path) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::error!("Cannot read {}: {}", path.display(), e);
                catalog_entries.push(scanner::file_info(path, false, e.to_string()));
                failure_count += 1;
                continue;
            }
        };

        if let Err(e) = scanner::validate_grid(&grid) {
            tracing::warn!("Skipping invalid workbook {}: {}", path.display(), e);
            catalog_entries.push(scanner::file_info(path, false, e.to_string()));
            failure_count += 1;
            continue;
        }
        catalog_entries.push(scanner::file_info(
            path,
            true,
            format!(
                "File valid - {} rows, {} columns",
                grid.row_count(),
                grid.col_count()
            ),
        ));

        let stem = workbook_stem(path);
        match extractor.extract(&grid, &stem) {
            Ok(table) => match storage.save_table(&table) {
                Ok(output_path) => {
                    tracing::info!("Processed: {} => {}", path.display(), output_path.display());
                    success_count += 1;

                    if let Err(e) = storage.save_table_metadata(&table) {
                        tracing::error!("Failed to save metadata for {}: {}", stem, e);
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to save output for {}: {}", path.display(), e);
                    failure_count += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Skipped {}: {}", path.display(), e);
                failure_count += 1;
            }
        }
    }

    // 7. Optionally write the intake catalog
    if args.catalog {
        let catalog = FileCatalog::new(catalog_entries);
        match storage::save_catalog(&args.log_dir, &catalog) {
            Ok(path) => tracing::info!("Catalog written to {}", path.display()),
            Err(e) => tracing::error!("Failed to write catalog: {}", e),
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any invoice tables from {} workbook(s)",
            failure_count
        )));
    }

    Ok(())
}

/// Output name stem derived from the source file name.
fn workbook_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string())
}
