//! Bulk CSV ingestion: parse, validate, normalize, stage, commit.
//!
//! The pipeline is fail-fast and all-or-nothing. Every row of the upload is
//! validated and normalized in memory before the store sees anything, so a
//! bad row anywhere means zero records committed.

mod rows;

pub use rows::read_rows;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{DirectoryError, DirectoryResult};
use crate::record::{self, columns, Winery};
use crate::store::{BatchReceipt, DirectoryStore};

/// Parse and validate CSV input into a staged sequence of records, in file
/// order.
///
/// The first row missing any required field aborts the whole upload; the
/// error names the row's 1-based position and every required field it lacks,
/// not just the first one found.
pub fn stage<R: std::io::Read>(input: R) -> DirectoryResult<Vec<Winery>> {
    let rows = rows::read_rows(input)?;
    let mut staged = Vec::with_capacity(rows.len());
    for row in &rows {
        let missing = record::require_fields(row, &columns::REQUIRED);
        if !missing.is_empty() {
            return Err(DirectoryError::MissingFields {
                row: row.row,
                missing,
            });
        }
        staged.push(record::normalize_row(row));
    }
    Ok(staged)
}

/// Drives uploads end to end against an injected store handle.
pub struct CsvImporter {
    store: Arc<DirectoryStore>,
}

impl CsvImporter {
    pub fn new(store: Arc<DirectoryStore>) -> Self {
        Self { store }
    }

    /// Import a CSV file from disk. The file name becomes the receipt's
    /// source label.
    pub async fn import_path(&self, path: &Path) -> DirectoryResult<BatchReceipt> {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        self.import_reader(file, &source).await
    }

    /// Run the full pipeline over arbitrary CSV input.
    pub async fn import_reader<R: std::io::Read>(
        &self,
        input: R,
        source: &str,
    ) -> DirectoryResult<BatchReceipt> {
        let staged = stage(input)?;
        info!(records = staged.len(), source, "upload staged, committing");
        self.store.commit_batch(staged, source).await
    }
}
