//! Semicolon-delimited flat-file storage.
//!
//! Every file starts with one header line followed by one record per line.
//! Reads are positional and lenient: records that cannot be read are skipped
//! by the caller with a warning. Writes overwrite the whole file.

pub mod inventory;
pub mod loan_log;
pub mod return_log;
pub mod user_log;

pub use inventory::CsvInventory;

use csv::{Reader, ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::{self, File};
use std::path::Path;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Field delimiter shared by all four files
pub const DELIMITER: u8 = b';';

/// Open a delimited file for reading, treating the first line as a header
pub(crate) fn open_reader(path: &Path) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    Ok(reader)
}

/// Create (or truncate) a delimited file and write its header line
///
/// Missing parent directories are created.
pub(crate) fn create_writer(path: &Path, header: &[&str]) -> Result<Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

/// Trimmed field at `index`, or None if the record is too short
///
/// For numeric and date columns.
pub(crate) fn field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).map(str::trim)
}

/// Untrimmed field at `index`, for free-text columns such as titles
pub(crate) fn raw_field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index)
}

/// Read every record of a file, skipping unreadable ones with a warning
pub(crate) fn read_records(path: &Path) -> Result<Vec<StringRecord>> {
    let mut reader = open_reader(path)?;
    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(
                "Skipping unreadable record {} in {}: {}",
                index + 1,
                path.display(),
                e
            ),
        }
    }

    Ok(records)
}
