//! CSV import/export for datasets

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::constants::{DEFAULT_DELIMITER, DEFAULT_SUPPRESSION_MARKER};
use crate::error::{BenchError, BenchResult};
use super::cell::Cell;
use super::handle::{DataHandle, Dataset};

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Cells equal to this string load as `Cell::Suppressed`.
    /// Leave `None` for untransformed input data.
    pub suppression_marker: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            suppression_marker: None,
        }
    }
}

impl CsvOptions {
    /// Options for reading anonymized output
    pub fn output(delimiter: u8, marker: &str) -> Self {
        Self {
            delimiter,
            suppression_marker: Some(marker.to_string()),
        }
    }
}

/// Read a dataset with a header row from any reader
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> BenchResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if columns.is_empty() {
        return Err(BenchError::empty("CSV file has no header"));
    }

    let marker = options.suppression_marker.as_deref();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| Cell::parse(v, marker)).collect());
    }

    Dataset::new(columns, rows)
}

pub fn load_csv(path: &Path, options: &CsvOptions) -> BenchResult<Dataset> {
    let file = File::open(path)?;
    let dataset = read_csv(file, options)?;
    log::info!(
        "Loaded {} ({} rows x {} columns)",
        path.display(),
        dataset.num_rows(),
        dataset.num_columns()
    );
    Ok(dataset)
}

/// Write a dataset; suppressed cells are rendered as `marker`
pub fn write_csv<W: Write>(
    dataset: &impl DataHandle,
    writer: W,
    delimiter: u8,
    marker: Option<&str>,
) -> BenchResult<()> {
    let marker = marker.unwrap_or(DEFAULT_SUPPRESSION_MARKER);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(dataset.attribute_names())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(|c| c.render(marker)))?;
    }
    writer.flush()?;
    Ok(())
}
