//! Module for reading the raw registry export and the prepared artifact.

use std::fs::File;
use std::path::Path;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::error::{IoResultExt, RegistryError, Result};
use crate::schema::{check_prepared_header, check_raw_header, prepared_schema, raw_text_schema};

/// Rows per record batch when reading CSV files
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Read the header row of a CSV file
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_path(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(file, Some(0))
        .map_err(|e| csv_error(path, e))?;
    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Read the raw registry export with every column as text
///
/// # Errors
/// Returns `DataFormat` if the header has fewer columns than the retained
/// positions need, or if a row does not match the header width.
pub fn read_raw(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let header = read_header(path)?;
    check_raw_header(&header)?;

    let schema = raw_text_schema(&header);
    let batches = read_batches(path, schema.clone())?;
    Ok((schema, batches))
}

/// Read the prepared artifact into a single typed record batch
///
/// # Errors
/// Returns `DataFormat` if the header differs from the prepared header or if
/// an integer column holds a non-numeric value.
pub fn read_prepared(path: &Path) -> Result<RecordBatch> {
    let header = read_header(path)?;
    check_prepared_header(&header)?;

    let schema = prepared_schema();
    let batches = read_batches(path, schema.clone())?;
    Ok(concat_batches(&schema, &batches)?)
}

fn read_batches(path: &Path, schema: SchemaRef) -> Result<Vec<RecordBatch>> {
    let file = File::open(path).with_path(path)?;
    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)
        .map_err(|e| csv_error(path, e))?;

    reader
        .map(|batch| batch.map_err(|e| csv_error(path, e)))
        .collect()
}

/// Classify CSV reader failures: malformed content is a data format problem
fn csv_error(path: &Path, error: ArrowError) -> RegistryError {
    match error {
        ArrowError::ParseError(msg) | ArrowError::CsvError(msg) => {
            RegistryError::data_format(format!("{}: {msg}", path.display()))
        }
        ArrowError::IoError(_, source) => RegistryError::io(path, source),
        other => RegistryError::Arrow(other),
    }
}
