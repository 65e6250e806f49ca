//! Preparation of the raw registry export
//!
//! The raw export is projected onto the nine retained columns, cast to the
//! prepared types, stripped of rows whose owner age is the "unknown" sentinel
//! and written out under the human-readable header. The whole table is built
//! in memory before the artifact is written in one go.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::compute::{CastOptions, cast_with_options, concat_batches};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;

use crate::error::{IoResultExt, RegistryError, Result};
use crate::filter::{BatchFilter, Expr};
use crate::reader::read_raw;
use crate::schema::{
    ColumnMapping, OWNER_AGE, PREPARED_COLUMNS, RAW_COLUMN_COUNT, UNKNOWN_OWNER_AGE,
    prepared_schema,
};
use crate::utils::{log_operation_complete, log_operation_start};

/// Row counts of a preparation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreparationStats {
    /// Rows in the raw export
    pub rows_read: usize,
    /// Rows removed because the owner age was unknown
    pub rows_dropped: usize,
    /// Rows in the prepared artifact
    pub rows_written: usize,
}

/// Prepare the raw export at `raw_path` and write the artifact to `prepared_path`
///
/// Any existing artifact at `prepared_path` is overwritten.
pub fn prepare_dataset(raw_path: &Path, prepared_path: &Path) -> Result<PreparationStats> {
    let start = Instant::now();
    log_operation_start("Reading raw dataset", raw_path);

    let (_, batches) = read_raw(raw_path)?;
    let rows_read = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", raw_path, rows_read, Some(start.elapsed()));

    let prepared = prepare_batches(&batches)?;
    let stats = PreparationStats {
        rows_read,
        rows_dropped: rows_read - prepared.num_rows(),
        rows_written: prepared.num_rows(),
    };
    log::info!(
        "Dropped {} rows with unknown owner age ({UNKNOWN_OWNER_AGE})",
        stats.rows_dropped
    );

    log_operation_start("Writing prepared dataset", prepared_path);
    write_prepared(prepared_path, &prepared)?;
    log_operation_complete("wrote", prepared_path, stats.rows_written, Some(start.elapsed()));

    Ok(stats)
}

/// Prepare every raw batch and combine the results into one table
pub fn prepare_batches(batches: &[RecordBatch]) -> Result<RecordBatch> {
    let prepared = batches
        .iter()
        .map(prepare_batch)
        .collect::<Result<Vec<_>>>()?;
    Ok(concat_batches(&prepared_schema(), &prepared)?)
}

/// Project, cast and filter a single raw batch
///
/// # Errors
/// Returns `DataFormat` if the batch is narrower than the raw layout or a
/// retained integer column holds a non-numeric value.
pub fn prepare_batch(raw: &RecordBatch) -> Result<RecordBatch> {
    if raw.num_columns() < RAW_COLUMN_COUNT {
        return Err(RegistryError::data_format(format!(
            "raw batch has {} columns, expected at least {RAW_COLUMN_COUNT}",
            raw.num_columns()
        )));
    }

    let columns = PREPARED_COLUMNS
        .iter()
        .map(|mapping| cast_column(raw.column(mapping.raw_position), mapping))
        .collect::<Result<Vec<_>>>()?;
    let projected = RecordBatch::try_new(prepared_schema(), columns)?;

    Expr::not_eq_int(OWNER_AGE, UNKNOWN_OWNER_AGE).filter(&projected)
}

fn cast_column(column: &ArrayRef, mapping: &ColumnMapping) -> Result<ArrayRef> {
    // A failed parse must surface instead of turning into a null
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(column, &mapping.data_type(), &options).map_err(|e| {
        RegistryError::data_format(format!(
            "column '{}' (raw position {}): {e}",
            mapping.name, mapping.raw_position
        ))
    })
}

/// Write a prepared table as CSV with its header row
pub fn write_prepared(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).with_path(path)?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(batch)?;

    let mut buffer = writer.into_inner();
    buffer.flush().with_path(path)?;
    Ok(())
}
