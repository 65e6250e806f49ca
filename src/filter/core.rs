//! Core filtering functionality for record batches
//!
//! This module defines the batch filtering trait and the mask application
//! shared by every filter.

use std::collections::HashSet;

use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;

use crate::error::{RegistryError, Result};

/// Filter a record batch based on a boolean mask
///
/// Rows whose mask entry is false or null are dropped.
///
/// # Errors
/// Returns an error if the mask length differs from the batch row count
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(RegistryError::data_format(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    Ok(arrow::compute::filter_record_batch(batch, mask)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;

    /// Check that every required column is present in `batch`
    fn check_columns(&self, batch: &RecordBatch) -> Result<()> {
        let schema = batch.schema();
        let mut missing: Vec<String> = self
            .required_columns()
            .into_iter()
            .filter(|name| schema.index_of(name).is_err())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(RegistryError::data_format(format!(
            "Filter requires missing columns: {}",
            missing.join(", ")
        )))
    }
}
