//! Utilities for working with Arrow arrays.
//!
//! This module provides functions for safely locating and downcasting
//! columns of a record batch, turning layout problems into format errors.

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;

use crate::error::{RegistryError, Result};

/// Get a column from a record batch by name
///
/// # Errors
/// Returns a `DataFormat` error if the column does not exist
pub fn column_by_name<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    let idx = batch.schema().index_of(column_name).map_err(|_| {
        RegistryError::data_format(format!("Column '{column_name}' not found"))
    })?;
    Ok(batch.column(idx))
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        RegistryError::data_format(format!(
            "Column '{column_name}' is not a {expected_type_name} array (found {})",
            array.data_type()
        ))
    })
}

/// Look up an integer column
pub fn int64_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a Int64Array> {
    downcast_array(column_by_name(batch, column_name)?, column_name, "Int64")
}

/// Look up a text column
pub fn string_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a StringArray> {
    downcast_array(column_by_name(batch, column_name)?, column_name, "Utf8")
}
