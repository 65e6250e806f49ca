//! Arrow data handling utilities
//!
//! Helpers for locating columns in record batches and viewing them as the
//! concrete array types the prepared schema promises.

pub mod array_utils;

pub use array_utils::{column_by_name, downcast_array, int64_column, string_column};
