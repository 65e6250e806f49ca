//! Column layout of the raw registry export and of the prepared artifact.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::error::{RegistryError, Result};

/// Number of columns the raw registry export must provide
pub const RAW_COLUMN_COUNT: usize = 28;

/// Owner age value meaning "unknown"
pub const UNKNOWN_OWNER_AGE: i64 = 999;

/// Prepared column: reporting year
pub const YEAR: &str = "Year";
/// Prepared column: owner age bracket
pub const OWNER_AGE: &str = "Age of dog owner";
/// Prepared column: owner gender code
pub const OWNER_GENDER: &str = "Gender of dog owner";
/// Prepared column: owner's city district
pub const DISTRICT: &str = "City district dog owner";
/// Prepared column: primary breed
pub const BREED: &str = "Primary breed of dog";
/// Prepared column: pedigree / mixed-breed label
pub const MIXED_BREED: &str = "Mixed breed";
/// Prepared column: dog birth year
pub const DOG_BIRTH_YEAR: &str = "Year of birth of the dog";
/// Prepared column: dog age
pub const DOG_AGE: &str = "Age of the dog";
/// Prepared column: dog gender code
pub const DOG_GENDER: &str = "Code gender of the dog";

/// A retained column: where it sits in the raw export and what it becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// 0-based position in the raw export
    pub raw_position: usize,
    /// Header in the prepared artifact
    pub name: &'static str,
    /// Whether the prepared column holds integer codes (otherwise text)
    pub integer: bool,
}

impl ColumnMapping {
    const fn new(raw_position: usize, name: &'static str, integer: bool) -> Self {
        Self {
            raw_position,
            name,
            integer,
        }
    }

    /// Arrow data type of the prepared column
    #[must_use]
    pub fn data_type(&self) -> DataType {
        if self.integer {
            DataType::Int64
        } else {
            DataType::Utf8
        }
    }
}

/// Retained columns, in prepared order
pub const PREPARED_COLUMNS: [ColumnMapping; 9] = [
    ColumnMapping::new(0, YEAR, true),
    ColumnMapping::new(3, OWNER_AGE, true),
    ColumnMapping::new(8, OWNER_GENDER, true),
    ColumnMapping::new(13, DISTRICT, false),
    ColumnMapping::new(15, BREED, false),
    ColumnMapping::new(18, MIXED_BREED, false),
    ColumnMapping::new(23, DOG_BIRTH_YEAR, true),
    ColumnMapping::new(24, DOG_AGE, true),
    ColumnMapping::new(27, DOG_GENDER, true),
];

/// Header names of the prepared artifact, in order
#[must_use]
pub fn prepared_header() -> Vec<&'static str> {
    PREPARED_COLUMNS.iter().map(|c| c.name).collect()
}

/// Typed schema of the prepared artifact
#[must_use]
pub fn prepared_schema() -> SchemaRef {
    let fields: Vec<Field> = PREPARED_COLUMNS
        .iter()
        .map(|c| Field::new(c.name, c.data_type(), true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Schema that reads every raw column as text, keeping the raw header names
#[must_use]
pub fn raw_text_schema(names: &[String]) -> SchemaRef {
    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Check that a raw header is wide enough to hold every retained position
pub fn check_raw_header(names: &[String]) -> Result<()> {
    if names.len() < RAW_COLUMN_COUNT {
        return Err(RegistryError::data_format(format!(
            "raw dataset has {} columns, expected at least {RAW_COLUMN_COUNT}",
            names.len()
        )));
    }
    Ok(())
}

/// Check that a header matches the prepared artifact exactly
pub fn check_prepared_header(names: &[String]) -> Result<()> {
    let expected = prepared_header();
    if names.len() != expected.len() {
        return Err(RegistryError::data_format(format!(
            "prepared artifact has {} columns, expected {}",
            names.len(),
            expected.len()
        )));
    }

    let issues: Vec<String> = names
        .iter()
        .zip(expected)
        .enumerate()
        .filter(|(_, (actual, expected))| actual.as_str() != *expected)
        .map(|(idx, (actual, expected))| format!("column {idx} is '{actual}', expected '{expected}'"))
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::data_format(format!(
            "prepared artifact header mismatch: {}",
            issues.join("; ")
        )))
    }
}
