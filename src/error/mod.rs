//! Error handling for the dog registry pipeline.

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;

/// Errors raised while preparing the registry data or building reports
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A file could not be opened, created or written
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path of the file involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The input does not have the expected layout or contains malformed values
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// An aggregation had nothing to compute a share over
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Arrow compute or CSV error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart rendering failed
    #[error("Render error: {0}")]
    Render(String),
}

impl RegistryError {
    /// Wrap an IO error together with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a data format error
    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat(message.into())
    }

    /// Create an empty dataset error
    pub fn empty_dataset(message: impl Into<String>) -> Self {
        Self::EmptyDataset(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Extension trait to attach a path to IO results
pub trait IoResultExt<T> {
    /// Convert an IO error into a [`RegistryError::Io`] naming `path`
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| RegistryError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err: Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
            .with_path("/tmp/dataset.csv");
        let message = err.unwrap_err().to_string();
        assert!(message.contains("/tmp/dataset.csv"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            RegistryError::empty_dataset("no rows"),
            RegistryError::EmptyDataset(_)
        ));
        assert_eq!(
            RegistryError::data_format("bad").to_string(),
            "Data format error: bad"
        );
    }
}
