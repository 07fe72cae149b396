use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors surfaced by the loading, filtering and writing layers.
///
/// Each variant is a distinct failure cause so callers can branch on it
/// instead of matching message text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local input path does not exist.
    #[error("Input file '{}' does not exist.", path.display())]
    NotFound { path: PathBuf },

    /// Fetching a remote input failed (connection, HTTP status, timeout or body read).
    #[error("Error downloading '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The bytes were present but are not a readable parquet table.
    #[error("Error decoding '{location}': {source}")]
    Decode {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The table does not carry a usable distance column.
    #[error("Column '{column}' {reason}. Ensure file follows NYC Yellow Taxi data dictionary.")]
    Schema { column: String, reason: String },

    /// A caller-supplied parameter is out of range.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// An Arrow kernel failed on an already-decoded table.
    #[error("compute error: {0}")]
    Compute(#[from] ArrowError),

    /// Local file I/O on a temporary or output file.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the output parquet file failed.
    #[error("Error writing '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },
}

impl Error {
    pub(crate) fn decode(
        location: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Decode {
            location: location.into(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
