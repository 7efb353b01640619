//! Error types for material library I/O and lookup

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MtlError>;

/// Material library errors
///
/// Parsing never produces an error for malformed content; only I/O, lookup
/// and argument failures are reported.
#[derive(Error, Debug)]
pub enum MtlError {
    /// Source could not be opened or read
    #[error("Failed to open '{}' for reading: {source}", path.display())]
    Open {
        /// Path of the source (`<reader>` for in-memory readers)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Destination could not be created or written
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// Destination path (`<writer>` for caller-supplied writers)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Save requested without a path and none was associated on open
    #[error("No path given and no path associated with this material file")]
    NoSavePath,

    /// Indexed lookup of an absent material
    #[error("Material not found: {0}")]
    NotFound(String),

    /// Argument rejected before any I/O took place
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MtlError {
    /// Placeholder path reported for reader and writer based I/O
    pub(crate) fn stream_path(label: &str) -> PathBuf {
        PathBuf::from(format!("<{label}>"))
    }

    /// True for failures opening or reading a source
    pub fn is_open_error(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// True for failures writing a destination, including a missing save path
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::NoSavePath)
    }
}
