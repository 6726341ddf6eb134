//! Error types for mesh I/O operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during mesh I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Buffer too short to hold a binary STL header.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual header size.
        got: usize,
    },

    /// Binary STL ends before the declared number of triangles.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Declared number of faces.
        expected: u32,
        /// Faces actually present.
        got: u32,
    },

    /// A face of the mesh being written refers to a missing vertex.
    #[error("face {face} references missing vertex {index}")]
    InvalidIndex {
        /// Offending face.
        face: usize,
        /// Out-of-range vertex index.
        index: u32,
    },

    /// Encoder options are unusable.
    #[error("invalid STL options: {0}")]
    InvalidOptions(String),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::invalid_content("no facets");
        assert!(format!("{err}").contains("no facets"));

        let err = IoError::InvalidFaceCount {
            expected: 10,
            got: 4,
        };
        assert!(format!("{err}").contains("expected 10"));

        let err = IoError::InvalidIndex { face: 2, index: 7 };
        assert!(format!("{err}").contains("vertex 7"));
    }
}
