//! Error types for assembly operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors that can occur while assembling or exporting a scene.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Part with the given ID already exists.
    #[error("Part '{id}' already exists in assembly")]
    DuplicatePart {
        /// The duplicate part ID.
        id: String,
    },

    /// Meshes could not be combined into one buffer.
    ///
    /// Recoverable: callers fall back to exporting each component on its own.
    #[error("Cannot merge meshes: {reason}")]
    MergeFailure {
        /// What made the inputs incompatible.
        reason: String,
    },

    /// The scene contains no triangles to export.
    #[error("No geometry found to export")]
    NoGeometryFound,

    /// I/O error while writing exported files.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Mesh encoding error.
    #[error("Mesh I/O error: {0}")]
    MeshIo(#[from] mesh_io::IoError),
}

impl AssemblyError {
    /// Shorthand for a [`AssemblyError::MergeFailure`].
    pub fn merge_failure(reason: impl Into<String>) -> Self {
        Self::MergeFailure {
            reason: reason.into(),
        }
    }
}
