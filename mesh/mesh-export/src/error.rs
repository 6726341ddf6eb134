//! Error types for the export pipeline.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Fatal export errors.
///
/// Recoverable conditions (a skipped layer, a merge that fell back to
/// per-component output, degenerate triangles) are not errors; they are
/// collected in [`crate::ExportReport`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// The cancellation signal fired.
    #[error("Export cancelled")]
    Cancelled,

    /// An input mesh could not be loaded.
    #[error("Failed to load {what}: {source}")]
    LoadFailure {
        /// Which input failed.
        what: String,
        /// Underlying decode or read error.
        #[source]
        source: mesh_io::IoError,
    },

    /// Nothing survived to be exported.
    #[error("No geometry found to export")]
    NoGeometryFound,

    /// Options failed validation.
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    /// The pipeline has already run.
    #[error("Export pipeline has already run (stage: {stage})")]
    AlreadyRun {
        /// Stage the pipeline was in.
        stage: String,
    },

    /// Extrusion failed.
    #[error("Extrusion failed: {0}")]
    Extrude(#[from] mesh_extrude::ExtrudeError),

    /// Vertex-space conversion failed.
    #[error("Vertex space error: {0}")]
    Spatial(#[from] mesh_spatial::SpatialError),

    /// Assembly or scene export failed.
    #[error("Assembly error: {0}")]
    Assembly(#[from] mesh_assembly::AssemblyError),

    /// Encoding failed.
    #[error("Mesh I/O error: {0}")]
    Io(#[from] mesh_io::IoError),
}

impl ExportError {
    /// Whether this is the cancellation outcome.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
