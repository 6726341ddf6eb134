//! Error types for extrusion.

use thiserror::Error;

/// Result type alias for extrusion operations.
pub type ExtrudeResult<T> = Result<T, ExtrudeError>;

/// Errors that can occur while closing a surface into a solid.
#[derive(Debug, Error)]
pub enum ExtrudeError {
    /// Bottom elevation lies above the lowest surface vertex, or is not finite.
    #[error("bottom elevation {bottom} is invalid for surface with minimum z {min_z}")]
    InvalidBottom {
        /// Requested bottom elevation.
        bottom: f64,
        /// Lowest z of the top surface.
        min_z: f64,
    },

    /// A face refers to a vertex that does not exist.
    #[error("face {face} references vertex {index}, but mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Offending face.
        face: usize,
        /// Out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

impl ExtrudeError {
    /// Create an invalid bottom error.
    #[must_use]
    pub const fn invalid_bottom(bottom: f64, min_z: f64) -> Self {
        Self::InvalidBottom { bottom, min_z }
    }
}
