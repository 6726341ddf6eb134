//! Error types for vertex-space conversion.

use mesh_types::SpatialReference;
use thiserror::Error;

/// Result type alias for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors that can occur while moving a mesh into a vertex space.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The mesh is expressed in a different system than the space origin.
    #[error("mesh spatial reference {mesh} does not match origin reference {origin}")]
    ReferenceMismatch {
        /// Reference of the mesh.
        mesh: SpatialReference,
        /// Reference of the space origin.
        origin: SpatialReference,
    },

    /// Local mode needs a geographic or Web Mercator origin.
    #[error("local vertex space requires a global spatial reference, got {0}")]
    NotGlobal(SpatialReference),

    /// A coordinate is not finite or lies outside the valid geographic range.
    #[error("vertex {vertex} has invalid coordinates ({x}, {y}, {z})")]
    InvalidCoordinate {
        /// Vertex index, or `usize::MAX` for the origin itself.
        vertex: usize,
        /// X / longitude / easting.
        x: f64,
        /// Y / latitude / northing.
        y: f64,
        /// Z / height.
        z: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpatialError::ReferenceMismatch {
            mesh: SpatialReference::new(2056),
            origin: SpatialReference::WGS84,
        };
        let msg = format!("{err}");
        assert!(msg.contains("wkid:2056"));
        assert!(msg.contains("wkid:4326"));

        let err = SpatialError::NotGlobal(SpatialReference::new(2056));
        assert!(format!("{err}").contains("global"));
    }
}
