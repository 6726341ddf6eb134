//! Export a terrain region and its features as a printable solid.
//!
//! This umbrella crate re-exports the mesh-* crates behind one import. Each
//! crate can also be used on its own.
//!
//! # Quick Start
//!
//! ```
//! use mesh::prelude::*;
//!
//! let square = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! );
//!
//! // Close the surface into a box with its base at z = -10
//! let result = ExtrudeBuilder::new(&square).bottom_elevation(-10.0).build().unwrap();
//! assert_eq!(result.mesh.face_count(), 12);
//!
//! // Encode it
//! let stl = encode_stl(&result.mesh, &StlOptions::default()).unwrap();
//! assert_eq!(stl.len(), 84 + 12 * 50);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `IndexedMesh`, `Vertex`, `MeshComponent`,
//!   `SpatialReference`
//! - [`extrude`] - Boundary edges, terrain-to-solid extrusion, solid validation
//! - [`spatial`] - WGS-84 / Web Mercator / ECEF / ENU conversion, vertex spaces
//! - [`io`] - Binary and ASCII STL
//! - [`assembly`] - Scene merging, attribute normalization, origin marker,
//!   scene export
//! - [`export`] - The async, cancellable export pipeline

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc(html_root_url = "https://docs.rs/mesh/0.7.0")]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures.
pub use mesh_types as types;

/// Boundary edges and terrain extrusion.
pub use mesh_extrude as extrude;

/// Coordinate systems and vertex spaces.
pub use mesh_spatial as spatial;

/// STL encoding and decoding.
pub use mesh_io as io;

/// Scene merging and export.
pub use mesh_assembly as assembly;

/// Async export pipeline.
pub use mesh_export as export;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports.
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        Aabb, IndexedMesh, Material, MeshBounds, MeshComponent, MeshTopology, SpatialReference,
        Triangle, Vertex,
    };

    // Extrusion
    pub use mesh_extrude::{ExtrudeBuilder, ExtrudeParams, extrude_solid, find_boundary_edges};

    // Vertex spaces
    pub use mesh_spatial::{Origin, VertexSpace, normalize_mesh};

    // STL
    pub use mesh_io::{StlOptions, decode_stl, encode_stl};

    // Scene
    pub use mesh_assembly::{Assembly, Part, SceneExport, export_scene, normalize_attributes};

    // Pipeline
    pub use mesh_export::{
        CancelHandle, CancelToken, ExportFormat, ExportOptions, ExportOutput, ExportPipeline,
        ExportRequest,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::IndexedMesh::new();
        let _ = extrude::ExtrudeParams::default();
        let _ = io::StlOptions::default();
        let _ = export::ExportOptions::default();
    }
}
