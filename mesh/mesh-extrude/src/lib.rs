//! Close open surfaces into printable solids.
//!
//! A terrain surface is an open sheet of triangles. To print it, it needs a
//! flat base and side walls joining the base to the surface outline. This
//! crate finds that outline (the boundary edges) and builds the solid.
//!
//! # Layer 1
//!
//! Depends only on `mesh-types`.
//!
//! # Quick Start with `ExtrudeBuilder`
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology};
//! use mesh_extrude::ExtrudeBuilder;
//!
//! // Flat unit square
//! let square = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! );
//!
//! let result = ExtrudeBuilder::new(&square)
//!     .bottom_elevation(-10.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(result.mesh.face_count(), 12);
//! assert!(result.stats.validation.unwrap().is_valid());
//! ```
//!
//! # Low-Level API
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_extrude::{find_boundary_edges, extrude_solid, validate_solid, ExtrudeParams};
//!
//! let tri = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
//! assert_eq!(find_boundary_edges(&tri.faces).len(), 3);
//!
//! let params = ExtrudeParams { validate_after_generation: false, ..ExtrudeParams::below_min(2.0) };
//! let (solid, _) = extrude_solid(&tri, &params).unwrap();
//! assert!(validate_solid(&solid).is_printable());
//! ```
//!
//! # Orientation
//!
//! Walls take their direction from the top triangle that owns each boundary
//! edge, so they agree with the surface winding. A CCW (viewed from above)
//! surface yields an outward-facing solid; a CW surface is detected by its
//! negative signed volume and flipped.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod boundary;
mod builder;
mod error;
mod extrude;

pub use error::{ExtrudeError, ExtrudeResult};

// Builder API
pub use builder::{ExtrudeBuildResult, ExtrudeBuilder};

// Boundary analysis
pub use boundary::{
    EdgeCounts, boundary_edge_count, edge_key, find_boundary_edges, find_boundary_edges_checked,
};

// Extrusion and validation
pub use extrude::{
    BottomElevation, ExtrudeParams, ExtrusionStats, SolidIssue, SolidValidation, bottom_faces,
    extrude_solid, validate_solid, wall_faces,
};
