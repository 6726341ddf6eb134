//! Core mesh types for terrain print export.
//!
//! This crate provides the data model shared by every stage of the export
//! pipeline:
//!
//! - [`Vertex`] - A point in 3D space with optional normal, uv and color
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices, named
//!   components and a spatial reference
//! - [`MeshComponent`] - A named, materialed slice of a mesh's faces
//! - [`SpatialReference`] - The coordinate system a mesh's vertices live in
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This crate has no dependencies beyond `nalgebra` (and optionally `serde`).
//! Every other crate in the workspace builds on it.
//!
//! # Units
//!
//! All coordinates are `f64`. Geographic meshes keep degrees and metres in
//! the same buffer until `mesh-spatial` moves them into a local frame.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. Face winding is **counter-clockwise (CCW) when viewed
//! from outside**, so a terrain surface seen from above is CCW.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.component_count(), 1); // implicit component
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod component;
mod mesh;
mod spatial_reference;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use component::{Material, MeshComponent};
pub use mesh::{IndexedMesh, unit_cube};
pub use spatial_reference::SpatialReference;
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
