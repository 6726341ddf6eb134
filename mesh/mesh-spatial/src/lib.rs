//! Vertex-space normalization for exported meshes.
//!
//! Scene meshes arrive in whatever system the scene uses: geographic
//! WGS-84 degrees, Web Mercator metres, or a projected system such as a
//! national grid. Before they can be extruded and merged they are moved into
//! one shared frame anchored at an export origin:
//!
//! - [`VertexSpace::Local`] for global systems: every vertex goes through
//!   geodetic coordinates and ECEF into east/north/up metres at the origin.
//! - [`VertexSpace::Georeferenced`] for everything else: a plain translation
//!   by the origin, keeping the projection's linear unit.
//!
//! # Layer 1
//!
//! Depends only on `mesh-types` and `nalgebra`.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Point3, SpatialReference};
//! use mesh_spatial::{normalize_mesh, Origin, VertexSpace};
//!
//! let origin = Origin::new(Point3::new(8.0, 47.0, 0.0), SpatialReference::WGS84);
//! let space = VertexSpace::select(origin);
//!
//! let mesh = IndexedMesh::from_raw(
//!     &[8.0, 47.0, 0.0, 8.001, 47.0, 0.0, 8.0, 47.001, 0.0],
//!     &[0, 1, 2],
//! )
//! .with_spatial_reference(SpatialReference::WGS84);
//!
//! let local = normalize_mesh(&mesh, &space).unwrap();
//! assert!(local.vertices[0].position.coords.norm() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
pub mod geodesy;
mod space;

pub use error::{SpatialError, SpatialResult};
pub use geodesy::{EnuFrame, wgs84};
pub use space::{Origin, SpaceTransform, VertexSpace, normalize_mesh};
