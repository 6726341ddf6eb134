//! Scene assembly, attribute normalization and STL scene export.
//!
//! This crate takes meshes that already live in one local frame (the
//! extruded terrain, feature meshes, an origin marker) and turns them into
//! something a printer slicer can read.
//!
//! # Merging
//!
//! An [`Assembly`] is an ordered list of [`Part`]s. [`Assembly::to_merged_mesh`]
//! concatenates them into one [`IndexedMesh`]: vertex indices are offset by
//! the vertices already merged, and each source component keeps its name and
//! material as a separate face range. Parts in a different spatial reference
//! are skipped and reported, never silently reprojected.
//!
//! ```
//! use mesh_types::{unit_cube, MeshTopology};
//! use mesh_assembly::{Assembly, Part, origin_marker, vertical_extent};
//!
//! let terrain = unit_cube();
//! let extent = vertical_extent([&terrain]).unwrap();
//!
//! let mut scene = Assembly::new("export");
//! scene.add_part(Part::new("terrain", terrain)).unwrap();
//! scene.add_part(Part::new("origin", origin_marker(mesh_types::Point3::origin(), extent))).unwrap();
//!
//! let merged = scene.to_merged_mesh();
//! assert_eq!(merged.mesh.face_count(), 24);
//! ```
//!
//! # Attributes
//!
//! [`normalize_attributes`] reduces vertices to position, normal and uv so
//! every mesh in a scene has the same [`AttributeLayout`].
//!
//! # Export
//!
//! [`export_scene`] encodes a scene as one STL, or as one STL per component
//! when the meshes cannot be merged ([`MergeOutcome::Fallback`]) or when the
//! caller asks for separate files.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod assembly;
mod attributes;
mod error;
mod export;
mod marker;
mod part;

pub use assembly::{Assembly, MergedMesh, SkippedPart};
pub use attributes::{AttributeLayout, has_uniform_attributes, normalize_attributes};
pub use error::{AssemblyError, AssemblyResult};
pub use export::{
    MergeOutcome, SceneExport, encode_components, encode_outcome, export_scene, merge_meshes,
    split_components, try_merge,
};
pub use marker::{
    MIN_MARKER_HEIGHT, MIN_MARKER_WIDTH, ORIGIN_MARKER_NAME, origin_marker, vertical_extent,
};
pub use part::Part;

// Re-export commonly used types for convenience
pub use mesh_types::{IndexedMesh, Material, Point3, Vertex};
