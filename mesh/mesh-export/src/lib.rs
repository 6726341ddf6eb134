//! Async export of a terrain region and its features as a printable mesh.
//!
//! An [`ExportPipeline`] takes an [`ExportRequest`] (a terrain source, feature
//! layers, an origin and options) through a fixed sequence of stages:
//!
//! 1. **Loading**: terrain and features are read concurrently.
//! 2. **Normalizing**: every mesh is moved into one local frame anchored at
//!    the origin (east/north/up metres for WGS-84 and Web Mercator inputs,
//!    a plain translation otherwise).
//! 3. **Extruding**: the terrain surface is closed into a solid whose flat
//!    base sits `extrusion_depth` below the lowest input vertex, or level
//!    with it when `extrude_base` is off.
//! 4. **Merging**: terrain, features and an optional origin marker become one
//!    mesh with one component per source. Sources with mismatched vertex
//!    attributes cannot be merged and stay separate components.
//! 5. **AttributeFixup**: vertices are reduced to position, normal and uv.
//! 6. **Exporting**: the mesh is returned as is or encoded as STL, one file
//!    per component if the scene was not merged.
//!
//! A [`CancelToken`] is observed at every suspend point. Problems the
//! pipeline recovers from are listed in the [`ExportReport`]; everything
//! else is an [`ExportError`].
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Point3, SpatialReference};
//! use mesh_spatial::Origin;
//! use mesh_export::{
//!     CancelHandle, ExportFormat, ExportOptions, ExportOutput, ExportPipeline, ExportRequest,
//!     FeatureInput, LayerInput,
//! };
//!
//! let sr = SpatialReference::new(2056);
//! let terrain = IndexedMesh::from_raw(
//!     &[
//!         2_600_000.0, 1_200_000.0, 400.0,
//!         2_600_100.0, 1_200_000.0, 410.0,
//!         2_600_100.0, 1_200_100.0, 420.0,
//!         2_600_000.0, 1_200_100.0, 405.0,
//!     ],
//!     &[0, 1, 2, 0, 2, 3],
//! )
//! .with_spatial_reference(sr);
//!
//! let request = ExportRequest::new(terrain, Origin::new(Point3::new(2_600_000.0, 1_200_000.0, 0.0), sr))
//!     .with_options(ExportOptions { include_origin_marker: true, ..ExportOptions::default() })
//!     .with_format(ExportFormat::Mesh);
//!
//! let (_handle, cancel) = CancelHandle::pair();
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let artifact = runtime.block_on(ExportPipeline::new().run(request, &cancel)).unwrap();
//!
//! let ExportOutput::Mesh(mesh) = artifact.output else { unreachable!() };
//! assert_eq!(mesh.components.len(), 2); // terrain, origin
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cancel;
mod error;
mod options;
mod pipeline;
mod report;
mod source;
mod stage;

pub use cancel::{CancelHandle, CancelToken};
pub use error::{ExportError, ExportResult};
pub use options::{ExportFormat, ExportOptions, ExportOutput};
pub use pipeline::{ExportArtifact, ExportPipeline, ExportRequest, TERRAIN_COMPONENT};
pub use report::{ExportReport, ExportWarning};
pub use source::{FeatureInput, LayerInput, MeshSource};
pub use stage::ExportStage;
