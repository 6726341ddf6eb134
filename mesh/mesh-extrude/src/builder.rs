//! Fluent builder API for extrusion.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_extrude::ExtrudeBuilder;
//!
//! let surface = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 1.0, 10.0, 0.0, 2.0, 5.0, 10.0, 3.0],
//!     &[0, 1, 2],
//! );
//!
//! let result = ExtrudeBuilder::new(&surface)
//!     .depth(5.0)
//!     .component("terrain", None)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(result.stats.bottom_z, Some(-4.0));
//! ```

use mesh_types::{IndexedMesh, Material};

use crate::error::ExtrudeResult;
use crate::extrude::{BottomElevation, ExtrudeParams, ExtrusionStats, extrude_solid};

/// Result from [`ExtrudeBuilder`].
#[derive(Debug)]
pub struct ExtrudeBuildResult {
    /// The closed solid.
    pub mesh: IndexedMesh,
    /// Statistics from extrusion.
    pub stats: ExtrusionStats,
}

/// Fluent builder for extrusion.
///
/// Defaults to a base at the surface minimum with validation enabled.
pub struct ExtrudeBuilder<'a> {
    mesh: &'a IndexedMesh,
    params: ExtrudeParams,
}

impl<'a> ExtrudeBuilder<'a> {
    /// Create a builder for the given top surface.
    #[must_use]
    pub fn new(mesh: &'a IndexedMesh) -> Self {
        Self {
            mesh,
            params: ExtrudeParams::default(),
        }
    }

    /// Put the base at a fixed elevation.
    #[must_use]
    pub const fn bottom_elevation(mut self, z: f64) -> Self {
        self.params.bottom = BottomElevation::Absolute(z);
        self
    }

    /// Put the base `depth` below the lowest surface vertex.
    #[must_use]
    pub const fn depth(mut self, depth: f64) -> Self {
        self.params.bottom = BottomElevation::BelowMin { depth };
        self
    }

    /// Enable or disable post-generation validation.
    #[must_use]
    pub const fn validate(mut self, enable: bool) -> Self {
        self.params.validate_after_generation = enable;
        self
    }

    /// Name and material for the resulting solid.
    #[must_use]
    pub fn component(mut self, name: impl Into<String>, material: Option<Material>) -> Self {
        self.params.component = Some((name.into(), material));
        self
    }

    /// Parameters assembled so far.
    #[must_use]
    pub const fn params(&self) -> &ExtrudeParams {
        &self.params
    }

    /// Run the extrusion.
    ///
    /// # Errors
    ///
    /// See [`extrude_solid`].
    pub fn build(self) -> ExtrudeResult<ExtrudeBuildResult> {
        let (mesh, stats) = extrude_solid(self.mesh, &self.params)?;
        Ok(ExtrudeBuildResult { mesh, stats })
    }
}
