//! Solid validation.
//!
//! Checks that an extruded mesh is a closed, consistently oriented volume.

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::{debug, info, warn};

use crate::boundary::EdgeCounts;

/// Result of solid validation.
#[derive(Debug, Clone)]
pub struct SolidValidation {
    /// No boundary edges.
    pub is_watertight: bool,
    /// No edges with more than two adjacent faces.
    pub is_manifold: bool,
    /// Adjacent faces traverse shared edges in opposite directions.
    pub has_consistent_winding: bool,
    /// Number of boundary edges (0 for a closed solid).
    pub boundary_edge_count: usize,
    /// Number of non-manifold edges.
    pub non_manifold_edge_count: usize,
    /// Signed volume; positive when faces point outward.
    pub signed_volume: f64,
    /// Total vertex count.
    pub vertex_count: usize,
    /// Total face count.
    pub face_count: usize,
    /// Issues found.
    pub issues: Vec<SolidIssue>,
}

impl SolidValidation {
    /// All topology and orientation checks pass.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_printable() && self.has_consistent_winding && self.signed_volume > 0.0
    }

    /// Closed and manifold, which is what a slicer needs.
    #[must_use]
    pub const fn is_printable(&self) -> bool {
        self.is_watertight && self.is_manifold
    }

    /// Number of issues found.
    #[must_use]
    pub const fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "NO" }
}

impl std::fmt::Display for SolidValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solid Validation Result:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(
            f,
            "  Watertight: {} (boundary edges: {})",
            yes_no(self.is_watertight),
            self.boundary_edge_count
        )?;
        writeln!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            yes_no(self.is_manifold),
            self.non_manifold_edge_count
        )?;
        writeln!(f, "  Consistent winding: {}", yes_no(self.has_consistent_winding))?;
        writeln!(f, "  Signed volume: {:.6}", self.signed_volume)?;

        if !self.issues.is_empty() {
            writeln!(f, "  Issues ({}):", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "    - {issue}")?;
            }
        }

        Ok(())
    }
}

/// Issues that can be found during solid validation.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidIssue {
    /// Solid has no faces.
    Empty,
    /// A face refers to a missing vertex.
    InvalidIndex {
        /// Offending face.
        face: usize,
    },
    /// Solid has boundary edges.
    NotWatertight {
        /// Number of boundary edges.
        boundary_edge_count: usize,
    },
    /// Solid has non-manifold edges.
    NonManifold {
        /// Number of non-manifold edges.
        non_manifold_edge_count: usize,
    },
    /// Adjacent faces disagree on winding.
    InconsistentWinding,
    /// Faces point inward.
    InsideOut {
        /// Negative signed volume.
        signed_volume: f64,
    },
    /// Zero-area triangles, e.g. walls where the surface touches the base.
    DegenerateTriangles {
        /// Number of degenerate triangles.
        count: usize,
    },
}

impl std::fmt::Display for SolidIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Solid is empty (no faces)"),
            Self::InvalidIndex { face } => write!(f, "Face {face} has an out-of-range index"),
            Self::NotWatertight {
                boundary_edge_count,
            } => write!(
                f,
                "Solid is not watertight ({boundary_edge_count} boundary edges)"
            ),
            Self::NonManifold {
                non_manifold_edge_count,
            } => write!(
                f,
                "Solid is not manifold ({non_manifold_edge_count} non-manifold edges)"
            ),
            Self::InconsistentWinding => write!(f, "Solid has inconsistent face winding order"),
            Self::InsideOut { signed_volume } => {
                write!(f, "Solid is inside-out (signed volume {signed_volume:.6})")
            }
            Self::DegenerateTriangles { count } => {
                write!(f, "Solid has {count} degenerate triangles")
            }
        }
    }
}

/// Validate a solid mesh.
///
/// Checks watertightness, manifoldness, winding consistency, orientation
/// (signed volume) and degenerate triangles.
#[must_use]
pub fn validate_solid(solid: &IndexedMesh) -> SolidValidation {
    info!(
        "Validating solid ({} vertices, {} faces)",
        solid.vertices.len(),
        solid.faces.len()
    );

    let mut result = SolidValidation {
        is_watertight: false,
        is_manifold: false,
        has_consistent_winding: false,
        boundary_edge_count: 0,
        non_manifold_edge_count: 0,
        signed_volume: 0.0,
        vertex_count: solid.vertices.len(),
        face_count: solid.faces.len(),
        issues: Vec::new(),
    };

    if solid.faces.is_empty() {
        result.issues.push(SolidIssue::Empty);
        return result;
    }
    if let Some((face, _)) = solid.first_invalid_index() {
        result.issues.push(SolidIssue::InvalidIndex { face });
        return result;
    }

    let edges = EdgeCounts::build(&solid.faces);

    result.boundary_edge_count = edges.boundary_edge_count();
    result.is_watertight = result.boundary_edge_count == 0;
    if !result.is_watertight {
        result.issues.push(SolidIssue::NotWatertight {
            boundary_edge_count: result.boundary_edge_count,
        });
    }

    result.non_manifold_edge_count = edges.non_manifold_edge_count();
    result.is_manifold = result.non_manifold_edge_count == 0;
    if !result.is_manifold {
        result.issues.push(SolidIssue::NonManifold {
            non_manifold_edge_count: result.non_manifold_edge_count,
        });
    }

    result.has_consistent_winding = edges.inconsistent_winding_count() == 0;
    if !result.has_consistent_winding {
        result.issues.push(SolidIssue::InconsistentWinding);
    }

    result.signed_volume = solid.signed_volume();
    if result.signed_volume < 0.0 {
        result.issues.push(SolidIssue::InsideOut {
            signed_volume: result.signed_volume,
        });
    }

    let degenerate = solid.triangles().filter(|t| t.is_degenerate()).count();
    if degenerate > 0 {
        result
            .issues
            .push(SolidIssue::DegenerateTriangles { count: degenerate });
    }

    if result.issues.is_empty() {
        info!("Solid validation passed");
    } else {
        warn!("Solid validation found {} issue(s)", result.issue_count());
    }
    debug!("{}", result);

    result
}
