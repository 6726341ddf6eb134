//! Extrusion algorithm.
//!
//! Turns an open top surface into a closed solid: the vertex buffer is
//! duplicated onto a flat base, boundary edges get side walls, and the top
//! faces are mirrored onto the base with reversed winding.

// Mesh processing uses u32 indices; truncation would only occur for meshes with >4B vertices
#![allow(clippy::cast_possible_truncation)]

use mesh_types::{IndexedMesh, Material, MeshTopology, Vector3, Vertex};
use tracing::{debug, info, warn};

use super::validation::{SolidValidation, validate_solid};
use super::walls::{bottom_faces, wall_faces};
use crate::boundary::find_boundary_edges_checked;
use crate::error::{ExtrudeError, ExtrudeResult};

/// Where the flat base of the solid sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BottomElevation {
    /// A fixed z value.
    Absolute(f64),
    /// `depth` below the lowest vertex of the top surface.
    BelowMin {
        /// Distance below the surface minimum, in mesh units.
        depth: f64,
    },
}

impl Default for BottomElevation {
    fn default() -> Self {
        Self::BelowMin { depth: 0.0 }
    }
}

impl BottomElevation {
    /// Resolve to a concrete z for a surface whose lowest vertex is `min_z`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtrudeError::InvalidBottom`] if the result is not finite or
    /// lies above `min_z`.
    pub fn resolve(self, min_z: f64) -> ExtrudeResult<f64> {
        let bottom = match self {
            Self::Absolute(z) => z,
            Self::BelowMin { depth } => min_z - depth,
        };
        if !bottom.is_finite() || bottom > min_z {
            return Err(ExtrudeError::invalid_bottom(bottom, min_z));
        }
        Ok(bottom)
    }
}

impl std::fmt::Display for BottomElevation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute(z) => write!(f, "z={z:.3}"),
            Self::BelowMin { depth } => write!(f, "min-{depth:.3}"),
        }
    }
}

/// Parameters for extrusion.
#[derive(Debug, Clone)]
pub struct ExtrudeParams {
    /// Base elevation.
    pub bottom: BottomElevation,
    /// Whether to validate the solid after generation.
    pub validate_after_generation: bool,
    /// Name and material applied to the whole solid. When unset the solid
    /// takes the name and material of the input's first component.
    pub component: Option<(String, Option<Material>)>,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            bottom: BottomElevation::default(),
            validate_after_generation: true,
            component: None,
        }
    }
}

impl ExtrudeParams {
    /// Base at a fixed elevation, validation on.
    #[must_use]
    pub fn at_elevation(z: f64) -> Self {
        Self {
            bottom: BottomElevation::Absolute(z),
            validate_after_generation: true,
            component: None,
        }
    }

    /// Base `depth` below the surface minimum, validation on.
    #[must_use]
    pub fn below_min(depth: f64) -> Self {
        Self {
            bottom: BottomElevation::BelowMin { depth },
            validate_after_generation: true,
            component: None,
        }
    }
}

/// Result of extrusion.
#[derive(Debug, Clone, Default)]
pub struct ExtrusionStats {
    /// Vertices of the top surface (the base has as many).
    pub top_vertex_count: usize,
    /// Number of side wall faces.
    pub wall_face_count: usize,
    /// Number of base faces.
    pub bottom_face_count: usize,
    /// Boundary edges the walls were built from.
    pub boundary_edge_count: usize,
    /// Total face count of the solid.
    pub total_face_count: usize,
    /// Base elevation actually used.
    pub bottom_z: Option<f64>,
    /// The input had nothing to extrude and was returned unchanged.
    pub passthrough: bool,
    /// The surface was wound clockwise and every face was flipped.
    pub flipped: bool,
    /// Validation result (if validation was performed).
    pub validation: Option<SolidValidation>,
}

/// Close an open surface into a watertight solid.
///
/// The output has `2 * V` vertices (top first, then the base copies) and
/// `2 * F + 2 * B` faces where `B` is the number of boundary edges. Its
/// spatial reference is the input's.
///
/// A mesh without vertices or faces is returned unchanged with
/// `stats.passthrough` set.
///
/// # Errors
///
/// Returns [`ExtrudeError::InvalidIndex`] for an out-of-range face index and
/// [`ExtrudeError::InvalidBottom`] if the base would sit above the surface.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology};
/// use mesh_extrude::{extrude_solid, ExtrudeParams};
///
/// let square = IndexedMesh::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
///     &[0, 1, 2, 0, 2, 3],
/// );
/// let (solid, stats) = extrude_solid(&square, &ExtrudeParams::at_elevation(-10.0)).unwrap();
///
/// assert_eq!(solid.vertex_count(), 8);
/// assert_eq!(solid.face_count(), 12);
/// assert!((solid.signed_volume() - 10.0).abs() < 1e-9);
/// assert!(stats.validation.unwrap().is_printable());
/// ```
pub fn extrude_solid(
    top: &IndexedMesh,
    params: &ExtrudeParams,
) -> ExtrudeResult<(IndexedMesh, ExtrusionStats)> {
    let Some((min_z, _)) = top.z_range().filter(|_| !top.faces.is_empty()) else {
        debug!("Nothing to extrude, passing surface through");
        return Ok((
            top.clone(),
            ExtrusionStats {
                top_vertex_count: top.vertex_count(),
                total_face_count: top.face_count(),
                passthrough: true,
                ..ExtrusionStats::default()
            },
        ));
    };

    let boundary_edges = find_boundary_edges_checked(&top.faces, top.vertices.len())?;
    let bottom_z = params.bottom.resolve(min_z)?;

    info!(
        "Extruding surface: {} vertices, {} faces, base {} -> z={:.3}",
        top.vertex_count(),
        top.face_count(),
        params.bottom,
        bottom_z
    );

    let n = top.vertices.len();
    let face_capacity = (top.faces.len() + boundary_edges.len()) * 2;
    let mut solid = IndexedMesh::with_capacity(n * 2, face_capacity);
    solid.spatial_reference = top.spatial_reference;

    // Top vertices verbatim, then base vertices below them
    solid.vertices.extend(top.vertices.iter().cloned());
    solid
        .vertices
        .extend(top.vertices.iter().map(|v| base_vertex(v, bottom_z)));

    solid.faces.extend_from_slice(&top.faces);
    let walls = wall_faces(&boundary_edges, n);
    let wall_face_count = walls.len();
    solid.faces.extend(walls);
    let base = bottom_faces(&top.faces, n);
    let bottom_face_count = base.len();
    solid.faces.extend(base);

    let flipped = solid.is_inside_out();
    if flipped {
        warn!("Top surface is wound clockwise; flipping all faces of the solid");
        solid.flip_normals();
    }
    for base in &mut solid.vertices[n..] {
        if let Some(normal) = base.attributes.normal.as_mut() {
            *normal = -Vector3::z();
        }
    }

    let (name, material) = params.component.clone().unwrap_or_else(|| {
        top.components.first().map_or_else(
            || (IndexedMesh::DEFAULT_COMPONENT_NAME.to_string(), None),
            |c| (c.name.clone(), c.material.clone()),
        )
    });
    solid.set_single_component(name, material);

    info!(
        "Extrusion complete: {} vertices, {} faces ({} walls, {} base)",
        solid.vertices.len(),
        solid.faces.len(),
        wall_face_count,
        bottom_face_count
    );

    let validation = if params.validate_after_generation {
        let result = validate_solid(&solid);
        if !result.is_printable() {
            warn!(
                "Extruded solid has {} validation issue(s)",
                result.issue_count()
            );
        }
        Some(result)
    } else {
        None
    };

    let stats = ExtrusionStats {
        top_vertex_count: n,
        wall_face_count,
        bottom_face_count,
        boundary_edge_count: boundary_edges.len(),
        total_face_count: solid.faces.len(),
        bottom_z: Some(bottom_z),
        passthrough: false,
        flipped,
        validation,
    };

    Ok((solid, stats))
}

/// Copy of a top vertex projected onto the base plane.
///
/// Attributes are carried over so top and base share one layout. Base
/// normals are pointed down once the solid's orientation is settled.
fn base_vertex(top: &Vertex, bottom_z: f64) -> Vertex {
    let mut v = top.clone();
    v.position.z = bottom_z;
    v
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{SpatialReference, VertexColor};

    /// Unit square at z=0 made of two CCW triangles.
    fn create_flat_square() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2, 0, 2, 3],
        )
    }

    /// 3x3 grid of vertices with a bump in the middle, 8 triangles.
    fn create_bumpy_grid() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        for y in 0..3 {
            for x in 0..3 {
                let z = if x == 1 && y == 1 { 2.0 } else { 0.5 * f64::from(x) };
                mesh.vertices.push(Vertex::from_coords(f64::from(x), f64::from(y), z));
            }
        }
        for y in 0..2u32 {
            for x in 0..2u32 {
                let i = y * 3 + x;
                mesh.faces.push([i, i + 1, i + 4]);
                mesh.faces.push([i, i + 4, i + 3]);
            }
        }
        mesh
    }

    #[test]
    fn flat_square_to_box() {
        let square = create_flat_square();
        let (solid, stats) = extrude_solid(&square, &ExtrudeParams::at_elevation(-10.0)).unwrap();

        assert_eq!(solid.vertex_count(), 8);
        assert_eq!(solid.face_count(), 12);
        assert_eq!(stats.boundary_edge_count, 4);
        assert_eq!(stats.wall_face_count, 8);
        assert_eq!(stats.bottom_face_count, 2);
        assert!(!stats.flipped);
        assert_relative_eq!(solid.signed_volume(), 10.0, epsilon = 1e-9);

        let validation = stats.validation.unwrap();
        assert!(validation.is_watertight);
        assert!(validation.is_manifold);
        assert!(validation.has_consistent_winding);
    }

    #[test]
    fn base_vertices_share_xy() {
        let grid = create_bumpy_grid();
        let (solid, _) = extrude_solid(&grid, &ExtrudeParams::below_min(1.0)).unwrap();
        let n = grid.vertex_count();
        for i in 0..n {
            let top = solid.vertices[i].position;
            let bottom = solid.vertices[i + n].position;
            assert_relative_eq!(top.x, bottom.x);
            assert_relative_eq!(top.y, bottom.y);
            assert_relative_eq!(bottom.z, -1.0);
        }
    }

    #[test]
    fn counts_follow_boundary() {
        let grid = create_bumpy_grid();
        let (solid, stats) = extrude_solid(&grid, &ExtrudeParams::below_min(0.5)).unwrap();
        assert_eq!(stats.boundary_edge_count, 8);
        assert_eq!(solid.face_count(), 2 * 8 + 2 * 8);
        assert_eq!(solid.vertex_count(), 18);
        assert!(solid.signed_volume() > 0.0);
        assert!(stats.validation.unwrap().is_printable());
    }

    #[test]
    fn clockwise_surface_is_flipped() {
        let mut square = create_flat_square();
        for face in &mut square.faces {
            face.swap(1, 2);
        }
        for vertex in &mut square.vertices {
            vertex.attributes.normal = Some(-Vector3::z());
        }
        let (solid, stats) = extrude_solid(&square, &ExtrudeParams::at_elevation(-2.0)).unwrap();
        assert!(stats.flipped);
        assert_relative_eq!(solid.signed_volume(), 2.0, epsilon = 1e-9);
        assert!(stats.validation.unwrap().has_consistent_winding);

        // Normals follow the faces: top up, base down
        assert_eq!(solid.vertices[0].normal(), Some(Vector3::z()));
        assert_eq!(solid.vertices[4].normal(), Some(-Vector3::z()));
    }

    #[test]
    fn bottom_above_surface_rejected() {
        let square = create_flat_square();
        let result = extrude_solid(&square, &ExtrudeParams::at_elevation(0.5));
        assert!(matches!(result, Err(ExtrudeError::InvalidBottom { .. })));

        let result = extrude_solid(&square, &ExtrudeParams::at_elevation(f64::NAN));
        assert!(matches!(result, Err(ExtrudeError::InvalidBottom { .. })));

        let result = extrude_solid(&square, &ExtrudeParams::below_min(-1.0));
        assert!(matches!(result, Err(ExtrudeError::InvalidBottom { .. })));
    }

    #[test]
    fn bottom_at_minimum_accepted() {
        let square = create_flat_square();
        let (solid, stats) = extrude_solid(&square, &ExtrudeParams::default()).unwrap();
        assert_eq!(solid.face_count(), 12);
        assert_eq!(stats.bottom_z, Some(0.0));
    }

    #[test]
    fn empty_mesh_passes_through() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        let (out, stats) = extrude_solid(&mesh, &ExtrudeParams::below_min(1.0)).unwrap();
        assert!(stats.passthrough);
        assert_eq!(out, mesh);
    }

    #[test]
    fn invalid_index_rejected() {
        let mut square = create_flat_square();
        square.faces.push([0, 1, 42]);
        let result = extrude_solid(&square, &ExtrudeParams::below_min(1.0));
        assert!(matches!(result, Err(ExtrudeError::InvalidIndex { index: 42, .. })));
    }

    #[test]
    fn spatial_reference_and_component_carried() {
        let square = create_flat_square().with_spatial_reference(SpatialReference::new(2056));
        let params = ExtrudeParams {
            component: Some((
                "terrain".to_string(),
                Some(Material::from_color(VertexColor::TERRAIN)),
            )),
            ..ExtrudeParams::below_min(1.0)
        };
        let (solid, _) = extrude_solid(&square, &params).unwrap();
        assert_eq!(solid.spatial_reference, SpatialReference::new(2056));
        assert_eq!(solid.components.len(), 1);
        assert_eq!(solid.components[0].name, "terrain");
        assert_eq!(solid.components[0].faces, 0..12);
    }

    #[test]
    fn base_normals_point_down() {
        let mut square = create_flat_square();
        for v in &mut square.vertices {
            v.attributes.normal = Some(Vector3::z());
        }
        let (solid, _) = extrude_solid(&square, &ExtrudeParams::below_min(1.0)).unwrap();
        assert_eq!(solid.vertices[0].normal(), Some(Vector3::z()));
        assert_eq!(solid.vertices[4].normal(), Some(-Vector3::z()));
    }
}
