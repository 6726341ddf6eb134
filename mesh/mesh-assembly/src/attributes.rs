//! Uniform vertex attribute sets.
//!
//! Meshes only concatenate cleanly when every vertex carries the same
//! attributes. [`normalize_attributes`] reduces any mesh to the minimal set
//! export needs: position, normal and uv.

use mesh_types::{IndexedMesh, MeshTopology, Vector3, VertexAttributes};
use tracing::debug;

/// Which optional attributes are present on the vertices of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeLayout {
    /// Every vertex has a normal.
    pub normal: bool,
    /// Every vertex has texture coordinates.
    pub uv: bool,
    /// Every vertex has a color.
    pub color: bool,
}

impl AttributeLayout {
    /// Layout produced by [`normalize_attributes`].
    pub const EXPORT: Self = Self {
        normal: true,
        uv: true,
        color: false,
    };

    /// Layout of a single vertex.
    #[must_use]
    pub const fn of_vertex(attributes: &VertexAttributes) -> Self {
        Self {
            normal: attributes.normal.is_some(),
            uv: attributes.uv.is_some(),
            color: attributes.color.is_some(),
        }
    }

    /// Layout shared by every vertex of `mesh`.
    ///
    /// Returns `None` when vertices disagree. A mesh without vertices has the
    /// empty layout.
    #[must_use]
    pub fn of(mesh: &IndexedMesh) -> Option<Self> {
        let mut vertices = mesh.vertices.iter();
        let Some(first) = vertices.next() else {
            return Some(Self::default());
        };
        let layout = Self::of_vertex(&first.attributes);
        vertices
            .all(|v| Self::of_vertex(&v.attributes) == layout)
            .then_some(layout)
    }
}

impl std::fmt::Display for AttributeLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position")?;
        if self.normal {
            write!(f, "+normal")?;
        }
        if self.uv {
            write!(f, "+uv")?;
        }
        if self.color {
            write!(f, "+color")?;
        }
        Ok(())
    }
}

/// Whether all vertices carry the same set of attributes.
#[must_use]
pub fn has_uniform_attributes(mesh: &IndexedMesh) -> bool {
    AttributeLayout::of(mesh).is_some()
}

/// Per-vertex normals from the average of adjacent unit face normals.
///
/// Degenerate faces contribute nothing. A vertex with no usable face gets
/// `+Z`.
fn averaged_normals(mesh: &IndexedMesh) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zeros(); mesh.vertex_count()];

    for (face_idx, face) in mesh.faces.iter().enumerate() {
        let Some(n) = mesh.triangle(face_idx).and_then(|t| t.normal()) else {
            continue;
        };
        for &i in face {
            if let Some(sum) = sums.get_mut(i as usize) {
                *sum += n;
            }
        }
    }

    sums.into_iter()
        .map(|sum| sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z))
        .collect()
}

/// Return a copy of `mesh` whose vertices carry exactly position, normal and
/// uv.
///
/// Existing normals and uvs are kept. Missing normals are computed by
/// averaging the unit normals of the faces around the vertex; missing uvs
/// become `(0, 0)`. Colors are dropped. Applying this twice gives the same
/// result as applying it once.
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_assembly::{normalize_attributes, AttributeLayout};
///
/// let normalized = normalize_attributes(&unit_cube());
/// assert_eq!(AttributeLayout::of(&normalized), Some(AttributeLayout::EXPORT));
/// ```
#[must_use]
pub fn normalize_attributes(mesh: &IndexedMesh) -> IndexedMesh {
    let missing_normals = mesh.vertices.iter().filter(|v| v.normal().is_none()).count();
    let computed = if missing_normals > 0 {
        averaged_normals(mesh)
    } else {
        Vec::new()
    };

    let mut out = mesh.clone();
    for (i, vertex) in out.vertices.iter_mut().enumerate() {
        let attributes = &mut vertex.attributes;
        if attributes.normal.is_none() {
            attributes.normal = Some(computed.get(i).copied().unwrap_or_else(Vector3::z));
        }
        if attributes.uv.is_none() {
            attributes.uv = Some((0.0, 0.0));
        }
        attributes.color = None;
    }

    debug!(
        "Normalized attributes: {} vertices, {} normals computed",
        out.vertex_count(),
        missing_normals
    );
    out
}
