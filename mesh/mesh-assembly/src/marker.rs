//! Vertical origin indicator.

use mesh_types::{IndexedMesh, Material, Point3, Vertex, VertexColor, unit_cube};

/// Component name given to the origin marker.
pub const ORIGIN_MARKER_NAME: &str = "origin";

/// Shortest marker that is still produced for a flat scene.
pub const MIN_MARKER_HEIGHT: f64 = 1.0;

/// Thinnest marker cross-section.
pub const MIN_MARKER_WIDTH: f64 = 0.1;

/// Combined `(min z, max z)` over a set of meshes.
///
/// Returns `None` if none of the meshes has vertices.
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_assembly::vertical_extent;
///
/// let mut raised = unit_cube();
/// raised.translate(mesh_types::Vector3::new(0.0, 0.0, 4.0));
/// assert_eq!(vertical_extent([&unit_cube(), &raised]), Some((0.0, 5.0)));
/// ```
pub fn vertical_extent<'a>(meshes: impl IntoIterator<Item = &'a IndexedMesh>) -> Option<(f64, f64)> {
    meshes
        .into_iter()
        .filter_map(IndexedMesh::z_range)
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}

/// A closed square prism standing at `origin`.
///
/// The prism starts at the bottom of `vertical_extent` and is as tall as the
/// extent (at least [`MIN_MARKER_HEIGHT`]). Its square cross-section is
/// centred on the origin's x/y and is a twentieth of the height wide (at
/// least [`MIN_MARKER_WIDTH`]). The mesh is one red component named
/// [`ORIGIN_MARKER_NAME`].
///
/// ```
/// use mesh_types::{MeshTopology, Point3};
/// use mesh_assembly::origin_marker;
///
/// let marker = origin_marker(Point3::origin(), (-10.0, 30.0));
/// assert_eq!(marker.face_count(), 12);
/// assert_eq!(marker.z_range(), Some((-10.0, 30.0)));
/// ```
#[must_use]
pub fn origin_marker(origin: Point3<f64>, vertical_extent: (f64, f64)) -> IndexedMesh {
    let (min_z, max_z) = vertical_extent;
    let height = (max_z - min_z).max(MIN_MARKER_HEIGHT);
    let width = (height / 20.0).max(MIN_MARKER_WIDTH);

    let mut marker = unit_cube();
    for vertex in &mut marker.vertices {
        let p = vertex.position;
        *vertex = Vertex::new(Point3::new(
            origin.x + (p.x - 0.5) * width,
            origin.y + (p.y - 0.5) * width,
            min_z + p.z * height,
        ));
    }

    let material = Material::from_color(VertexColor::RED).with_name(ORIGIN_MARKER_NAME);
    marker.set_single_component(ORIGIN_MARKER_NAME, Some(material));
    marker
}
