//! Traits for mesh types.

use crate::{Aabb, Triangle, Vertex};

/// Read-only access to mesh topology.
///
/// Algorithms that only walk vertices and faces take this rather than a
/// concrete mesh type.
pub trait MeshTopology {
    /// Get the number of vertices.
    fn vertex_count(&self) -> usize;

    /// Get the number of faces (triangles).
    fn face_count(&self) -> usize;

    /// A mesh with no vertices or no faces has nothing to export.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Get a vertex by index.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Get a face by index.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Get a triangle with resolved positions, `None` if the face or any of
    /// its vertices is out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over triangles with resolved vertex positions, skipping faces
    /// with out-of-range indices.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty if there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounding box, `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }
}
