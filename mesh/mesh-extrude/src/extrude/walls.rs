//! Side wall and base face generation.
//!
//! Bottom vertex `i + n` sits directly below top vertex `i`, so every face
//! here is expressed with a single index offset.

// Mesh processing uses u32 indices; truncation would only occur for meshes with >4B vertices
#![allow(clippy::cast_possible_truncation)]

use tracing::debug;

/// Two triangles per boundary edge connecting the top rim to the base.
///
/// For edge `(v1, v2)` taken in its owning triangle's direction this emits
/// `(v1, v1+n, v2)` and `(v2, v1+n, v2+n)`, which faces away from that
/// triangle's interior.
#[must_use]
pub fn wall_faces(boundary_edges: &[(u32, u32)], top_vertex_count: usize) -> Vec<[u32; 3]> {
    let n = top_vertex_count as u32;
    let mut faces = Vec::with_capacity(boundary_edges.len() * 2);

    for &(v1, v2) in boundary_edges {
        faces.push([v1, v1 + n, v2]);
        faces.push([v2, v1 + n, v2 + n]);
    }

    debug!(
        "Generated {} wall faces from {} boundary edges",
        faces.len(),
        boundary_edges.len()
    );
    faces
}

/// One base triangle per top triangle, with reversed winding so it faces down.
#[must_use]
pub fn bottom_faces(top_faces: &[[u32; 3]], top_vertex_count: usize) -> Vec<[u32; 3]> {
    let n = top_vertex_count as u32;
    top_faces
        .iter()
        .map(|&[a, b, c]| [c + n, b + n, a + n])
        .collect()
}
