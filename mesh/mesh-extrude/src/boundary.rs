//! Boundary edge detection.
//!
//! A boundary edge is used by exactly one triangle. On an open terrain
//! surface these edges trace the outline that side walls are hung from.

// Mesh processing uses u32 indices; truncation would only occur for meshes with >4B vertices
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use tracing::debug;

use crate::error::{ExtrudeError, ExtrudeResult};

/// Pack an undirected edge into a single map key.
///
/// The smaller index occupies the high 32 bits, so `(a, b)` and `(b, a)`
/// produce the same key.
#[inline]
#[must_use]
pub const fn edge_key(a: u32, b: u32) -> u64 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    ((lo as u64) << 32) | hi as u64
}

/// Use counts of every undirected edge of a face buffer.
///
/// Edges are stored in the order they were first seen, each in the direction
/// of the triangle that first used it.
#[derive(Debug, Clone, Default)]
pub struct EdgeCounts {
    edges: Vec<(u32, u32)>,
    counts: Vec<u32>,
    same_direction_repeats: usize,
}

impl EdgeCounts {
    /// Count edges of all triangles in `faces`.
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut slots: HashMap<u64, usize> = HashMap::with_capacity(faces.len() * 2);
        let mut counts = Self {
            edges: Vec::with_capacity(faces.len() * 2),
            counts: Vec::with_capacity(faces.len() * 2),
            same_direction_repeats: 0,
        };

        for face in faces {
            for i in 0..3 {
                let v0 = face[i];
                let v1 = face[(i + 1) % 3];
                let key = edge_key(v0, v1);

                if let Some(&slot) = slots.get(&key) {
                    counts.counts[slot] += 1;
                    // Two neighbours agreeing in winding traverse a shared edge in
                    // opposite directions.
                    if counts.edges[slot] == (v0, v1) {
                        counts.same_direction_repeats += 1;
                    }
                } else {
                    slots.insert(key, counts.edges.len());
                    counts.edges.push((v0, v1));
                    counts.counts.push(1);
                }
            }
        }

        counts
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges used by exactly one triangle, in first-seen order and direction.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        self.edges
            .iter()
            .zip(&self.counts)
            .filter(|&(_, &count)| count == 1)
            .map(|(&edge, _)| edge)
            .collect()
    }

    /// Number of edges used by exactly one triangle.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 1).count()
    }

    /// Number of edges used by more than two triangles.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 2).count()
    }

    /// Number of times an edge was reused in the same direction it was
    /// first seen, which means adjacent faces disagree on winding.
    #[must_use]
    pub const fn inconsistent_winding_count(&self) -> usize {
        self.same_direction_repeats
    }

    /// No boundary edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count() == 0
    }

    /// No edge is shared by more than two triangles.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count() == 0
    }
}

/// Find all boundary edges of a face buffer.
///
/// Each edge is reported in the direction its owning triangle traverses it,
/// so walls built from these edges inherit the surface's winding. Degenerate
/// faces (repeated indices) are not detected.
///
/// ```
/// use mesh_extrude::find_boundary_edges;
///
/// let edges = find_boundary_edges(&[[0, 1, 2]]);
/// assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
/// ```
#[must_use]
pub fn find_boundary_edges(faces: &[[u32; 3]]) -> Vec<(u32, u32)> {
    let edges = EdgeCounts::build(faces).boundary_edges();
    debug!("Found {} boundary edges in {} faces", edges.len(), faces.len());
    edges
}

/// Count boundary edges without collecting them.
#[must_use]
pub fn boundary_edge_count(faces: &[[u32; 3]]) -> usize {
    EdgeCounts::build(faces).boundary_edge_count()
}

/// Like [`find_boundary_edges`], but first checks every index against
/// `vertex_count`.
///
/// # Errors
///
/// Returns [`ExtrudeError::InvalidIndex`] for the first index that does not
/// refer to a vertex.
pub fn find_boundary_edges_checked(
    faces: &[[u32; 3]],
    vertex_count: usize,
) -> ExtrudeResult<Vec<(u32, u32)>> {
    for (face_idx, face) in faces.iter().enumerate() {
        if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ExtrudeError::InvalidIndex {
                face: face_idx,
                index,
                vertex_count,
            });
        }
    }
    Ok(find_boundary_edges(faces))
}
