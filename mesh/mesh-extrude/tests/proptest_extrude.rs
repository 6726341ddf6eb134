//! Property-based tests for boundary detection and extrusion.
//!
//! Run with: cargo test -p mesh-extrude -- proptest

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use mesh_extrude::{
    EdgeCounts, ExtrudeParams, extrude_solid, find_boundary_edges, validate_solid,
};
use mesh_types::{IndexedMesh, MeshTopology, Vertex};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Height field on an `nx` x `ny` cell grid, triangulated CCW from above.
fn arb_heightfield() -> impl Strategy<Value = IndexedMesh> {
    (1usize..6, 1usize..6).prop_flat_map(|(nx, ny)| {
        let count = (nx + 1) * (ny + 1);
        prop::collection::vec(-50.0..50.0f64, count).prop_map(move |heights| {
            let mut mesh = IndexedMesh::with_capacity(count, nx * ny * 2);
            for y in 0..=ny {
                for x in 0..=nx {
                    let z = heights[y * (nx + 1) + x];
                    mesh.vertices
                        .push(Vertex::from_coords(x as f64 * 2.0, y as f64 * 2.0, z));
                }
            }
            let row = (nx + 1) as u32;
            for y in 0..ny as u32 {
                for x in 0..nx as u32 {
                    let i = y * row + x;
                    mesh.faces.push([i, i + 1, i + row + 1]);
                    mesh.faces.push([i, i + row + 1, i + row]);
                }
            }
            mesh
        })
    })
}

/// Arbitrary face buffer over a small vertex range; may be non-manifold.
fn arb_faces() -> impl Strategy<Value = Vec<[u32; 3]>> {
    prop::collection::vec(prop::array::uniform3(0u32..12), 0..40)
}

// =============================================================================
// Boundary finder properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_boundary_edges_come_from_faces(faces in arb_faces()) {
        let edges = find_boundary_edges(&faces);
        prop_assert!(edges.len() <= faces.len() * 3);

        // Each boundary edge is traversed in that direction by some face.
        for &(a, b) in &edges {
            let owned = faces.iter().any(|f| {
                (0..3).any(|i| f[i] == a && f[(i + 1) % 3] == b)
            });
            prop_assert!(owned, "edge ({}, {}) not found in any face", a, b);
        }
    }

    #[test]
    fn proptest_edge_counts_consistent(faces in arb_faces()) {
        let counts = EdgeCounts::build(&faces);
        prop_assert_eq!(counts.boundary_edges().len(), counts.boundary_edge_count());
        prop_assert!(counts.boundary_edge_count() + counts.non_manifold_edge_count()
            <= counts.edge_count());
    }

    #[test]
    fn proptest_grid_boundary_is_perimeter(mesh in arb_heightfield()) {
        let bounds = mesh.vertices.last().unwrap().position;
        let nx = (bounds.x / 2.0).round() as usize;
        let ny = (bounds.y / 2.0).round() as usize;
        prop_assert_eq!(find_boundary_edges(&mesh.faces).len(), 2 * (nx + ny));
    }
}

// =============================================================================
// Extrusion properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_extrusion_counts(mesh in arb_heightfield(), depth in 0.1..20.0f64) {
        let boundary = find_boundary_edges(&mesh.faces).len();
        let (solid, stats) = extrude_solid(&mesh, &ExtrudeParams::below_min(depth)).unwrap();

        prop_assert_eq!(solid.vertex_count(), 2 * mesh.vertex_count());
        prop_assert_eq!(solid.face_count(), 2 * mesh.face_count() + 2 * boundary);
        prop_assert_eq!(stats.boundary_edge_count, boundary);
    }

    #[test]
    fn proptest_extrusion_is_closed_and_outward(mesh in arb_heightfield(), depth in 0.1..20.0f64) {
        let params = ExtrudeParams { validate_after_generation: false, ..ExtrudeParams::below_min(depth) };
        let (solid, stats) = extrude_solid(&mesh, &params).unwrap();
        let report = validate_solid(&solid);

        prop_assert!(report.is_watertight);
        prop_assert!(report.is_manifold);
        prop_assert!(report.has_consistent_winding);
        prop_assert!(report.signed_volume > 0.0);
        prop_assert!(!stats.flipped);
    }

    #[test]
    fn proptest_base_is_flat(mesh in arb_heightfield(), depth in 0.0..20.0f64) {
        let (min_z, _) = mesh.z_range().unwrap();
        let (solid, stats) = extrude_solid(&mesh, &ExtrudeParams::below_min(depth)).unwrap();
        let bottom = stats.bottom_z.unwrap();

        prop_assert!((bottom - (min_z - depth)).abs() < 1e-9);
        for v in &solid.vertices[mesh.vertex_count()..] {
            prop_assert!((v.position.z - bottom).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn proptest_clockwise_surface_flipped(mesh in arb_heightfield(), depth in 0.1..20.0f64) {
        let mut cw = mesh;
        for face in &mut cw.faces {
            face.swap(1, 2);
        }
        let (solid, stats) = extrude_solid(&cw, &ExtrudeParams::below_min(depth)).unwrap();
        prop_assert!(stats.flipped);
        prop_assert!(solid.signed_volume() > 0.0);
    }
}
