//! Property-based tests for vertex-space conversion.

#![allow(clippy::unwrap_used)]

use mesh_spatial::geodesy::{
    ecef_to_geodetic, geodetic_to_ecef, geodetic_to_web_mercator, web_mercator_to_geodetic,
};
use mesh_spatial::{Origin, VertexSpace, normalize_mesh};
use mesh_types::{IndexedMesh, Point3, SpatialReference, Vertex};
use proptest::prelude::*;

fn arb_lon() -> impl Strategy<Value = f64> {
    -179.0..179.0f64
}

fn arb_lat() -> impl Strategy<Value = f64> {
    -84.0..84.0f64
}

proptest! {
    #[test]
    fn proptest_ecef_roundtrip(lon in arb_lon(), lat in arb_lat(), h in -500.0..9000.0f64) {
        let back = ecef_to_geodetic(&geodetic_to_ecef(lon, lat, h));
        prop_assert!((back.x - lon).abs() < 1e-8);
        prop_assert!((back.y - lat).abs() < 1e-8);
        prop_assert!((back.z - h).abs() < 1e-3);
    }

    #[test]
    fn proptest_mercator_roundtrip(lon in arb_lon(), lat in arb_lat()) {
        let (x, y) = geodetic_to_web_mercator(lon, lat);
        let (lon2, lat2) = web_mercator_to_geodetic(x, y);
        prop_assert!((lon2 - lon).abs() < 1e-9);
        prop_assert!((lat2 - lat).abs() < 1e-9);
    }

    /// Distances survive the move into a local frame for small extents.
    #[test]
    fn proptest_local_frame_preserves_distance(
        lon in arb_lon(),
        lat in arb_lat(),
        dlon in -0.01..0.01f64,
        dlat in -0.01..0.01f64,
    ) {
        let mut mesh = IndexedMesh::new().with_spatial_reference(SpatialReference::WGS84);
        mesh.vertices.push(Vertex::from_coords(lon, lat, 0.0));
        mesh.vertices.push(Vertex::from_coords(lon + dlon, lat + dlat, 0.0));

        let origin = Origin::new(Point3::new(lon, lat, 0.0), SpatialReference::WGS84);
        let local = normalize_mesh(&mesh, &VertexSpace::select(origin)).unwrap();

        let ecef_dist = (geodetic_to_ecef(lon + dlon, lat + dlat, 0.0)
            - geodetic_to_ecef(lon, lat, 0.0)).norm();
        let local_dist = (local.vertices[1].position - local.vertices[0].position).norm();
        prop_assert!((ecef_dist - local_dist).abs() < 1e-6);
    }

    #[test]
    fn proptest_georeferenced_is_translation(
        ox in -1.0e6..1.0e6f64,
        oy in -1.0e6..1.0e6f64,
        x in -1.0e6..1.0e6f64,
        y in -1.0e6..1.0e6f64,
    ) {
        let sr = SpatialReference::new(2056);
        let mesh = IndexedMesh::from_raw(&[x, y, 3.0], &[]).with_spatial_reference(sr);
        let origin = Origin::new(Point3::new(ox, oy, 1.0), sr);
        let out = normalize_mesh(&mesh, &VertexSpace::select(origin)).unwrap();
        let p = out.vertices[0].position;
        prop_assert!((p.x - (x - ox)).abs() < 1e-6);
        prop_assert!((p.y - (y - oy)).abs() < 1e-6);
        prop_assert!((p.z - 2.0).abs() < 1e-12);
    }
}
