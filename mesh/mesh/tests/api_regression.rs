//! API Regression Tests for Mesh Crate Ecosystem
//!
//! These tests pin the public API across the mesh crates. They are organized
//! in tiers following the export data flow:
//!
//! - Tier 1: Foundation (mesh-types)
//! - Tier 2: Extrusion (mesh-extrude)
//! - Tier 3: Vertex spaces (mesh-spatial)
//! - Tier 4: Encoding and scenes (mesh-io, mesh-assembly)
//! - Tier 5: Pipeline (mesh-export)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use mesh::{assembly, export, extrude, io, prelude::*, spatial, types};

fn flat_square() -> IndexedMesh {
    IndexedMesh::from_raw(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        &[0, 1, 2, 0, 2, 3],
    )
}

// =============================================================================
// TIER 1: Foundation - Basic Types
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn vertex_creation_and_access() {
        let v = types::Vertex::from_coords(1.0, 2.0, 3.0);
        assert!((v.position.x - 1.0).abs() < f64::EPSILON);
        assert!(v.normal().is_none());

        let point = types::Point3::new(4.0, 5.0, 6.0);
        let v2 = types::Vertex::new(point);
        assert!((v2.position.x - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_buffers() {
        let mesh = flat_square();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.positions_flat().len(), 12);

        // Length not a multiple of three
        let bad = types::IndexedMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]);
        assert!(bad.is_empty());
    }

    #[test]
    fn invalid_index_reported() {
        let mut mesh = flat_square();
        mesh.faces.push([0, 1, 9]);
        assert_eq!(mesh.first_invalid_index(), Some((2, 9)));
    }

    #[test]
    fn components_and_merge() {
        let mut a = types::unit_cube();
        let b = flat_square();
        a.merge(&b);

        assert_eq!(a.vertex_count(), 12);
        assert_eq!(a.faces[12], [8, 9, 10]);
        assert_eq!(a.component_count(), 2);
        assert_eq!(a.components[1].faces, 12..14);
    }

    #[test]
    fn spatial_reference_helpers() {
        assert!(types::SpatialReference::WGS84.is_wgs84());
        assert!(types::SpatialReference::new(900_913).is_web_mercator());
        assert!(!types::SpatialReference::new(2056).is_global());
        assert_eq!(types::SpatialReference::default(), types::SpatialReference::LOCAL);
    }

    #[test]
    fn mesh_bounds_calculation() {
        let bounds = types::unit_cube().bounds();
        assert!((bounds.min.x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.z - 1.0).abs() < f64::EPSILON);
    }
}

// =============================================================================
// TIER 2: Extrusion
// =============================================================================

mod tier2_extrusion {
    use super::*;

    #[test]
    fn boundary_edges() {
        let single = [[0, 1, 2]];
        assert_eq!(extrude::find_boundary_edges(&single).len(), 3);

        let pair = [[0, 1, 2], [0, 2, 3]];
        assert_eq!(extrude::boundary_edge_count(&pair), 4);
        assert_eq!(extrude::edge_key(7, 3), (3_u64 << 32) | 7);
    }

    #[test]
    fn flat_square_box() {
        let (solid, stats) =
            extrude::extrude_solid(&flat_square(), &extrude::ExtrudeParams::at_elevation(-10.0))
                .unwrap();

        assert_eq!(solid.vertex_count(), 8);
        assert_eq!(solid.face_count(), 12);
        assert!((solid.signed_volume() - 10.0).abs() < 1e-9);
        assert_eq!(stats.wall_face_count, 8);
        assert_eq!(stats.bottom_face_count, 2);
        assert!(extrude::validate_solid(&solid).is_printable());
    }

    #[test]
    fn bottom_above_surface_rejected() {
        let err = ExtrudeBuilder::new(&flat_square())
            .bottom_elevation(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, extrude::ExtrudeError::InvalidBottom { .. }));
    }

    #[test]
    fn builder_depth() {
        let result = ExtrudeBuilder::new(&flat_square())
            .depth(3.0)
            .component("terrain", None)
            .build()
            .unwrap();
        assert_eq!(result.stats.bottom_z, Some(-3.0));
        assert_eq!(result.mesh.components[0].name, "terrain");
    }
}

// =============================================================================
// TIER 3: Vertex spaces
// =============================================================================

mod tier3_spatial {
    use super::*;

    #[test]
    fn mode_selection() {
        let global = spatial::Origin::new(
            types::Point3::new(0.0, 0.0, 0.0),
            types::SpatialReference::WEB_MERCATOR,
        );
        assert!(matches!(spatial::VertexSpace::select(global), spatial::VertexSpace::Local(_)));

        let projected =
            spatial::Origin::new(types::Point3::new(0.0, 0.0, 0.0), types::SpatialReference::new(2056));
        assert!(matches!(
            spatial::VertexSpace::select(projected),
            spatial::VertexSpace::Georeferenced(_)
        ));
    }

    #[test]
    fn geodesy_round_trip() {
        let ecef = spatial::geodesy::geodetic_to_ecef(8.5, 47.4, 400.0);
        let geo = spatial::geodesy::ecef_to_geodetic(&ecef);
        assert!((geo.x - 8.5).abs() < 1e-9);
        assert!((geo.y - 47.4).abs() < 1e-9);
        assert!((geo.z - 400.0).abs() < 1e-4);
    }

    #[test]
    fn mismatched_reference_rejected() {
        let space = spatial::VertexSpace::select(spatial::Origin::new(
            types::Point3::origin(),
            types::SpatialReference::WGS84,
        ));
        let err = normalize_mesh(&flat_square(), &space).unwrap_err();
        assert!(matches!(err, spatial::SpatialError::ReferenceMismatch { .. }));
    }
}

// =============================================================================
// TIER 4: Encoding and scenes
// =============================================================================

mod tier4_scene {
    use super::*;

    #[test]
    fn unit_triangle_binary_stl() {
        let mut tri = flat_square();
        tri.faces.truncate(1);
        let bytes = io::encode_stl(&tri, &io::StlOptions::default()).unwrap();
        assert_eq!(bytes.len(), 134);
        assert_eq!(&bytes[80..84], &1_u32.to_le_bytes());
    }

    #[test]
    fn ascii_stl_layout() {
        let text = String::from_utf8(
            io::encode_stl(&flat_square(), &io::StlOptions::ascii().with_name("tile")).unwrap(),
        )
        .unwrap();
        assert!(text.starts_with("solid tile"));
        assert_eq!(text.matches("facet normal").count(), 2);
        assert!(text.trim_end().ends_with("endsolid tile"));
    }

    #[test]
    fn assembly_merge_and_skip() {
        let mut scene = assembly::Assembly::new("scene");
        scene.add_part(assembly::Part::new("a", flat_square())).unwrap();
        scene
            .add_part(assembly::Part::new(
                "b",
                flat_square().with_spatial_reference(types::SpatialReference::WGS84),
            ))
            .unwrap();

        let merged = scene.to_merged_mesh();
        assert_eq!(merged.mesh.face_count(), 2);
        assert_eq!(merged.skipped.len(), 1);
    }

    #[test]
    fn attribute_normalization_is_idempotent() {
        let once = assembly::normalize_attributes(&types::unit_cube());
        let twice = assembly::normalize_attributes(&once);
        assert_eq!(once, twice);
        assert!(assembly::has_uniform_attributes(&once));
    }

    #[test]
    fn empty_scene_has_no_geometry() {
        let err = assembly::export_scene(&[], &io::StlOptions::default()).unwrap_err();
        assert!(matches!(err, assembly::AssemblyError::NoGeometryFound));
    }

    #[test]
    fn origin_marker_shape() {
        let marker = assembly::origin_marker(types::Point3::origin(), (0.0, 0.0));
        assert_eq!(marker.face_count(), 12);
        assert_eq!(marker.components[0].name, assembly::ORIGIN_MARKER_NAME);
    }
}

// =============================================================================
// TIER 5: Pipeline
// =============================================================================

mod tier5_pipeline {
    use super::*;

    fn request() -> ExportRequest {
        ExportRequest::new(
            flat_square(),
            spatial::Origin::new(types::Point3::origin(), types::SpatialReference::LOCAL),
        )
    }

    #[tokio::test]
    async fn pipeline_produces_stl() {
        let artifact = ExportPipeline::new()
            .run(request(), &CancelToken::never())
            .await
            .unwrap();
        assert!(matches!(
            artifact.output,
            ExportOutput::Stl(SceneExport::Single(ref bytes)) if bytes.len() == 84 + 12 * 50
        ));
        assert_eq!(artifact.filename, "export.stl");
    }

    #[tokio::test]
    async fn cancelled_pipeline() {
        let (handle, token) = CancelHandle::pair();
        handle.cancel();
        let err = ExportPipeline::new().run(request(), &token).await.unwrap_err();
        assert!(matches!(err, export::ExportError::Cancelled));
    }

    #[test]
    fn options_from_json() {
        let opts = ExportOptions::from_json(r#"{ "includeOriginMarker": true }"#).unwrap();
        assert!(opts.include_origin_marker);
        assert!(opts.extrude_base);
    }
}
