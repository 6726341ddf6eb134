//! Ordered collection of parts merged into one scene mesh.
//!
//! The [`Assembly`] keeps parts in insertion order so the merged face buffer
//! is deterministic: terrain first, then features layer by layer, then the
//! origin marker.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, MeshTopology, SpatialReference};
use tracing::{debug, info, warn};

use crate::error::{AssemblyError, AssemblyResult};
use crate::part::Part;

/// A part left out of the merged mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPart {
    /// Part identifier.
    pub id: String,
    /// Layer the part came from, if any.
    pub layer: Option<String>,
    /// Reference the part's vertices were in.
    pub spatial_reference: SpatialReference,
}

/// Result of [`Assembly::to_merged_mesh`].
#[derive(Debug, Clone)]
pub struct MergedMesh {
    /// All compatible parts concatenated, one component per source component.
    pub mesh: IndexedMesh,
    /// Parts whose spatial reference did not match the assembly's.
    pub skipped: Vec<SkippedPart>,
}

impl MergedMesh {
    /// Whether every part made it into the mesh.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// An ordered scene of parts sharing one spatial reference.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology, SpatialReference};
/// use mesh_assembly::{Assembly, Part};
///
/// let mut assembly = Assembly::with_reference("scene", SpatialReference::LOCAL);
/// assembly.add_part(Part::new("terrain", unit_cube())).unwrap();
/// assembly.add_part(Part::new("house", unit_cube()).with_layer("buildings")).unwrap();
///
/// let merged = assembly.to_merged_mesh();
/// assert_eq!(merged.mesh.vertex_count(), 16);
/// assert_eq!(merged.mesh.components.len(), 2);
/// assert!(merged.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    reference: SpatialReference,
    parts: Vec<Part>,
    index: HashMap<String, usize>,
}

impl Assembly {
    /// Create an empty assembly in the local frame.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_reference(name, SpatialReference::LOCAL)
    }

    /// Create an empty assembly whose merge reference is `reference`.
    #[must_use]
    pub fn with_reference(name: impl Into<String>, reference: SpatialReference) -> Self {
        Self {
            name: name.into(),
            reference,
            parts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reference parts must match to be merged.
    #[must_use]
    pub const fn reference(&self) -> SpatialReference {
        self.reference
    }

    /// Append a part.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::DuplicatePart`] if a part with the same id
    /// was already added.
    pub fn add_part(&mut self, part: Part) -> AssemblyResult<()> {
        if self.index.contains_key(part.id()) {
            return Err(AssemblyError::DuplicatePart {
                id: part.id().to_string(),
            });
        }
        self.index.insert(part.id().to_string(), self.parts.len());
        self.parts.push(part);
        Ok(())
    }

    /// Look up a part by id.
    #[must_use]
    pub fn get_part(&self, id: &str) -> Option<&Part> {
        self.index.get(id).and_then(|&i| self.parts.get(i))
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Whether the assembly has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total triangles across all parts.
    #[must_use]
    pub fn total_faces(&self) -> usize {
        self.parts.iter().map(Part::face_count).sum()
    }

    /// Standalone, labelled meshes of every part that can join the scene.
    ///
    /// Meshes come back in insertion order, each carrying its part's
    /// component names and materials. A part whose spatial reference does not
    /// match the assembly's is left out and reported; empty parts are dropped.
    #[must_use]
    pub fn part_meshes(&self) -> (Vec<IndexedMesh>, Vec<SkippedPart>) {
        let mut meshes = Vec::with_capacity(self.parts.len());
        let mut skipped = Vec::new();

        for part in &self.parts {
            if !part.spatial_reference().matches(&self.reference) {
                warn!(
                    "Skipping part '{}': reference {} does not match {}",
                    part.id(),
                    part.spatial_reference(),
                    self.reference
                );
                skipped.push(SkippedPart {
                    id: part.id().to_string(),
                    layer: part.layer().map(str::to_string),
                    spatial_reference: part.spatial_reference(),
                });
                continue;
            }
            if part.mesh().is_empty() {
                debug!("Part '{}' has no geometry", part.id());
                continue;
            }
            meshes.push(part.labelled_mesh());
        }

        (meshes, skipped)
    }

    /// Concatenate all parts into one mesh.
    ///
    /// Parts are appended in insertion order. Each part's vertex indices are
    /// offset by the vertices already merged and its components are shifted
    /// by the faces already merged. Parts left out by
    /// [`part_meshes`](Self::part_meshes) are reported in
    /// [`MergedMesh::skipped`].
    #[must_use]
    pub fn to_merged_mesh(&self) -> MergedMesh {
        let (meshes, skipped) = self.part_meshes();
        let mut mesh = IndexedMesh::new().with_spatial_reference(self.reference);
        for part in &meshes {
            mesh.merge(part);
        }

        info!(
            "Merged assembly '{}': {} parts, {} vertices, {} faces, {} skipped",
            self.name,
            meshes.len(),
            mesh.vertex_count(),
            mesh.face_count(),
            skipped.len()
        );

        MergedMesh { mesh, skipped }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::{Material, Point3, Vertex, VertexColor, unit_cube};

    fn triangle() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
        mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
        mesh.vertices.push(Vertex::new(Point3::new(0.0, 1.0, 0.0)));
        mesh.faces.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn test_duplicate_part() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::new("a", triangle())).unwrap();
        let err = assembly.add_part(Part::new("a", triangle())).unwrap_err();
        assert!(matches!(err, AssemblyError::DuplicatePart { id } if id == "a"));
        assert_eq!(assembly.part_count(), 1);
    }

    #[test]
    fn test_get_part() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::new("a", triangle())).unwrap();
        assembly.add_part(Part::new("b", unit_cube())).unwrap();
        assert_eq!(assembly.get_part("b").unwrap().face_count(), 12);
        assert!(assembly.get_part("c").is_none());
        assert_eq!(assembly.total_faces(), 13);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::new("a", triangle())).unwrap();
        assembly.add_part(Part::new("b", triangle())).unwrap();

        let merged = assembly.to_merged_mesh();
        assert_eq!(merged.mesh.vertex_count(), 6);
        assert_eq!(merged.mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(merged.mesh.components.len(), 2);
        assert_eq!(merged.mesh.components[0].name, "a");
        assert_eq!(merged.mesh.components[1].faces, 1..2);
    }

    #[test]
    fn test_merge_preserves_order_and_materials() {
        let red = Material::from_color(VertexColor::RED);
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::new("terrain", unit_cube())).unwrap();
        assembly
            .add_part(Part::new("marker", triangle()).with_material(red.clone()))
            .unwrap();

        let merged = assembly.to_merged_mesh();
        let names: Vec<_> = merged.mesh.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["terrain", "marker"]);
        assert_eq!(merged.mesh.components[1].faces, 12..13);
        assert_eq!(merged.mesh.components[1].material, Some(red));
    }

    #[test]
    fn test_mismatched_reference_is_skipped() {
        let mut assembly = Assembly::with_reference("test", SpatialReference::LOCAL);
        assembly.add_part(Part::new("terrain", unit_cube())).unwrap();
        assembly
            .add_part(
                Part::new("raw", triangle().with_spatial_reference(SpatialReference::WGS84))
                    .with_layer("roads"),
            )
            .unwrap();

        let merged = assembly.to_merged_mesh();
        assert_eq!(merged.mesh.face_count(), 12);
        assert!(!merged.is_complete());
        assert_eq!(
            merged.skipped,
            vec![SkippedPart {
                id: "raw".to_string(),
                layer: Some("roads".to_string()),
                spatial_reference: SpatialReference::WGS84,
            }]
        );
    }

    #[test]
    fn test_part_meshes_are_labelled_and_ordered() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::new("terrain", unit_cube())).unwrap();
        assembly.add_part(Part::new("nothing", IndexedMesh::new())).unwrap();
        assembly
            .add_part(Part::new("raw", triangle().with_spatial_reference(SpatialReference::WGS84)))
            .unwrap();
        assembly.add_part(Part::new("house", triangle())).unwrap();

        let (meshes, skipped) = assembly.part_meshes();
        let names: Vec<_> = meshes.iter().map(|m| m.components[0].name.as_str()).collect();
        assert_eq!(names, ["terrain", "house"]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].id, "raw");
    }

    #[test]
    fn test_empty_assembly_merges_to_empty_mesh() {
        let assembly = Assembly::new("empty");
        let merged = assembly.to_merged_mesh();
        assert!(merged.mesh.is_empty());
        assert!(merged.mesh.components.is_empty());
        assert_eq!(merged.mesh.spatial_reference, SpatialReference::LOCAL);
    }
}
