//! Individual parts within an assembly.

use mesh_types::{Aabb, IndexedMesh, Material, MeshBounds, MeshTopology, SpatialReference};

/// One mesh contributed to a scene.
///
/// A part is the terrain solid, a single feature, or the origin marker. Its
/// id becomes the component name when the mesh carries no components of its
/// own.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Material, VertexColor};
/// use mesh_assembly::Part;
///
/// let part = Part::new("tree-17", IndexedMesh::new())
///     .with_layer("vegetation")
///     .with_material(Material::from_color(VertexColor::new(30, 120, 40)));
///
/// assert_eq!(part.id(), "tree-17");
/// assert_eq!(part.layer(), Some("vegetation"));
/// ```
#[derive(Debug, Clone)]
pub struct Part {
    id: String,
    mesh: IndexedMesh,
    material: Option<Material>,
    layer: Option<String>,
}

impl Part {
    /// Create a part from a mesh.
    #[must_use]
    pub fn new(id: impl Into<String>, mesh: IndexedMesh) -> Self {
        Self {
            id: id.into(),
            mesh,
            material: None,
            layer: None,
        }
    }

    /// Material applied to components that do not carry their own.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Record the layer this part was drawn from.
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Part identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The part's geometry.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Part material, if any.
    #[must_use]
    pub const fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Source layer, if any.
    #[must_use]
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    /// Spatial reference of the part's vertices.
    #[must_use]
    pub const fn spatial_reference(&self) -> SpatialReference {
        self.mesh.spatial_reference
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Bounding box of the part's geometry.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.mesh.bounds()
    }

    /// The mesh with components labelled for merging.
    ///
    /// An unlabelled mesh becomes one component named after the part. Every
    /// component without a material inherits the part's material.
    pub(crate) fn labelled_mesh(&self) -> IndexedMesh {
        let mut mesh = self.mesh.clone();
        if mesh.components.is_empty() {
            mesh.set_single_component(self.id.clone(), self.material.clone());
        } else if let Some(material) = &self.material {
            for component in &mut mesh.components {
                if component.material.is_none() {
                    component.material = Some(material.clone());
                }
            }
        }
        mesh
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::{MeshComponent, VertexColor, unit_cube};

    #[test]
    fn test_part_new() {
        let part = Part::new("terrain", unit_cube());
        assert_eq!(part.id(), "terrain");
        assert_eq!(part.face_count(), 12);
        assert!(part.material().is_none());
        assert!(part.layer().is_none());
    }

    #[test]
    fn test_bounds() {
        let part = Part::new("cube", unit_cube());
        let b = part.bounds();
        assert!((b.max.x - 1.0).abs() < 1e-12);
        assert!(b.min.z.abs() < 1e-12);
    }

    #[test]
    fn test_labelled_mesh_names_implicit_component() {
        let red = Material::from_color(VertexColor::RED);
        let part = Part::new("road", unit_cube()).with_material(red.clone());
        let mesh = part.labelled_mesh();

        assert_eq!(mesh.components.len(), 1);
        assert_eq!(mesh.components[0].name, "road");
        assert_eq!(mesh.components[0].material, Some(red));
        assert_eq!(mesh.components[0].faces, 0..12);
    }

    #[test]
    fn test_labelled_mesh_keeps_own_materials() {
        let own = Material::from_color(VertexColor::WHITE).with_name("roof");
        let mut cube = unit_cube();
        cube.components = vec![
            MeshComponent::new("roof", 0..2).with_material(own.clone()),
            MeshComponent::new("walls", 2..12),
        ];

        let part = Part::new("house", cube).with_material(Material::from_color(VertexColor::RED));
        let mesh = part.labelled_mesh();

        assert_eq!(mesh.components[0].material, Some(own));
        assert_eq!(
            mesh.components[1].material,
            Some(Material::from_color(VertexColor::RED))
        );
    }
}
