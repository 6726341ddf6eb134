//! Indexed triangle mesh.

use crate::{
    Aabb, Material, MeshBounds, MeshComponent, MeshTopology, SpatialReference, Triangle, Vertex,
};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// This is the mesh type every export stage consumes and produces. It stores
/// vertices and faces separately, groups faces into named [`MeshComponent`]s
/// and records the [`SpatialReference`] its positions are expressed in.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions and attributes
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
/// - `components`: `Vec<MeshComponent>` - Face ranges with name and material
///
/// An empty `components` list means one implicit component spanning every
/// face; see [`IndexedMesh::effective_components`].
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,

    /// Named face groups. Empty means a single implicit component.
    pub components: Vec<MeshComponent>,

    /// Coordinate system of `vertices`.
    pub spatial_reference: SpatialReference,
}

impl IndexedMesh {
    /// Name given to the implicit component of a mesh without components.
    pub const DEFAULT_COMPONENT_NAME: &'static str = "mesh";

    /// Create a new empty mesh in the local frame.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            components: Vec::new(),
            spatial_reference: SpatialReference::LOCAL,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            ..Self::new()
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            components: Vec::new(),
            spatial_reference: SpatialReference::LOCAL,
        }
    }

    /// Create a mesh from flat vertex and index buffers.
    ///
    /// * `positions` - `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - `[a0, b0, c0, a1, b1, c1, ...]`
    ///
    /// Returns an empty mesh if either length is not a multiple of 3.
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
    /// assert_eq!(mesh.vertex_count(), 3);
    ///
    /// let broken = IndexedMesh::from_raw(&[0.0, 0.0], &[0, 1, 2]);
    /// assert!(broken.is_empty());
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self::from_parts(vertices, faces)
    }

    /// Set the spatial reference.
    #[must_use]
    pub const fn with_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = spatial_reference;
        self
    }

    /// Flat position buffer, 3 values per vertex.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Find the first face index that does not refer to an existing vertex.
    ///
    /// Returns `(face, vertex_index)` for the first offender.
    #[must_use]
    pub fn first_invalid_index(&self) -> Option<(usize, u32)> {
        let count = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(face_idx, face)| {
            face.iter()
                .find(|&&i| i as usize >= count)
                .map(|&i| (face_idx, i))
        })
    }

    /// Components of this mesh, with the implicit component made explicit.
    #[must_use]
    pub fn effective_components(&self) -> Vec<MeshComponent> {
        if self.components.is_empty() {
            vec![MeshComponent::new(
                Self::DEFAULT_COMPONENT_NAME,
                0..self.faces.len(),
            )]
        } else {
            self.components.clone()
        }
    }

    /// Number of components, counting the implicit one.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len().max(1)
    }

    /// Replace all components with one spanning every face.
    pub fn set_single_component(&mut self, name: impl Into<String>, material: Option<Material>) {
        self.components = vec![MeshComponent {
            name: name.into(),
            material,
            faces: 0..self.faces.len(),
        }];
    }

    /// Extract one component as a standalone mesh.
    ///
    /// Only vertices referenced by the component's faces are kept; they are
    /// renumbered in first-use order. Returns `None` for an out-of-range
    /// component index or a face range beyond the face buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported by design
    pub fn component_mesh(&self, index: usize) -> Option<Self> {
        let components = self.effective_components();
        let component = components.get(index)?;
        let faces = self.faces.get(component.faces.clone())?;

        let mut remap: Vec<Option<u32>> = vec![None; self.vertices.len()];
        let mut out = Self::with_capacity(faces.len() * 3, faces.len());
        out.spatial_reference = self.spatial_reference;

        for face in faces {
            let mut new_face = [0u32; 3];
            for (slot, &vi) in new_face.iter_mut().zip(face) {
                let entry = remap.get_mut(vi as usize)?;
                *slot = match *entry {
                    Some(mapped) => mapped,
                    None => {
                        let mapped = out.vertices.len() as u32;
                        out.vertices.push(self.vertices[vi as usize].clone());
                        *entry = Some(mapped);
                        mapped
                    }
                };
            }
            out.faces.push(new_face);
        }

        out.components = vec![MeshComponent {
            name: component.name.clone(),
            material: component.material.clone(),
            faces: 0..out.faces.len(),
        }];
        Some(out)
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Lowest and highest Z over all vertices.
    #[must_use]
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.bounds_opt().map(|b| (b.min.z, b.max.z))
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Sum of signed tetrahedra formed by each face and the origin. Positive
    /// for a closed mesh with outward-facing (CCW) faces, negative when the
    /// mesh is inside-out. Not meaningful for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize].position;
            let v1 = &self.vertices[i1 as usize].position;
            let v2 = &self.vertices[i2 as usize].position;

            let cross = Vector3::new(
                v1.y.mul_add(v2.z, -(v1.z * v2.y)),
                v1.z.mul_add(v2.x, -(v1.x * v2.z)),
                v1.x.mul_add(v2.y, -(v1.y * v2.x)),
            );
            volume += v0.z.mul_add(cross.z, v0.x.mul_add(cross.x, v0.y * cross.y));
        }

        volume / 6.0
    }

    /// Absolute value of [`signed_volume`](Self::signed_volume).
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// A closed mesh with negative signed volume.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Flip all faces by reversing winding order, along with vertex normals.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        for vertex in &mut self.vertices {
            if let Some(ref mut normal) = vertex.attributes.normal {
                *normal = -*normal;
            }
        }
    }

    /// Append another mesh.
    ///
    /// Vertices are concatenated and the other mesh's faces are re-indexed by
    /// this mesh's vertex count. Components of both meshes are kept as
    /// distinct components; an implicit component becomes explicit so it is
    /// not lost. The spatial reference of `self` is kept; checking that the
    /// two match is the caller's job.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported by design
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;
        let face_offset = self.faces.len();

        if self.components.is_empty() && !self.faces.is_empty() {
            self.components = self.effective_components();
        }

        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(other.faces.iter().map(|face| {
            [
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]
        }));

        if !other.faces.is_empty() {
            self.components.extend(
                other
                    .effective_components()
                    .iter()
                    .map(|c| c.shifted(face_offset)),
            );
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let &[i0, i1, i2] = self.faces.get(face_index)?;
        Some(Triangle {
            v0: self.vertices.get(i0 as usize)?.position,
            v1: self.vertices.get(i1 as usize)?.position,
            v2: self.vertices.get(i2 as usize)?.position,
        })
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1) with outward faces.
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 1.0)); // 7

    mesh.faces.extend_from_slice(&[
        [0, 2, 1],
        [0, 3, 2], // bottom
        [4, 5, 6],
        [4, 6, 7], // top
        [0, 1, 5],
        [0, 5, 4], // front
        [3, 7, 6],
        [3, 6, 2], // back
        [0, 4, 7],
        [0, 7, 3], // left
        [1, 2, 6],
        [1, 6, 5], // right
    ]);

    mesh
}
