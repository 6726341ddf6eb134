//! Named face groups and their surface materials.

use std::ops::Range;

use crate::VertexColor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Surface appearance attached to a component.
///
/// STL has no notion of materials; they are kept so a merged mesh handed to
/// another encoder still knows which part is terrain and which is a feature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Optional material name.
    pub name: Option<String>,
    /// Base color.
    pub color: VertexColor,
}

impl Material {
    /// Create an unnamed material with the given color.
    #[must_use]
    pub const fn from_color(color: VertexColor) -> Self {
        Self { name: None, color }
    }

    /// Set the material name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A contiguous, labelled slice of a mesh's face buffer.
///
/// Components share the mesh's single vertex buffer; they only group and
/// label faces. `faces` is a range of face indices (triangles, not flat
/// indices).
///
/// ```
/// use mesh_types::MeshComponent;
///
/// let c = MeshComponent::new("terrain", 0..12);
/// assert_eq!(c.face_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshComponent {
    /// Label for this component (layer or feature name).
    pub name: String,
    /// Optional surface material.
    pub material: Option<Material>,
    /// Range of face indices owned by this component.
    pub faces: Range<usize>,
}

impl MeshComponent {
    /// Create a component without a material.
    #[must_use]
    pub fn new(name: impl Into<String>, faces: Range<usize>) -> Self {
        Self {
            name: name.into(),
            material: None,
            faces,
        }
    }

    /// Attach a material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Number of triangles in this component.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Return a copy with the face range shifted by `offset`.
    #[must_use]
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            name: self.name.clone(),
            material: self.material.clone(),
            faces: (self.faces.start + offset)..(self.faces.end + offset),
        }
    }
}
