//! Where input meshes come from.

use std::path::PathBuf;

use mesh_io::{IoError, decode_stl};
use mesh_types::{IndexedMesh, Material, SpatialReference};
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// An input mesh, possibly not loaded yet.
///
/// STL carries no coordinate system, so STL sources say which spatial
/// reference their vertices are in.
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// A mesh that is already in memory.
    InMemory(IndexedMesh),
    /// An encoded STL buffer.
    StlBytes {
        /// Binary or ASCII STL.
        bytes: Vec<u8>,
        /// Reference of the encoded vertices.
        spatial_reference: SpatialReference,
    },
    /// An STL file read asynchronously.
    StlFile {
        /// File to read.
        path: PathBuf,
        /// Reference of the encoded vertices.
        spatial_reference: SpatialReference,
    },
}

impl MeshSource {
    /// STL bytes in the given reference.
    #[must_use]
    pub const fn stl_bytes(bytes: Vec<u8>, spatial_reference: SpatialReference) -> Self {
        Self::StlBytes {
            bytes,
            spatial_reference,
        }
    }

    /// STL file in the given reference.
    #[must_use]
    pub fn stl_file(path: impl Into<PathBuf>, spatial_reference: SpatialReference) -> Self {
        Self::StlFile {
            path: path.into(),
            spatial_reference,
        }
    }

    /// Short description for logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::InMemory(mesh) => format!("in-memory mesh ({} faces)", mesh.faces.len()),
            Self::StlBytes { bytes, .. } => format!("STL buffer ({} bytes)", bytes.len()),
            Self::StlFile { path, .. } => format!("STL file {}", path.display()),
        }
    }

    /// Load the mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::LoadFailure`] if the file cannot be read or the
    /// bytes are not valid STL.
    pub async fn load(self) -> ExportResult<IndexedMesh> {
        let what = self.describe();
        debug!("Loading {what}");
        let failed = |source: IoError| ExportError::LoadFailure {
            what: what.clone(),
            source,
        };

        match self {
            Self::InMemory(mesh) => Ok(mesh),
            Self::StlBytes {
                bytes,
                spatial_reference,
            } => decode_stl(&bytes)
                .map(|mesh| mesh.with_spatial_reference(spatial_reference))
                .map_err(failed),
            Self::StlFile {
                path,
                spatial_reference,
            } => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    failed(if e.kind() == std::io::ErrorKind::NotFound {
                        IoError::FileNotFound { path: path.clone() }
                    } else {
                        IoError::Io(e)
                    })
                })?;
                decode_stl(&bytes)
                    .map(|mesh| mesh.with_spatial_reference(spatial_reference))
                    .map_err(failed)
            }
        }
    }
}

impl From<IndexedMesh> for MeshSource {
    fn from(mesh: IndexedMesh) -> Self {
        Self::InMemory(mesh)
    }
}

/// One feature of a layer.
#[derive(Debug, Clone)]
pub struct FeatureInput {
    /// Feature identifier, unique within its layer.
    pub id: String,
    /// Where its mesh comes from.
    pub source: MeshSource,
    /// Surface material, if the layer renders one.
    pub material: Option<Material>,
}

impl FeatureInput {
    /// Create a feature without a material.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<MeshSource>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            material: None,
        }
    }

    /// Attach a material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// An ordered group of features.
#[derive(Debug, Clone)]
pub struct LayerInput {
    /// Layer identifier.
    pub id: String,
    /// Features in draw order.
    pub features: Vec<FeatureInput>,
}

impl LayerInput {
    /// Create an empty layer.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: Vec::new(),
        }
    }

    /// Append a feature.
    #[must_use]
    pub fn with_feature(mut self, feature: FeatureInput) -> Self {
        self.features.push(feature);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_io::{StlOptions, encode_stl};
    use mesh_types::{MeshTopology, unit_cube};

    #[tokio::test]
    async fn load_in_memory() {
        let mesh = MeshSource::from(unit_cube()).load().await.unwrap();
        assert_eq!(mesh.face_count(), 12);
    }

    #[tokio::test]
    async fn load_stl_bytes_sets_reference() {
        let bytes = encode_stl(&unit_cube(), &StlOptions::default()).unwrap();
        let mesh = MeshSource::stl_bytes(bytes, SpatialReference::WGS84)
            .load()
            .await
            .unwrap();
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.spatial_reference, SpatialReference::WGS84);
    }

    #[tokio::test]
    async fn load_stl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.stl");
        mesh_io::save_stl(&unit_cube(), &path, &StlOptions::ascii()).unwrap();

        let mesh = MeshSource::stl_file(&path, SpatialReference::LOCAL)
            .load()
            .await
            .unwrap();
        assert_eq!(mesh.face_count(), 12);
    }

    #[tokio::test]
    async fn missing_file_is_load_failure() {
        let err = MeshSource::stl_file("does/not/exist.stl", SpatialReference::LOCAL)
            .load()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::LoadFailure {
                source: IoError::FileNotFound { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn garbage_bytes_are_load_failure() {
        let err = MeshSource::stl_bytes(vec![1, 2, 3], SpatialReference::LOCAL)
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::LoadFailure { .. }));
        assert!(err.to_string().contains("STL buffer (3 bytes)"));
    }
}
