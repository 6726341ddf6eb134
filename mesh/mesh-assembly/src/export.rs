//! Scene export with per-component fallback.
//!
//! A scene is exported as one STL when its meshes can be merged into a single
//! buffer. When they cannot, every component is encoded on its own instead of
//! failing the whole export.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use mesh_io::{StlOptions, encode_stl};
use mesh_types::{IndexedMesh, MeshTopology};
use tracing::{debug, info, warn};

use crate::attributes::AttributeLayout;
use crate::error::{AssemblyError, AssemblyResult};

/// Outcome of [`try_merge`].
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// All inputs combined into one mesh.
    Merged(IndexedMesh),
    /// Inputs were incompatible; each component stands alone.
    Fallback(Vec<IndexedMesh>),
}

impl MergeOutcome {
    /// Whether merging succeeded.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// Total triangles across the outcome.
    #[must_use]
    pub fn face_count(&self) -> usize {
        match self {
            Self::Merged(mesh) => mesh.face_count(),
            Self::Fallback(parts) => parts.iter().map(MeshTopology::face_count).sum(),
        }
    }
}

/// Encoded scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneExport {
    /// One STL for the whole scene.
    Single(Vec<u8>),
    /// One STL per component, keyed by a file-safe component name.
    PerComponent(Vec<(String, Vec<u8>)>),
}

impl SceneExport {
    /// Total encoded size in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Single(bytes) => bytes.len(),
            Self::PerComponent(files) => files.iter().map(|(_, b)| b.len()).sum(),
        }
    }

    /// Number of files this export produces.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::PerComponent(files) => files.len(),
        }
    }

    /// Write the export to disk.
    ///
    /// A single STL is written to `path`. Per-component output goes next to
    /// it as `<stem>_<component>.stl`. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::Io`] if a file cannot be written. Files
    /// already written by this call are removed first.
    pub fn save(&self, path: &Path) -> AssemblyResult<Vec<PathBuf>> {
        let written = match self {
            Self::Single(bytes) => {
                write_file(path, bytes)?;
                vec![path.to_path_buf()]
            }
            Self::PerComponent(files) => {
                let parent = path.parent().unwrap_or_else(|| Path::new("."));
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("scene");

                let mut written = Vec::with_capacity(files.len());
                for (name, bytes) in files {
                    let file_path = parent.join(format!("{stem}_{name}.stl"));
                    if let Err(e) = write_file(&file_path, bytes) {
                        remove_written(&written);
                        return Err(e);
                    }
                    written.push(file_path);
                }
                written
            }
        };

        info!("Saved {} STL file(s) from {:?}", written.len(), path);
        Ok(written)
    }
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not remove partial output {:?}: {}", path, e);
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> AssemblyResult<()> {
    std::fs::write(path, bytes).map_err(|e| AssemblyError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Merge meshes into one buffer.
///
/// Meshes without faces are ignored. The remaining meshes must share a
/// spatial reference and a uniform attribute layout. Components of each
/// input are preserved, shifted to their new face ranges.
///
/// # Errors
///
/// Returns [`AssemblyError::MergeFailure`] when the inputs' spatial
/// references differ, when a mesh's vertices carry mixed attributes, or when
/// two meshes carry different attribute sets.
pub fn merge_meshes(meshes: &[IndexedMesh]) -> AssemblyResult<IndexedMesh> {
    let mut inputs = meshes.iter().enumerate().filter(|(_, m)| !m.is_empty());

    let Some((first_idx, first)) = inputs.next() else {
        return Ok(IndexedMesh::new());
    };
    let reference = first.spatial_reference;
    let layout = AttributeLayout::of(first).ok_or_else(|| {
        AssemblyError::merge_failure(format!("mesh {first_idx} has mixed vertex attributes"))
    })?;

    let mut merged = IndexedMesh::new().with_spatial_reference(reference);
    merged.merge(first);

    for (idx, mesh) in inputs {
        if !mesh.spatial_reference.matches(&reference) {
            return Err(AssemblyError::merge_failure(format!(
                "mesh {idx} is in {} but the scene is in {reference}",
                mesh.spatial_reference
            )));
        }
        match AttributeLayout::of(mesh) {
            Some(l) if l == layout => {}
            Some(l) => {
                return Err(AssemblyError::merge_failure(format!(
                    "mesh {idx} has attributes {l} but the scene has {layout}"
                )));
            }
            None => {
                return Err(AssemblyError::merge_failure(format!(
                    "mesh {idx} has mixed vertex attributes"
                )));
            }
        }
        merged.merge(mesh);
    }

    debug!(
        "Merged {} meshes: {} vertices, {} faces",
        meshes.len(),
        merged.vertex_count(),
        merged.face_count()
    );
    Ok(merged)
}

/// Split meshes into one standalone mesh per non-empty component.
#[must_use]
pub fn split_components(meshes: &[IndexedMesh]) -> Vec<IndexedMesh> {
    meshes
        .iter()
        .flat_map(|mesh| (0..mesh.component_count()).filter_map(|i| mesh.component_mesh(i)))
        .filter(|part| part.face_count() > 0)
        .collect()
}

/// Merge meshes, falling back to their separate components on failure.
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_assembly::{try_merge, MergeOutcome};
///
/// let outcome = try_merge(&[unit_cube(), unit_cube()]);
/// assert!(matches!(outcome, MergeOutcome::Merged(ref m) if m.components.len() == 2));
/// ```
#[must_use]
pub fn try_merge(meshes: &[IndexedMesh]) -> MergeOutcome {
    match merge_meshes(meshes) {
        Ok(mesh) => MergeOutcome::Merged(mesh),
        Err(e) => {
            warn!("{e}; exporting components separately");
            MergeOutcome::Fallback(split_components(meshes))
        }
    }
}

/// Replace characters that are not allowed in file names.
fn sanitize_filename(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            _ => c,
        })
        .collect();
    if cleaned.is_empty() {
        IndexedMesh::DEFAULT_COMPONENT_NAME.to_string()
    } else {
        cleaned
    }
}

/// Encode each mesh as its own STL, named after its first component.
///
/// Names are made file-safe and unique by suffixing repeats with the first
/// free `_2`, `_3` and so on.
///
/// # Errors
///
/// Returns [`AssemblyError::MeshIo`] if encoding fails.
pub fn encode_components(
    parts: &[IndexedMesh],
    options: &StlOptions,
) -> AssemblyResult<SceneExport> {
    let mut taken: HashSet<String> = HashSet::with_capacity(parts.len());
    let mut files = Vec::with_capacity(parts.len());

    for part in parts {
        let base = sanitize_filename(
            part.components
                .first()
                .map_or(IndexedMesh::DEFAULT_COMPONENT_NAME, |c| c.name.as_str()),
        );
        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            suffix += 1;
            name = format!("{base}_{suffix}");
        }
        taken.insert(name.clone());

        let bytes = encode_stl(part, &options.clone().with_name(name.clone()))?;
        files.push((name, bytes));
    }

    Ok(SceneExport::PerComponent(files))
}

/// Encode a merge outcome.
///
/// # Errors
///
/// Returns [`AssemblyError::MeshIo`] if encoding fails.
pub fn encode_outcome(outcome: &MergeOutcome, options: &StlOptions) -> AssemblyResult<SceneExport> {
    match outcome {
        MergeOutcome::Merged(mesh) => Ok(SceneExport::Single(encode_stl(mesh, options)?)),
        MergeOutcome::Fallback(parts) => encode_components(parts, options),
    }
}

/// Export a scene to STL.
///
/// With `merge_geometries` set, the meshes are merged into a single STL,
/// falling back to one STL per component if they cannot be merged. Without
/// it, every component is exported separately.
///
/// # Errors
///
/// Returns [`AssemblyError::NoGeometryFound`] if the scene has no triangles,
/// or [`AssemblyError::MeshIo`] for invalid options or encoding failures.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_io::StlOptions;
/// use mesh_assembly::{export_scene, SceneExport};
///
/// let export = export_scene(&[unit_cube()], &StlOptions::default()).unwrap();
/// assert!(matches!(export, SceneExport::Single(ref b) if b.len() == 84 + 12 * 50));
/// ```
pub fn export_scene(meshes: &[IndexedMesh], options: &StlOptions) -> AssemblyResult<SceneExport> {
    options.validate()?;

    let total_faces: usize = meshes.iter().map(MeshTopology::face_count).sum();
    if total_faces == 0 {
        return Err(AssemblyError::NoGeometryFound);
    }

    let export = if options.merge_geometries {
        encode_outcome(&try_merge(meshes), options)?
    } else {
        encode_components(&split_components(meshes), options)?
    };

    info!(
        "Exported scene: {} meshes, {} faces, {} file(s), {} bytes",
        meshes.len(),
        total_faces,
        export.file_count(),
        export.byte_len()
    );
    Ok(export)
}
