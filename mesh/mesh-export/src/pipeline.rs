//! The export pipeline.
//!
//! ```text
//! Idle → Loading → Normalizing → Extruding → Merging → AttributeFixup → Exporting → Done
//!                                                                    any stage → Failed
//! ```

use futures::future::{join, join_all};
use mesh_assembly::{
    Assembly, AssemblyError, MergeOutcome, Part, SceneExport, encode_outcome, merge_meshes,
    normalize_attributes, origin_marker, split_components, vertical_extent,
};
use mesh_extrude::{ExtrudeParams, extrude_solid};
use mesh_io::StlOptions;
use mesh_spatial::{Origin, SpaceTransform, SpatialError, VertexSpace};
use mesh_types::{IndexedMesh, Material, MeshTopology, Point3, SpatialReference, VertexColor};
use tokio::sync::watch;
use tokio::task::yield_now;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{ExportError, ExportResult};
use crate::options::{ExportFormat, ExportOptions, ExportOutput};
use crate::report::{ExportReport, ExportWarning};
use crate::source::{LayerInput, MeshSource};
use crate::stage::ExportStage;

/// Component name of the terrain in the merged scene.
pub const TERRAIN_COMPONENT: &str = "terrain";

/// Everything one export needs.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// The terrain surface.
    pub terrain: MeshSource,
    /// Terrain material; a neutral brown when unset.
    pub terrain_material: Option<Material>,
    /// Feature layers in draw order.
    pub layers: Vec<LayerInput>,
    /// Anchor of the output frame.
    pub origin: Origin,
    /// User options.
    pub options: ExportOptions,
    /// Output format.
    pub format: ExportFormat,
}

impl ExportRequest {
    /// A request with default options and STL output.
    #[must_use]
    pub fn new(terrain: impl Into<MeshSource>, origin: Origin) -> Self {
        Self {
            terrain: terrain.into(),
            terrain_material: None,
            layers: Vec::new(),
            origin,
            options: ExportOptions::default(),
            format: ExportFormat::default(),
        }
    }

    /// Append a layer.
    #[must_use]
    pub fn with_layer(mut self, layer: LayerInput) -> Self {
        self.layers.push(layer);
        self
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the output format.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the terrain material.
    #[must_use]
    pub fn with_terrain_material(mut self, material: Material) -> Self {
        self.terrain_material = Some(material);
        self
    }
}

/// Output and report of a successful run.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// What was produced.
    pub output: ExportOutput,
    /// Recovered problems and counts.
    pub report: ExportReport,
    /// File name from the options.
    pub filename: String,
}

#[derive(Debug)]
struct LoadedFeature {
    id: String,
    mesh: IndexedMesh,
    material: Option<Material>,
}

#[derive(Debug)]
struct LoadedLayer {
    id: String,
    features: Vec<LoadedFeature>,
}

impl LoadedLayer {
    fn meshes(&self) -> impl Iterator<Item = &IndexedMesh> {
        self.features.iter().map(|f| &f.mesh)
    }
}

/// A single-use export run.
///
/// Each stage change is recorded and broadcast to subscribers.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Point3, SpatialReference};
/// use mesh_spatial::Origin;
/// use mesh_export::{CancelToken, ExportOutput, ExportPipeline, ExportRequest, ExportStage};
/// use mesh_assembly::SceneExport;
///
/// let square = IndexedMesh::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
///     &[0, 1, 2, 0, 2, 3],
/// );
/// let request = ExportRequest::new(square, Origin::new(Point3::origin(), SpatialReference::LOCAL));
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let mut pipeline = ExportPipeline::new();
/// let artifact = runtime.block_on(pipeline.run(request, &CancelToken::never())).unwrap();
///
/// assert_eq!(pipeline.stage(), &ExportStage::Done);
/// assert_eq!(artifact.report.face_count, 12);
/// assert!(matches!(artifact.output, ExportOutput::Stl(SceneExport::Single(ref b)) if b.len() == 84 + 12 * 50));
/// ```
#[derive(Debug)]
pub struct ExportPipeline {
    stage: ExportStage,
    history: Vec<ExportStage>,
    notify: watch::Sender<ExportStage>,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportPipeline {
    /// A pipeline in the `Idle` stage.
    #[must_use]
    pub fn new() -> Self {
        let (notify, _) = watch::channel(ExportStage::Idle);
        Self {
            stage: ExportStage::Idle,
            history: vec![ExportStage::Idle],
            notify,
        }
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> &ExportStage {
        &self.stage
    }

    /// Every stage entered so far, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[ExportStage] {
        &self.history
    }

    /// Receive stage changes as they happen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ExportStage> {
        self.notify.subscribe()
    }

    fn enter(&mut self, stage: ExportStage) {
        debug!("Export stage: {} -> {}", self.stage, stage);
        self.stage = stage.clone();
        self.history.push(stage.clone());
        self.notify.send_replace(stage);
    }

    /// Run the export.
    ///
    /// Layers and features are loaded and converted concurrently, but the
    /// merged scene always lists them in request order. Every suspend point
    /// observes `cancel`; a cancelled run returns [`ExportError::Cancelled`]
    /// and produces nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::AlreadyRun`] if this pipeline has left `Idle`,
    /// and any fatal error of the stages otherwise; the pipeline then ends in
    /// [`ExportStage::Failed`].
    pub async fn run(
        &mut self,
        request: ExportRequest,
        cancel: &CancelToken,
    ) -> ExportResult<ExportArtifact> {
        if self.stage != ExportStage::Idle {
            return Err(ExportError::AlreadyRun {
                stage: self.stage.to_string(),
            });
        }

        match self.execute(request, cancel).await {
            Ok(artifact) => {
                self.enter(ExportStage::Done);
                Ok(artifact)
            }
            Err(e) => {
                if e.is_cancelled() {
                    info!("Export cancelled during {}", self.stage);
                } else {
                    warn!("Export failed during {}: {}", self.stage, e);
                }
                self.enter(ExportStage::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn execute(
        &mut self,
        request: ExportRequest,
        cancel: &CancelToken,
    ) -> ExportResult<ExportArtifact> {
        let ExportRequest {
            terrain,
            terrain_material,
            layers,
            origin,
            options,
            format,
        } = request;
        let mut report = ExportReport::default();

        self.enter(ExportStage::Loading);
        options.validate()?;
        format.validate()?;
        let (terrain, layers) = load_inputs(terrain, layers, cancel).await?;

        self.enter(ExportStage::Normalizing);
        let space = VertexSpace::select(origin);
        let transform = space.transform()?;
        info!("Normalizing scene into {space}");
        let terrain = cancel
            .guard(async {
                yield_now().await;
                transform.apply(&terrain)
            })
            .await??;
        let layers = normalize_layers(layers, &transform, cancel, &mut report).await?;

        self.enter(ExportStage::Extruding);
        let terrain_material = terrain_material.unwrap_or_else(|| {
            Material::from_color(VertexColor::TERRAIN).with_name(TERRAIN_COMPONENT)
        });
        let inputs = std::iter::once(&terrain).chain(layers.iter().flat_map(LoadedLayer::meshes));
        let terrain = match vertical_extent(inputs) {
            Some((min_z, _)) => {
                // Without a base the solid is closed flush with the lowest vertex
                let depth = if options.extrude_base {
                    options.extrusion_depth
                } else {
                    debug!("Base extrusion disabled, closing the surface at z={min_z:.3}");
                    0.0
                };
                let component = (TERRAIN_COMPONENT.to_string(), Some(terrain_material.clone()));
                let params = ExtrudeParams {
                    component: Some(component),
                    ..ExtrudeParams::at_elevation(min_z - depth)
                };
                let (solid, stats) = cancel
                    .guard(async {
                        yield_now().await;
                        extrude_solid(&terrain, &params)
                    })
                    .await??;
                report.extrusion = Some(stats);
                solid
            }
            None => terrain,
        };

        cancel.check()?;
        self.enter(ExportStage::Merging);
        let outcome = merge_scene(
            terrain,
            terrain_material,
            layers,
            options.include_origin_marker,
            &options.filename,
            &mut report,
        )?;

        cancel.check()?;
        self.enter(ExportStage::AttributeFixup);
        let outcome = match outcome {
            MergeOutcome::Merged(mesh) => MergeOutcome::Merged(normalize_attributes(&mesh)),
            MergeOutcome::Fallback(parts) => {
                MergeOutcome::Fallback(parts.iter().map(normalize_attributes).collect())
            }
        };
        let pieces = outcome_meshes(&outcome);
        report.vertex_count = pieces.iter().map(|m| m.vertex_count()).sum();
        report.face_count = pieces.iter().map(|m| m.face_count()).sum();
        report.component_count = pieces.iter().map(|m| m.component_count()).sum();

        cancel.check()?;
        self.enter(ExportStage::Exporting);
        let output = match format {
            ExportFormat::Mesh => ExportOutput::Mesh(match outcome {
                MergeOutcome::Merged(mesh) => mesh,
                // Fixed-up pieces share one layout, so they concatenate
                MergeOutcome::Fallback(parts) => merge_meshes(&parts)?,
            }),
            ExportFormat::Stl(stl) => {
                let stl = StlOptions {
                    name: options.stem().to_string(),
                    ..stl
                };
                for mesh in pieces {
                    report.warnings.extend(degenerate_warnings(mesh));
                }
                let encoded = cancel
                    .guard(async {
                        yield_now().await;
                        encode_scene(outcome, &stl)
                    })
                    .await??;
                ExportOutput::Stl(encoded)
            }
        };

        for warning in &report.warnings {
            debug!("Export warning: {warning}");
        }
        info!(
            "Export complete: {} vertices, {} faces, {} component(s), {} warning(s)",
            report.vertex_count,
            report.face_count,
            report.component_count,
            report.warnings.len()
        );

        Ok(ExportArtifact {
            output,
            report,
            filename: options.filename,
        })
    }
}

/// Load the terrain and every feature concurrently, keeping request order.
async fn load_inputs(
    terrain: MeshSource,
    layers: Vec<LayerInput>,
    cancel: &CancelToken,
) -> ExportResult<(IndexedMesh, Vec<LoadedLayer>)> {
    let layer_loads = layers.into_iter().map(|layer| async move {
        let loads = join_all(layer.features.into_iter().map(|feature| async move {
            let mesh = feature.source.load().await?;
            Ok::<_, ExportError>(LoadedFeature {
                id: feature.id,
                mesh,
                material: feature.material,
            })
        }))
        .await;
        Ok::<_, ExportError>(LoadedLayer {
            id: layer.id,
            features: loads.into_iter().collect::<ExportResult<_>>()?,
        })
    });

    let (terrain, layers) = cancel.guard(join(terrain.load(), join_all(layer_loads))).await?;
    let terrain = terrain?;
    let layers = layers.into_iter().collect::<ExportResult<Vec<_>>>()?;

    debug!(
        "Loaded terrain ({} faces) and {} layer(s)",
        terrain.face_count(),
        layers.len()
    );
    Ok((terrain, layers))
}

/// Move every layer into the output frame.
///
/// A layer with any feature that cannot be converted is dropped whole and
/// reported.
async fn normalize_layers(
    layers: Vec<LoadedLayer>,
    transform: &SpaceTransform,
    cancel: &CancelToken,
    report: &mut ExportReport,
) -> ExportResult<Vec<LoadedLayer>> {
    let conversions = layers.into_iter().map(|layer| async move {
        yield_now().await;
        let mut features = Vec::with_capacity(layer.features.len());
        for feature in layer.features {
            match transform.apply(&feature.mesh) {
                Ok(mesh) => features.push(LoadedFeature { mesh, ..feature }),
                Err(e) => return Err((layer.id, feature.id, e)),
            }
        }
        Ok(LoadedLayer {
            id: layer.id,
            features,
        })
    });

    let results = cancel.guard(join_all(conversions)).await?;

    let mut kept = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(layer) => kept.push(layer),
            Err((layer, feature, e)) => {
                warn!("Skipping layer '{layer}': feature '{feature}': {e}");
                report.warnings.push(ExportWarning::SkippedLayer {
                    layer,
                    reason: skip_reason(&feature, &e),
                });
            }
        }
    }
    Ok(kept)
}

fn skip_reason(feature: &str, error: &SpatialError) -> String {
    format!("feature '{feature}': {error}")
}

/// Assemble terrain, features and the optional marker in that order.
///
/// The parts are merged into one mesh when their vertex attributes agree.
/// Otherwise the scene falls back to its separate components and the reason
/// is reported.
fn merge_scene(
    terrain: IndexedMesh,
    terrain_material: Material,
    layers: Vec<LoadedLayer>,
    include_origin_marker: bool,
    name: &str,
    report: &mut ExportReport,
) -> ExportResult<MergeOutcome> {
    let mut assembly = Assembly::with_reference(name, SpatialReference::LOCAL);
    assembly.add_part(Part::new(TERRAIN_COMPONENT, terrain).with_material(terrain_material))?;

    for layer in layers {
        for feature in layer.features {
            let mut part = Part::new(format!("{}/{}", layer.id, feature.id), feature.mesh)
                .with_layer(layer.id.clone());
            if let Some(material) = feature.material {
                part = part.with_material(material);
            }
            assembly.add_part(part)?;
        }
    }

    if include_origin_marker {
        let extent = vertical_extent(assembly.parts().map(Part::mesh)).unwrap_or((0.0, 0.0));
        assembly.add_part(Part::new(
            mesh_assembly::ORIGIN_MARKER_NAME,
            origin_marker(Point3::origin(), extent),
        ))?;
    }

    let (meshes, skipped) = assembly.part_meshes();
    for skipped in skipped {
        report.warnings.push(ExportWarning::SkippedLayer {
            layer: skipped.layer.unwrap_or(skipped.id),
            reason: format!("vertices are in {}", skipped.spatial_reference),
        });
    }

    if meshes.iter().all(|m| m.face_count() == 0) {
        return Err(ExportError::NoGeometryFound);
    }

    let outcome = match merge_meshes(&meshes) {
        Ok(mesh) => MergeOutcome::Merged(mesh),
        Err(AssemblyError::MergeFailure { reason }) => {
            warn!("Merge failed, keeping components separate: {reason}");
            report.warnings.push(ExportWarning::MergeFallback { reason });
            MergeOutcome::Fallback(split_components(&meshes))
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Merged scene '{name}': {} part(s) into {} mesh(es)",
        meshes.len(),
        outcome_meshes(&outcome).len()
    );
    Ok(outcome)
}

fn outcome_meshes(outcome: &MergeOutcome) -> &[IndexedMesh] {
    match outcome {
        MergeOutcome::Merged(mesh) => std::slice::from_ref(mesh),
        MergeOutcome::Fallback(parts) => parts,
    }
}

/// One warning per component containing zero-area triangles.
fn degenerate_warnings(mesh: &IndexedMesh) -> Vec<ExportWarning> {
    mesh.effective_components()
        .into_iter()
        .filter_map(|component| {
            let count = component
                .faces
                .clone()
                .filter_map(|i| mesh.triangle(i))
                .filter(|t| t.is_degenerate())
                .count();
            (count > 0).then(|| {
                warn!(
                    "{count} degenerate triangle(s) in '{}' written with zero normals",
                    component.name
                );
                ExportWarning::DegenerateTriangles {
                    component: component.name,
                    count,
                }
            })
        })
        .collect()
}

/// Encode the scene as one STL, or one per component when it was not merged
/// or the options ask for separate files.
fn encode_scene(outcome: MergeOutcome, options: &StlOptions) -> ExportResult<SceneExport> {
    let outcome = match outcome {
        MergeOutcome::Merged(mesh) if !options.merge_geometries => {
            MergeOutcome::Fallback(split_components(std::slice::from_ref(&mesh)))
        }
        outcome => outcome,
    };
    Ok(encode_outcome(&outcome, options)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    #[test]
    fn degenerate_triangles_reported_per_component() {
        let mut mesh = unit_cube();
        mesh.vertices.push(mesh_types::Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.faces.push([0, 1, 8]);
        mesh.set_single_component("walls", None);

        let warnings = degenerate_warnings(&mesh);
        assert_eq!(
            warnings,
            vec![ExportWarning::DegenerateTriangles {
                component: "walls".to_string(),
                count: 1,
            }]
        );
    }

    #[test]
    fn merge_scene_orders_components() {
        let layers = vec![LoadedLayer {
            id: "buildings".to_string(),
            features: vec![LoadedFeature {
                id: "b1".to_string(),
                mesh: unit_cube(),
                material: None,
            }],
        }];
        let mut report = ExportReport::default();
        let outcome = merge_scene(
            unit_cube(),
            Material::default(),
            layers,
            true,
            "scene",
            &mut report,
        )
        .unwrap();

        let MergeOutcome::Merged(mesh) = outcome else {
            panic!("expected a merged scene");
        };
        let names: Vec<_> = mesh.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["terrain", "buildings/b1", "origin"]);
        assert!(!report.has_warnings());
    }

    #[test]
    fn merge_scene_falls_back_on_mixed_attributes() {
        let mut tinted = unit_cube();
        tinted.vertices[0].attributes.color = Some(VertexColor::RED);
        let layers = vec![LoadedLayer {
            id: "trees".to_string(),
            features: vec![LoadedFeature {
                id: "t1".to_string(),
                mesh: tinted,
                material: None,
            }],
        }];
        let mut report = ExportReport::default();
        let outcome = merge_scene(
            unit_cube(),
            Material::default(),
            layers,
            false,
            "scene",
            &mut report,
        )
        .unwrap();

        let MergeOutcome::Fallback(parts) = outcome else {
            panic!("expected per-component fallback");
        };
        let names: Vec<_> = parts.iter().map(|p| p.components[0].name.as_str()).collect();
        assert_eq!(names, ["terrain", "trees/t1"]);
        assert!(matches!(
            report.warnings.as_slice(),
            [ExportWarning::MergeFallback { .. }]
        ));
    }

    #[test]
    fn unmerged_stl_option_splits_scene() {
        let mut mesh = unit_cube();
        mesh.merge(&unit_cube());
        let options = StlOptions {
            merge_geometries: false,
            ..StlOptions::default()
        };
        let export = encode_scene(MergeOutcome::Merged(mesh), &options).unwrap();
        assert_eq!(export.file_count(), 2);
    }

    #[test]
    fn merge_scene_without_geometry() {
        let mut report = ExportReport::default();
        let err = merge_scene(
            IndexedMesh::new(),
            Material::default(),
            Vec::new(),
            false,
            "scene",
            &mut report,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::NoGeometryFound));
    }
}
