//! Vertex spaces and mesh normalization.

use mesh_types::{IndexedMesh, Point3, SpatialReference, Vector3};
use tracing::{debug, info};

use crate::error::{SpatialError, SpatialResult};
use crate::geodesy::{EnuFrame, web_mercator_to_geodetic};

/// Anchor point of a vertex space, in its own spatial reference.
///
/// For WGS-84 the position is `(lon, lat, h)`; for projected systems it is
/// `(x, y, z)` in the projection's linear unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    /// Anchor position.
    pub position: Point3<f64>,
    /// System `position` is expressed in.
    pub spatial_reference: SpatialReference,
}

impl Origin {
    /// Create an origin.
    #[must_use]
    pub const fn new(position: Point3<f64>, spatial_reference: SpatialReference) -> Self {
        Self {
            position,
            spatial_reference,
        }
    }
}

/// Coordinate frame every exported mesh is moved into.
///
/// ```
/// use mesh_types::{Point3, SpatialReference};
/// use mesh_spatial::{Origin, VertexSpace};
///
/// let origin = Origin::new(Point3::new(8.5, 47.4, 400.0), SpatialReference::WGS84);
/// assert!(matches!(VertexSpace::select(origin), VertexSpace::Local(_)));
///
/// let lv95 = Origin::new(Point3::new(2_600_000.0, 1_200_000.0, 0.0), SpatialReference::new(2056));
/// assert!(matches!(VertexSpace::select(lv95), VertexSpace::Georeferenced(_)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexSpace {
    /// Metric east/north/up tangent frame at the origin. Needs a global
    /// (WGS-84 or Web Mercator) reference.
    Local(Origin),
    /// Same projection, translated so the origin sits at zero.
    Georeferenced(Origin),
}

impl VertexSpace {
    /// Pick the mode from the origin's reference: local for global systems,
    /// georeferenced otherwise.
    #[must_use]
    pub const fn select(origin: Origin) -> Self {
        if origin.spatial_reference.is_global() {
            Self::Local(origin)
        } else {
            Self::Georeferenced(origin)
        }
    }

    /// The anchor of this space.
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        match self {
            Self::Local(origin) | Self::Georeferenced(origin) => origin,
        }
    }

    /// Precompute the transform into this space.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::NotGlobal`] for a local space anchored in a
    /// non-global system, and [`SpatialError::InvalidCoordinate`] for an
    /// origin outside the valid range.
    pub fn transform(&self) -> SpatialResult<SpaceTransform> {
        match *self {
            Self::Georeferenced(origin) => {
                check_finite(usize::MAX, &origin.position)?;
                Ok(SpaceTransform {
                    source: origin.spatial_reference,
                    kind: TransformKind::Translate(-origin.position.coords),
                })
            }
            Self::Local(origin) => {
                let sr = origin.spatial_reference;
                if !sr.is_global() {
                    return Err(SpatialError::NotGlobal(sr));
                }
                let geo = to_geodetic(sr, usize::MAX, &origin.position)?;
                Ok(SpaceTransform {
                    source: sr,
                    kind: TransformKind::Enu(EnuFrame::at(geo.x, geo.y, geo.z)),
                })
            }
        }
    }
}

impl std::fmt::Display for VertexSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (mode, origin) = match self {
            Self::Local(o) => ("local", o),
            Self::Georeferenced(o) => ("georeferenced", o),
        };
        write!(
            f,
            "{mode} @ ({:.6}, {:.6}, {:.3}) {}",
            origin.position.x, origin.position.y, origin.position.z, origin.spatial_reference
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum TransformKind {
    Translate(Vector3<f64>),
    Enu(EnuFrame),
}

/// A ready-to-apply vertex space transform.
#[derive(Debug, Clone, Copy)]
pub struct SpaceTransform {
    source: SpatialReference,
    kind: TransformKind,
}

impl SpaceTransform {
    /// Reference that input meshes must be expressed in.
    #[must_use]
    pub const fn source_reference(&self) -> SpatialReference {
        self.source
    }

    /// Move one position into the target frame.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidCoordinate`] (tagged with `vertex`) for
    /// non-finite or out-of-range input.
    pub fn apply_point(&self, vertex: usize, p: &Point3<f64>) -> SpatialResult<Point3<f64>> {
        match &self.kind {
            TransformKind::Translate(offset) => {
                check_finite(vertex, p)?;
                Ok(p + offset)
            }
            TransformKind::Enu(frame) => {
                let geo = to_geodetic(self.source, vertex, p)?;
                Ok(frame.geodetic_to_enu(geo.x, geo.y, geo.z))
            }
        }
    }

    /// Move a normal given at position `p` into the target frame.
    ///
    /// In local mode the normal is read as east/north/up at `p` and rotated
    /// into the frame at the origin.
    ///
    /// # Errors
    ///
    /// Same as [`apply_point`](Self::apply_point).
    pub fn apply_normal(
        &self,
        vertex: usize,
        p: &Point3<f64>,
        normal: &Vector3<f64>,
    ) -> SpatialResult<Vector3<f64>> {
        match &self.kind {
            TransformKind::Translate(_) => Ok(*normal),
            TransformKind::Enu(frame) => {
                let geo = to_geodetic(self.source, vertex, p)?;
                Ok(frame.rotate_from_local(geo.x, geo.y, normal))
            }
        }
    }

    /// Move a whole mesh into the target frame.
    ///
    /// Faces, components and attributes other than normals are copied
    /// unchanged. The result is tagged [`SpatialReference::LOCAL`].
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::ReferenceMismatch`] if the mesh is not in the
    /// transform's source reference, or [`SpatialError::InvalidCoordinate`]
    /// for the first bad vertex.
    pub fn apply(&self, mesh: &IndexedMesh) -> SpatialResult<IndexedMesh> {
        if !mesh.spatial_reference.matches(&self.source) {
            return Err(SpatialError::ReferenceMismatch {
                mesh: mesh.spatial_reference,
                origin: self.source,
            });
        }

        let mut out = mesh.clone();
        for (i, vertex) in out.vertices.iter_mut().enumerate() {
            let source = vertex.position;
            vertex.position = self.apply_point(i, &source)?;
            if let Some(normal) = vertex.attributes.normal {
                vertex.attributes.normal = Some(self.apply_normal(i, &source, &normal)?);
            }
        }
        out.spatial_reference = SpatialReference::LOCAL;

        debug!("Moved {} vertices into vertex space", out.vertices.len());
        Ok(out)
    }
}

/// Move a mesh into a vertex space.
///
/// # Errors
///
/// See [`VertexSpace::transform`] and [`SpaceTransform::apply`].
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Point3, SpatialReference};
/// use mesh_spatial::{normalize_mesh, Origin, VertexSpace};
///
/// let sr = SpatialReference::new(2056);
/// let mesh = IndexedMesh::from_raw(
///     &[2_600_010.0, 1_200_000.0, 5.0, 2_600_020.0, 1_200_000.0, 5.0, 2_600_010.0, 1_200_010.0, 5.0],
///     &[0, 1, 2],
/// )
/// .with_spatial_reference(sr);
///
/// let space = VertexSpace::select(Origin::new(Point3::new(2_600_000.0, 1_200_000.0, 0.0), sr));
/// let local = normalize_mesh(&mesh, &space).unwrap();
///
/// assert_eq!(local.vertices[0].position, Point3::new(10.0, 0.0, 5.0));
/// assert!(local.spatial_reference.is_local());
/// ```
pub fn normalize_mesh(mesh: &IndexedMesh, space: &VertexSpace) -> SpatialResult<IndexedMesh> {
    info!("Normalizing {} vertices into {}", mesh.vertices.len(), space);
    space.transform()?.apply(mesh)
}

fn check_finite(vertex: usize, p: &Point3<f64>) -> SpatialResult<()> {
    if p.x.is_finite() && p.y.is_finite() && p.z.is_finite() {
        Ok(())
    } else {
        Err(invalid(vertex, p))
    }
}

fn invalid(vertex: usize, p: &Point3<f64>) -> SpatialError {
    SpatialError::InvalidCoordinate {
        vertex,
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

/// Position in a global reference to geodetic `(lon, lat, h)`.
fn to_geodetic(sr: SpatialReference, vertex: usize, p: &Point3<f64>) -> SpatialResult<Point3<f64>> {
    check_finite(vertex, p)?;
    let (lon, lat) = if sr.is_web_mercator() {
        web_mercator_to_geodetic(p.x, p.y)
    } else {
        (p.x, p.y)
    };
    if !(-90.0..=90.0).contains(&lat) || !(-360.0..=360.0).contains(&lon) {
        return Err(invalid(vertex, p));
    }
    Ok(Point3::new(lon, lat, p.z))
}
