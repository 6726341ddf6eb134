//! STL (Stereolithography) encoding and decoding.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! # Format Detection
//!
//! A buffer whose length is exactly `84 + 50 * count` is binary, even if its
//! header happens to start with `solid`. Otherwise a buffer starting with
//! `solid` is ASCII and anything else is treated as binary.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, MeshTopology, Vector3, Vertex};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
pub const TRIANGLE_SIZE: usize = 50;

/// Options for STL encoding.
///
/// ```
/// use mesh_io::StlOptions;
///
/// let opts = StlOptions::default();
/// assert!(opts.binary);
/// assert!(opts.merge_geometries);
/// assert_eq!(opts.scale, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StlOptions {
    /// Binary (`true`) or ASCII (`false`) output.
    pub binary: bool,
    /// Uniform scale applied to positions on write.
    pub scale: f64,
    /// Merge all meshes of a scene into one STL before encoding.
    pub merge_geometries: bool,
    /// Solid name for ASCII output and the binary header.
    pub name: String,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self {
            binary: true,
            scale: 1.0,
            merge_geometries: true,
            name: "mesh".to_string(),
        }
    }
}

impl StlOptions {
    /// ASCII output with otherwise default options.
    #[must_use]
    pub fn ascii() -> Self {
        Self {
            binary: false,
            ..Self::default()
        }
    }

    /// Set the solid name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the position scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Check that the options can be used for encoding.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidOptions`] if `scale` is not a positive finite
    /// number.
    pub fn validate(&self) -> IoResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(IoError::InvalidOptions(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Name safe to put on the `solid` line: whitespace collapsed to `_`.
    fn solid_name(&self) -> String {
        let cleaned: String = self
            .name
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        if cleaned.is_empty() {
            "mesh".to_string()
        } else {
            cleaned
        }
    }
}

/// Byte length of a binary STL with `triangle_count` triangles.
#[must_use]
pub const fn binary_stl_len(triangle_count: usize) -> usize {
    HEADER_SIZE + 4 + TRIANGLE_SIZE * triangle_count
}

/// Normal written for a face.
///
/// When all three vertices carry the same normal it is used as is;
/// otherwise the normal comes from the cross product of two edges. A
/// degenerate triangle gets a zero normal. Indices must be valid.
#[must_use]
pub fn facet_normal(mesh: &IndexedMesh, face: [u32; 3]) -> Vector3<f64> {
    let [v0, v1, v2] = face.map(|i| &mesh.vertices[i as usize]);

    if let (Some(a), Some(b), Some(c)) = (v0.normal(), v1.normal(), v2.normal()) {
        if a == b && b == c {
            let len = a.norm();
            if len > f64::EPSILON {
                return a / len;
            }
        }
    }

    let normal = (v1.position - v0.position).cross(&(v2.position - v0.position));
    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::zeros()
    }
}

/// Write a mesh as STL to any writer.
///
/// # Errors
///
/// Returns an error if the options are invalid, a face index is out of
/// range, or the writer fails.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, writer: W, options: &StlOptions) -> IoResult<()> {
    options.validate()?;
    if let Some((face, index)) = mesh.first_invalid_index() {
        return Err(IoError::InvalidIndex { face, index });
    }

    debug!(
        "Writing {} STL: {} faces, scale {}",
        if options.binary { "binary" } else { "ASCII" },
        mesh.face_count(),
        options.scale
    );

    if options.binary {
        write_stl_binary(mesh, writer, options)
    } else {
        write_stl_ascii(mesh, writer, options)
    }
}

/// Encode a mesh as STL bytes.
///
/// ```
/// use mesh_io::{encode_stl, StlOptions};
/// use mesh_types::IndexedMesh;
///
/// let tri = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
/// let bytes = encode_stl(&tri, &StlOptions::default()).unwrap();
///
/// assert_eq!(bytes.len(), 134);
/// assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
/// ```
///
/// # Errors
///
/// See [`write_stl`].
pub fn encode_stl(mesh: &IndexedMesh, options: &StlOptions) -> IoResult<Vec<u8>> {
    let capacity = if options.binary {
        binary_stl_len(mesh.faces.len())
    } else {
        // Roughly 260 bytes per ASCII facet
        mesh.faces.len() * 260 + 64
    };
    let mut buf = Vec::with_capacity(capacity);
    write_stl(mesh, &mut buf, options)?;
    Ok(buf)
}

/// Save a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be written; see also [`write_stl`].
///
/// # Example
///
/// ```no_run
/// use mesh_io::{save_stl, StlOptions};
/// use mesh_types::unit_cube;
///
/// save_stl(&unit_cube(), "cube.stl", &StlOptions::default()).unwrap();
/// save_stl(&unit_cube(), "cube_ascii.stl", &StlOptions::ascii()).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, options: &StlOptions) -> IoResult<()> {
    let path = path.as_ref();
    info!("Saving STL to {}", path.display());
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, options)?;
    writer.flush()?;
    Ok(())
}

/// Save mesh as binary STL.
#[allow(clippy::cast_possible_truncation)]
// Truncation: STL stores f32 coordinates and a u32 face count
fn write_stl_binary<W: Write>(mesh: &IndexedMesh, mut writer: W, options: &StlOptions) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = format!("binary STL {}", options.solid_name());
    let len = text.len().min(HEADER_SIZE);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;

    for &face in &mesh.faces {
        let normal = facet_normal(mesh, face);
        write_vec3_binary(&mut writer, normal.x, normal.y, normal.z)?;

        for i in face {
            let p = mesh.vertices[i as usize].position * options.scale;
            write_vec3_binary(&mut writer, p.x, p.y, p.z)?;
        }

        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write three f64 values as little-endian f32.
#[allow(clippy::cast_possible_truncation)]
// Truncation: f64 to f32 is intentional for STL format
fn write_vec3_binary<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())?;
    Ok(())
}

/// Save mesh as ASCII STL.
fn write_stl_ascii<W: Write>(mesh: &IndexedMesh, mut writer: W, options: &StlOptions) -> IoResult<()> {
    let name = options.solid_name();
    writeln!(writer, "solid {name}")?;

    for &face in &mesh.faces {
        let n = facet_normal(mesh, face);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for i in face {
            let p = mesh.vertices[i as usize].position * options.scale;
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

/// Decode an STL buffer, detecting ASCII vs binary.
///
/// Vertices with bit-identical coordinates are shared, so a surface written
/// as a triangle soup comes back connected. Facet normals are not kept.
///
/// # Errors
///
/// Returns an error if the buffer is neither valid ASCII nor binary STL.
pub fn decode_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() < 6 {
        return Err(IoError::invalid_content("buffer too small to be valid STL"));
    }

    let mesh = if looks_binary(bytes) {
        decode_stl_binary(bytes)?
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        decode_stl_ascii(bytes)?
    } else {
        decode_stl_binary(bytes)?
    };

    debug!(
        "Decoded STL: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file; see also
/// [`decode_stl`].
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("terrain.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    info!("Loading STL from {}", path.display());
    decode_stl(&bytes)
}

/// Declared triangle count matches the buffer length exactly.
fn looks_binary(bytes: &[u8]) -> bool {
    declared_count(bytes).is_some_and(|count| binary_stl_len(count as usize) == bytes.len())
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Shares vertices with identical coordinates while building a mesh.
struct Welder {
    mesh: IndexedMesh,
    lookup: HashMap<[u64; 3], u32>,
}

impl Welder {
    fn with_capacity(faces: usize) -> Self {
        Self {
            mesh: IndexedMesh::with_capacity(faces, faces),
            lookup: HashMap::with_capacity(faces),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    fn vertex(&mut self, x: f64, y: f64, z: f64) -> u32 {
        let key = [x.to_bits(), y.to_bits(), z.to_bits()];
        *self.lookup.entry(key).or_insert_with(|| {
            let index = self.mesh.vertices.len() as u32;
            self.mesh.vertices.push(Vertex::from_coords(x, y, z));
            index
        })
    }

    fn face(&mut self, corners: [[f64; 3]; 3]) {
        let face = corners.map(|[x, y, z]| self.vertex(x, y, z));
        self.mesh.faces.push(face);
    }
}

fn decode_stl_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let face_count = declared_count(bytes).ok_or(IoError::InvalidHeader {
        expected: HEADER_SIZE + 4,
        got: bytes.len(),
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < face_count as usize {
        #[allow(clippy::cast_possible_truncation)]
        // available < face_count, which fits in u32
        let got = available as u32;
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got,
        });
    }

    let mut welder = Welder::with_capacity(face_count as usize);
    for chunk in body.chunks_exact(TRIANGLE_SIZE).take(face_count as usize) {
        // Skip the stored normal (12 bytes)
        welder.face([
            read_vec3(&chunk[12..24]),
            read_vec3(&chunk[24..36]),
            read_vec3(&chunk[36..48]),
        ]);
    }

    Ok(welder.mesh)
}

/// Read 3 little-endian f32s.
fn read_vec3(buf: &[u8]) -> [f64; 3] {
    let f = |o: usize| f64::from(f32::from_le_bytes([buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]));
    [f(0), f(4), f(8)]
}

fn decode_stl_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut welder = Welder::with_capacity(64);
    let mut in_facet = false;
    let mut in_loop = false;
    let mut corners: Vec<[f64; 3]> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                corners.clear();
            }
            "outer" => {
                if parts.get(1).is_some_and(|p| p.eq_ignore_ascii_case("loop")) {
                    in_loop = true;
                }
            }
            "vertex" => {
                if !in_loop || parts.len() < 4 {
                    return Err(IoError::invalid_content(format!("stray vertex line: {line}")));
                }
                corners.push([parts[1].parse()?, parts[2].parse()?, parts[3].parse()?]);
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if in_facet {
                    match <[[f64; 3]; 3]>::try_from(corners.as_slice()) {
                        Ok(tri) => welder.face(tri),
                        Err(_) => {
                            return Err(IoError::invalid_content(format!(
                                "facet with {} vertices",
                                corners.len()
                            )));
                        }
                    }
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(welder.mesh)
}
