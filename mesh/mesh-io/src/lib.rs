//! STL encoding and decoding for exported meshes.
//!
//! STL is a plain triangle soup: no shared vertices, no colours, no
//! materials. Encoding writes one facet per face with a normal and three
//! `f32` corners; decoding welds identical corners back into shared vertices.
//!
//! - [`encode_stl`] / [`write_stl`] / [`save_stl`] - binary or ASCII output,
//!   selected by [`StlOptions`]
//! - [`decode_stl`] / [`load_stl`] - auto-detecting input
//!
//! # Layer 0 Crate
//!
//! Depends only on `mesh-types`. With the `serde` feature, [`StlOptions`]
//! can be read from option documents (camelCase keys, all optional).
//!
//! # Example
//!
//! ```
//! use mesh_io::{decode_stl, encode_stl, StlOptions};
//! use mesh_types::{unit_cube, MeshTopology};
//!
//! let bytes = encode_stl(&unit_cube(), &StlOptions::default()).unwrap();
//! let back = decode_stl(&bytes).unwrap();
//!
//! assert_eq!(back.face_count(), 12);
//! assert_eq!(back.vertex_count(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{
    HEADER_SIZE, StlOptions, TRIANGLE_SIZE, binary_stl_len, decode_stl, encode_stl, facet_normal,
    load_stl, save_stl, write_stl,
};

#[cfg(all(test, feature = "serde"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn options_from_partial_json() {
        let opts: StlOptions =
            serde_json::from_str(r#"{"binary": false, "mergeGeometries": false}"#).unwrap();
        assert!(!opts.binary);
        assert!(!opts.merge_geometries);
        assert_eq!(opts.name, "mesh");
        assert!((opts.scale - 1.0).abs() < f64::EPSILON);
    }
}
