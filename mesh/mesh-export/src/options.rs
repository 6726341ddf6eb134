//! Export options and output formats.

use mesh_assembly::SceneExport;
use mesh_io::StlOptions;
use mesh_types::IndexedMesh;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// User-facing export options.
///
/// Every field has a default, so a JSON document may set only what it needs.
///
/// ```
/// use mesh_export::ExportOptions;
///
/// let opts = ExportOptions::from_json(r#"{ "extrusionDepth": 25.0 }"#).unwrap();
/// assert!(opts.extrude_base);
/// assert_eq!(opts.extrusion_depth, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Add a vertical marker at the origin.
    pub include_origin_marker: bool,
    /// Extend the solid `extrusion_depth` below the scene. When unset the
    /// base is flush with the lowest vertex.
    pub extrude_base: bool,
    /// Metres between the lowest input vertex and the base.
    pub extrusion_depth: f64,
    /// Output file name.
    pub filename: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_origin_marker: false,
            extrude_base: true,
            extrusion_depth: 10.0,
            filename: "export.stl".to_string(),
        }
    }
}

impl ExportOptions {
    /// Parse and validate options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] for malformed JSON or values
    /// that fail [`ExportOptions::validate`].
    pub fn from_json(json: &str) -> ExportResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ExportError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] if serialization fails.
    pub fn to_json(&self) -> ExportResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::InvalidOptions(e.to_string()))
    }

    /// Check option ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] for a negative or non-finite
    /// depth, or an empty file name.
    pub fn validate(&self) -> ExportResult<()> {
        if !self.extrusion_depth.is_finite() || self.extrusion_depth < 0.0 {
            return Err(ExportError::InvalidOptions(format!(
                "extrusion depth must be a finite, non-negative number of metres, got {}",
                self.extrusion_depth
            )));
        }
        if self.filename.trim().is_empty() {
            return Err(ExportError::InvalidOptions(
                "filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// File name without its extension, used as the STL solid name.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.filename.trim();
        std::path::Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
    }
}

/// What the pipeline should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportFormat {
    /// The merged mesh itself.
    Mesh,
    /// STL bytes.
    Stl(StlOptions),
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Stl(StlOptions::default())
    }
}

impl ExportFormat {
    /// Check format options.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] for invalid STL options.
    pub fn validate(&self) -> ExportResult<()> {
        match self {
            Self::Mesh => Ok(()),
            Self::Stl(options) => options
                .validate()
                .map_err(|e| ExportError::InvalidOptions(e.to_string())),
        }
    }
}

/// Pipeline output.
#[derive(Debug, Clone)]
pub enum ExportOutput {
    /// Merged, attribute-normalized mesh.
    Mesh(IndexedMesh),
    /// Encoded STL.
    Stl(SceneExport),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ExportOptions::default();
        assert!(!opts.include_origin_marker);
        assert!(opts.extrude_base);
        assert!(opts.validate().is_ok());
        assert_eq!(opts.stem(), "export");
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ExportOptions::from_json("{}").unwrap(), ExportOptions::default());
    }

    #[test]
    fn json_round_trip() {
        let opts = ExportOptions {
            include_origin_marker: true,
            filename: "zurich.stl".to_string(),
            ..ExportOptions::default()
        };
        let back = ExportOptions::from_json(&opts.to_json().unwrap()).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn negative_depth_rejected() {
        let err = ExportOptions::from_json(r#"{ "extrusionDepth": -1 }"#).unwrap_err();
        assert!(matches!(err, ExportError::InvalidOptions(_)));
    }

    #[test]
    fn blank_filename_rejected() {
        let opts = ExportOptions {
            filename: "  ".to_string(),
            ..ExportOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            ExportOptions::from_json("{ not json"),
            Err(ExportError::InvalidOptions(_))
        ));
    }

    #[test]
    fn format_from_json() {
        let format: ExportFormat =
            serde_json::from_str(r#"{ "type": "stl", "binary": false }"#).unwrap();
        let ExportFormat::Stl(stl) = format else {
            panic!("expected stl");
        };
        assert!(!stl.binary);
        assert!(stl.merge_geometries);

        let mesh: ExportFormat = serde_json::from_str(r#"{ "type": "mesh" }"#).unwrap();
        assert_eq!(mesh, ExportFormat::Mesh);
    }

    #[test]
    fn invalid_stl_scale_rejected() {
        let format = ExportFormat::Stl(StlOptions::default().with_scale(-2.0));
        assert!(matches!(format.validate(), Err(ExportError::InvalidOptions(_))));
    }
}
