//! Recovered problems and summary counts.

use mesh_extrude::ExtrusionStats;

/// A problem the pipeline worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportWarning {
    /// A layer (or a single part of it) was left out of the scene.
    SkippedLayer {
        /// Layer identifier.
        layer: String,
        /// Why it was skipped.
        reason: String,
    },
    /// The scene could not be merged and was exported per component.
    MergeFallback {
        /// Why merging failed.
        reason: String,
    },
    /// Zero-area triangles were written with a zero normal.
    DegenerateTriangles {
        /// Component containing them.
        component: String,
        /// How many.
        count: usize,
    },
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedLayer { layer, reason } => {
                write!(f, "skipped layer '{layer}': {reason}")
            }
            Self::MergeFallback { reason } => {
                write!(f, "exported per component: {reason}")
            }
            Self::DegenerateTriangles { component, count } => {
                write!(f, "{count} degenerate triangle(s) in '{component}'")
            }
        }
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Recovered problems, in the order they occurred.
    pub warnings: Vec<ExportWarning>,
    /// Extrusion statistics, if the terrain was extruded.
    pub extrusion: Option<ExtrusionStats>,
    /// Vertices in the merged scene.
    pub vertex_count: usize,
    /// Triangles in the merged scene.
    pub face_count: usize,
    /// Components in the merged scene.
    pub component_count: usize,
}

impl ExportReport {
    /// Whether anything was recovered from.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Names of skipped layers, without repeats.
    #[must_use]
    pub fn skipped_layers(&self) -> Vec<&str> {
        let mut layers: Vec<&str> = Vec::new();
        for warning in &self.warnings {
            if let ExportWarning::SkippedLayer { layer, .. } = warning {
                if !layers.contains(&layer.as_str()) {
                    layers.push(layer);
                }
            }
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_layers_deduplicated() {
        let report = ExportReport {
            warnings: vec![
                ExportWarning::SkippedLayer {
                    layer: "roads".to_string(),
                    reason: "a".to_string(),
                },
                ExportWarning::MergeFallback {
                    reason: "b".to_string(),
                },
                ExportWarning::SkippedLayer {
                    layer: "roads".to_string(),
                    reason: "c".to_string(),
                },
            ],
            ..ExportReport::default()
        };
        assert!(report.has_warnings());
        assert_eq!(report.skipped_layers(), ["roads"]);
    }

    #[test]
    fn warning_display() {
        let w = ExportWarning::DegenerateTriangles {
            component: "terrain".to_string(),
            count: 3,
        };
        assert_eq!(w.to_string(), "3 degenerate triangle(s) in 'terrain'");
    }
}
