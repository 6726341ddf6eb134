//! Pipeline stages.

/// Where an export pipeline is.
///
/// Stages are entered in declaration order and never re-entered; `Failed`
/// can follow any stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportStage {
    /// Not started.
    #[default]
    Idle,
    /// Reading terrain and feature meshes.
    Loading,
    /// Moving meshes into the export's vertex space.
    Normalizing,
    /// Closing the terrain into a solid.
    Extruding,
    /// Combining terrain, features and marker.
    Merging,
    /// Reducing vertex attributes to position, normal and uv.
    AttributeFixup,
    /// Encoding the output.
    Exporting,
    /// Finished successfully.
    Done,
    /// Aborted with the given reason.
    Failed(String),
}

impl ExportStage {
    /// `Done` or `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl std::fmt::Display for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Normalizing => write!(f, "normalizing"),
            Self::Extruding => write!(f, "extruding"),
            Self::Merging => write!(f, "merging"),
            Self::AttributeFixup => write!(f, "attribute fixup"),
            Self::Exporting => write!(f, "exporting"),
            Self::Done => write!(f, "done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
