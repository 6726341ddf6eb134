//! Solid extrusion of open surfaces.

mod generate;
mod validation;
mod walls;

pub use generate::{BottomElevation, ExtrudeParams, ExtrusionStats, extrude_solid};
pub use validation::{SolidIssue, SolidValidation, validate_solid};
pub use walls::{bottom_faces, wall_faces};
