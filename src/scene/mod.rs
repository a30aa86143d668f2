//! Demo fields
//!
//! Two kinds of field are available: blended spheres built with
//! [`SceneBuilder`], and the six [ambiguous strips](ambiguous_scenario) that
//! put an ambiguous face between two cells.

mod scene_builder;
mod ambiguous;

pub use scene_builder::SceneBuilder;
pub use ambiguous::{ambiguous_scenario, AMBIGUOUS_CASE_COUNT};

use amc_core::{FieldError, VoxelField};
use amc_math::Vec3;

use crate::config::{SceneConfig, SceneKind};

/// Error building a demo field
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Ambiguous scenario index out of range
    UnknownAmbiguousCase(usize),
    /// The field could not be created
    Field(FieldError),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownAmbiguousCase(index) => write!(
                f,
                "Unknown ambiguous scenario {} (expected 0..{})",
                index, AMBIGUOUS_CASE_COUNT
            ),
            SceneError::Field(e) => write!(f, "Field error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for SceneError {
    fn from(e: FieldError) -> Self {
        SceneError::Field(e)
    }
}

/// Build the field a scene configuration describes
pub fn build_scene(scene: &SceneConfig, size: [usize; 3]) -> Result<VoxelField, SceneError> {
    match scene.kind {
        SceneKind::Spheres => scene
            .spheres
            .iter()
            .fold(
                SceneBuilder::new(size)
                    .with_background(scene.background)
                    .with_phase(scene.phase, scene.orbit),
                |builder, sphere| builder.add_sphere(Vec3::from_array(sphere.center), sphere.radius),
            )
            .build(),
        SceneKind::Ambiguous => ambiguous_scenario(scene.ambiguous_case),
    }
}
