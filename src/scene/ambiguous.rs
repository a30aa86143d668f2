//! Two-cell strips whose shared face is ambiguous
//!
//! Each scenario is a 3-sample-long strip along one axis. The shared face
//! has alternating corners, so the two cells only stay watertight if both
//! request the same cap. Two scenarios per axis put the strip's far face on
//! either side of the shared one.

use amc_core::VoxelField;

use super::SceneError;

/// Number of ambiguous scenarios
pub const AMBIGUOUS_CASE_COUNT: usize = 6;

const INSIDE: f32 = 10.0;
const OUTSIDE: f32 = -5.0;

/// Field size and the negative samples of each scenario
const SCENARIOS: [([usize; 3], [[usize; 3]; 4]); AMBIGUOUS_CASE_COUNT] = [
    ([3, 2, 2], [[0, 0, 0], [0, 1, 1], [1, 0, 1], [1, 1, 0]]),
    ([3, 2, 2], [[1, 0, 1], [1, 1, 0], [2, 0, 0], [2, 1, 1]]),
    ([2, 3, 2], [[0, 0, 0], [1, 0, 1], [0, 1, 1], [1, 1, 0]]),
    ([2, 3, 2], [[0, 1, 1], [1, 1, 0], [0, 2, 0], [1, 2, 1]]),
    ([2, 2, 3], [[0, 0, 0], [1, 1, 0], [1, 0, 1], [0, 1, 1]]),
    ([2, 2, 3], [[1, 0, 1], [0, 1, 1], [0, 0, 2], [1, 1, 2]]),
];

/// Build ambiguous scenario `index` (0..6)
pub fn ambiguous_scenario(index: usize) -> Result<VoxelField, SceneError> {
    let (size, negatives) = SCENARIOS
        .get(index)
        .ok_or(SceneError::UnknownAmbiguousCase(index))?;

    let mut field = VoxelField::filled(*size, INSIDE)?;
    for &[x, y, z] in negatives {
        field.set(x, y, z, OUTSIDE)?;
    }
    log::debug!("Built ambiguous scenario {} ({:?})", index, size);
    Ok(field)
}
