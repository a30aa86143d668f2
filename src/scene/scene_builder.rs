//! SceneBuilder - Declarative sphere field construction
//!
//! Provides a fluent API for blending spheres into a voxel field.

use amc_core::VoxelField;
use amc_math::Vec3;

use super::SceneError;

/// Builder for sphere fields
///
/// # Example
/// ```ignore
/// let field = SceneBuilder::new([24, 24, 24])
///     .with_background(-1.0)
///     .add_sphere(Vec3::new(8.3, 11.6, 11.1), 6.2)
///     .add_sphere(Vec3::new(14.7, 11.2, 12.4), 5.3)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    size: [usize; 3],
    background: f32,
    spheres: Vec<(Vec3, f32)>,
    phase: f32,
    orbit: f32,
}

impl SceneBuilder {
    /// Create a builder for a field of `size` samples
    pub fn new(size: [usize; 3]) -> Self {
        Self {
            size,
            background: -1.0,
            spheres: Vec::new(),
            phase: 0.0,
            orbit: 0.0,
        }
    }

    /// Value every sample starts from (negative puts the spheres inside)
    pub fn with_background(mut self, value: f32) -> Self {
        self.background = value;
        self
    }

    /// Move sphere `i` around a circle of radius `orbit` in the xy plane,
    /// at angle `phase + i`
    pub fn with_phase(mut self, phase: f32, orbit: f32) -> Self {
        self.phase = phase;
        self.orbit = orbit;
        self
    }

    /// Add a sphere bump
    pub fn add_sphere(mut self, center: Vec3, radius: f32) -> Self {
        self.spheres.push((center, radius));
        self
    }

    /// Sphere centers after applying the phase
    pub fn sphere_centers(&self) -> Vec<Vec3> {
        self.spheres
            .iter()
            .enumerate()
            .map(|(i, &(center, _))| {
                let angle = self.phase + i as f32;
                center + Vec3::new(angle.sin(), angle.cos(), 0.0) * self.orbit
            })
            .collect()
    }

    /// Build the field
    pub fn build(self) -> Result<VoxelField, SceneError> {
        let mut field = VoxelField::filled(self.size, self.background)?;
        for (center, &(_, radius)) in self.sphere_centers().into_iter().zip(&self.spheres) {
            field.add_sphere(center, radius);
        }
        log::debug!(
            "Built sphere field {:?} with {} spheres at phase {}",
            self.size,
            self.spheres.len(),
            self.phase
        );
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene() {
        let field = SceneBuilder::new([4, 4, 4]).build().unwrap();
        assert!(field.values().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_background() {
        let field = SceneBuilder::new([3, 3, 3]).with_background(-2.5).build().unwrap();
        assert_eq!(field.get(1, 1, 1), Some(-2.5));
    }

    #[test]
    fn test_sphere_bump() {
        let field = SceneBuilder::new([9, 9, 9])
            .add_sphere(Vec3::splat(4.0), 3.0)
            .build()
            .unwrap();
        // distance 1: -1 + (3 - 1) / 1
        assert_eq!(field.get(5, 4, 4), Some(1.0));
        // outside the radius
        assert_eq!(field.get(0, 0, 0), Some(-1.0));
    }

    #[test]
    fn test_phase_moves_centers() {
        let builder = SceneBuilder::new([8, 8, 8])
            .add_sphere(Vec3::splat(4.0), 2.0)
            .add_sphere(Vec3::splat(4.0), 2.0);
        assert_eq!(builder.sphere_centers(), vec![Vec3::splat(4.0); 2]);

        let moved = builder.with_phase(0.0, 2.0).sphere_centers();
        assert!((moved[0] - Vec3::new(4.0, 6.0, 4.0)).length() < 1e-6);
        let expected = Vec3::new(4.0 + 2.0 * 1f32.sin(), 4.0 + 2.0 * 1f32.cos(), 4.0);
        assert!((moved[1] - expected).length() < 1e-6);
    }
}
