//! Scalar fields sampled on a regular lattice
//!
//! The mesher only ever reads a field through [`ScalarField`]; [`VoxelField`]
//! is the owned dense implementation used by the demos and tests.

use amc_math::Vec3;

/// Read access to a signed scalar field on an integer lattice
///
/// Cells are the unit cubes between samples, so a field of `n` samples along
/// an axis has `n - 1` cells along it.
pub trait ScalarField {
    /// Number of samples along x, y and z
    fn size(&self) -> [usize; 3];

    /// The 8 corner samples of cell `(x, y, z)`
    ///
    /// Corner `v` is the sample at `(x + (v & 1), y + ((v >> 1) & 1), z + ((v >> 2) & 1))`.
    /// Only required to be valid for `x < size_x - 1` (and likewise for y, z).
    fn cube(&self, x: usize, y: usize, z: usize) -> [f32; 8];

    #[inline]
    fn size_x(&self) -> usize {
        self.size()[0]
    }

    #[inline]
    fn size_y(&self) -> usize {
        self.size()[1]
    }

    #[inline]
    fn size_z(&self) -> usize {
        self.size()[2]
    }

    /// Number of cells along each axis
    fn cell_counts(&self) -> [usize; 3] {
        let [x, y, z] = self.size();
        [x.saturating_sub(1), y.saturating_sub(1), z.saturating_sub(1)]
    }
}

/// Error creating or writing a voxel field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Fewer than two samples along some axis, so there are no cells
    TooSmall([usize; 3]),
    /// Sample coordinate outside the field
    OutOfBounds { position: [usize; 3], size: [usize; 3] },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::TooSmall(size) => write!(
                f,
                "Field of {}x{}x{} samples has no cells (need at least 2 per axis)",
                size[0], size[1], size[2]
            ),
            FieldError::OutOfBounds { position, size } => write!(
                f,
                "Sample ({}, {}, {}) is outside the {}x{}x{} field",
                position[0], position[1], position[2], size[0], size[1], size[2]
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Dense field of `f32` samples
///
/// Samples are stored x-fastest: index `x + y * sx + z * sx * sy`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelField {
    size: [usize; 3],
    values: Vec<f32>,
}

impl VoxelField {
    /// Create a zero-filled field
    pub fn new(size: [usize; 3]) -> Result<Self, FieldError> {
        Self::filled(size, 0.0)
    }

    /// Create a field with every sample set to `value`
    pub fn filled(size: [usize; 3], value: f32) -> Result<Self, FieldError> {
        Self::check_size(size)?;
        Ok(Self {
            size,
            values: vec![value; size[0] * size[1] * size[2]],
        })
    }

    /// Create a field by evaluating `f` at every sample
    pub fn from_fn<F>(size: [usize; 3], mut f: F) -> Result<Self, FieldError>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        Self::check_size(size)?;
        let mut values = Vec::with_capacity(size[0] * size[1] * size[2]);
        for z in 0..size[2] {
            for y in 0..size[1] {
                for x in 0..size[0] {
                    values.push(f(x, y, z));
                }
            }
        }
        Ok(Self { size, values })
    }

    fn check_size(size: [usize; 3]) -> Result<(), FieldError> {
        if size.iter().any(|&s| s < 2) {
            return Err(FieldError::TooSmall(size));
        }
        Ok(())
    }

    /// Change the lattice size, discarding all samples (reset to zero)
    pub fn resize(&mut self, size: [usize; 3]) -> Result<(), FieldError> {
        Self::check_size(size)?;
        log::debug!("Resizing voxel field to {}x{}x{}", size[0], size[1], size[2]);
        self.size = size;
        self.values.clear();
        self.values.resize(size[0] * size[1] * size[2], 0.0);
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size[0] * (y + self.size[1] * z)
    }

    fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.size[0] && y < self.size[1] && z < self.size[2]
    }

    /// Sample at `(x, y, z)`, or `None` outside the field
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        if self.in_bounds(x, y, z) {
            Some(self.values[self.index(x, y, z)])
        } else {
            None
        }
    }

    /// Overwrite the sample at `(x, y, z)`
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) -> Result<(), FieldError> {
        if !self.in_bounds(x, y, z) {
            return Err(FieldError::OutOfBounds { position: [x, y, z], size: self.size });
        }
        let i = self.index(x, y, z);
        self.values[i] = value;
        Ok(())
    }

    /// Set every sample to `value`
    pub fn fill(&mut self, value: f32) {
        self.values.fill(value);
    }

    /// Raw samples, x-fastest
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Add a radial bump that is positive inside `radius`
    ///
    /// Each sample at distance `d < radius` from `center` gains
    /// `(radius - d) / d`, which falls to zero at the radius. Samples within
    /// 0.1 of the center gain the capped value `radius / 0.1`. On a field
    /// filled with a negative background the isosurface is a sphere of radius
    /// `radius / (1 - background)`.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32) {
        let [sx, sy, sz] = self.size;
        for z in 0..sz {
            for y in 0..sy {
                for x in 0..sx {
                    let offset = Vec3::new(x as f32, y as f32, z as f32) - center;
                    let dist = offset.length();
                    if dist >= radius {
                        continue;
                    }
                    let bump = if dist > 0.1 {
                        ((radius - dist) / dist).max(0.0)
                    } else {
                        radius / 0.1
                    };
                    let i = self.index(x, y, z);
                    self.values[i] += bump;
                }
            }
        }
    }
}

impl ScalarField for VoxelField {
    fn size(&self) -> [usize; 3] {
        self.size
    }

    fn cube(&self, x: usize, y: usize, z: usize) -> [f32; 8] {
        let base = self.index(x, y, z);
        let dx = 1;
        let dy = self.size[0];
        let dz = self.size[0] * self.size[1];
        [
            self.values[base],
            self.values[base + dx],
            self.values[base + dy],
            self.values[base + dx + dy],
            self.values[base + dz],
            self.values[base + dx + dz],
            self.values[base + dy + dz],
            self.values[base + dx + dy + dz],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_fields_without_cells() {
        assert_eq!(VoxelField::new([1, 4, 4]), Err(FieldError::TooSmall([1, 4, 4])));
        assert!(VoxelField::new([2, 2, 2]).is_ok());
    }

    #[test]
    fn test_get_set() {
        let mut field = VoxelField::new([3, 4, 5]).unwrap();
        field.set(2, 3, 4, 7.5).unwrap();
        assert_eq!(field.get(2, 3, 4), Some(7.5));
        assert_eq!(field.get(0, 0, 0), Some(0.0));
        assert_eq!(field.get(3, 0, 0), None);
        assert!(matches!(
            field.set(0, 4, 0, 1.0),
            Err(FieldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_cube_corner_order() {
        // Encode the coordinates in the value so corner order is visible
        let field = VoxelField::from_fn([3, 3, 3], |x, y, z| (x + 10 * y + 100 * z) as f32).unwrap();
        let cube = field.cube(1, 0, 1);
        for (v, value) in cube.iter().enumerate() {
            let x = 1 + (v & 1);
            let y = (v >> 1) & 1;
            let z = 1 + ((v >> 2) & 1);
            assert_eq!(*value, (x + 10 * y + 100 * z) as f32, "corner {}", v);
        }
    }

    #[test]
    fn test_cell_counts() {
        let field = VoxelField::new([4, 3, 2]).unwrap();
        assert_eq!(field.cell_counts(), [3, 2, 1]);
        assert_eq!(field.size_x(), 4);
        assert_eq!(field.size_z(), 2);
    }

    #[test]
    fn test_fill_and_resize() {
        let mut field = VoxelField::filled([2, 2, 2], -1.0).unwrap();
        assert!(field.values().iter().all(|&v| v == -1.0));
        field.fill(3.0);
        assert!(field.values().iter().all(|&v| v == 3.0));
        field.resize([3, 2, 2]).unwrap();
        assert_eq!(field.values().len(), 12);
        assert!(field.values().iter().all(|&v| v == 0.0));
        assert!(field.resize([0, 2, 2]).is_err());
    }

    #[test]
    fn test_add_sphere() {
        let mut field = VoxelField::filled([9, 9, 9], -1.0).unwrap();
        field.add_sphere(Vec3::splat(4.0), 3.0);
        // Center sample gets the capped bump
        let center = field.get(4, 4, 4).unwrap();
        assert!((center - 29.0).abs() < 1e-4);
        // Distance 1: (3 - 1) / 1 = 2
        assert_eq!(field.get(5, 4, 4), Some(1.0));
        // Distance 3 is outside the radius
        assert_eq!(field.get(7, 4, 4), Some(-1.0));
        assert_eq!(field.get(0, 0, 0), Some(-1.0));
    }
}
