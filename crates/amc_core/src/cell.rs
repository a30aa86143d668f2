//! Cell View - the 8 corner samples of one lattice cell

use crate::topology::EDGES;

/// The corner samples of one cell, in corner order
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellView {
    pub values: [f32; 8],
}

impl CellView {
    #[inline]
    pub fn new(values: [f32; 8]) -> Self {
        Self { values }
    }

    /// Whether the cell misses the isosurface
    ///
    /// A cell is live only if it has a strictly negative and a strictly
    /// positive corner. Exact zeros are compatible with either side.
    pub fn is_empty(&self) -> bool {
        let negative = self.values.iter().any(|&v| v < 0.0);
        let positive = self.values.iter().any(|&v| v > 0.0);
        !(negative && positive)
    }

    /// Whether every corner falls on the same side of the sign code
    ///
    /// Unlike [`is_empty`](Self::is_empty), zeros count as positive here, so
    /// a cell with only zero and negative corners is not uniform.
    pub fn is_uniform(&self) -> bool {
        matches!(self.sign_code(), 0 | 255)
    }

    /// 8-bit sign code, bit `v` set when corner `v` is `>= 0`
    pub fn sign_code(&self) -> u8 {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= 0.0)
            .fold(0u8, |code, (corner, _)| code | (1 << corner))
    }

    /// Whether corner `corner` is on the non-negative side
    #[inline]
    pub fn is_positive(&self, corner: usize) -> bool {
        self.values[corner] >= 0.0
    }

    /// Fraction along `edge` (from its lower corner) where the field crosses zero
    ///
    /// Only meaningful for edges whose corners straddle zero.
    #[inline]
    pub fn edge_root(&self, edge: usize) -> f32 {
        let [a, b] = EDGES[edge];
        let (fa, fb) = (self.values[a], self.values[b]);
        fa / (fa - fb)
    }
}

impl From<[f32; 8]> for CellView {
    fn from(values: [f32; 8]) -> Self {
        Self::new(values)
    }
}
