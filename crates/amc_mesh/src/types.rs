//! Buffer-ready geometry types
//!
//! Layouts are fixed (`repr(C)`, Pod) so the vertex and index arrays can be
//! handed to a renderer or a file writer as raw bytes.

use bytemuck::{Pod, Zeroable};

use amc_math::Vec3;

/// An isosurface vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in lattice coordinates
    pub position: [f32; 3],
    /// Unit normal pointing into the negative region (zero if undefined)
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex at `position` with a zeroed normal accumulator
    pub fn at(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: [0.0; 3],
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Three indices into the vertex array, counter-clockwise seen from the
/// side the vertex normals point to
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct IndexedTriangle {
    pub indices: [u32; 3],
}

impl IndexedTriangle {
    #[inline]
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }

    /// The three directed edges `(a, b)`, `(b, c)`, `(c, a)`
    pub fn half_edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

/// A self-contained triangle from single-cell inspection
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DebugTriangle {
    pub positions: [[f32; 3]; 3],
    /// Face normal repeated per corner
    pub normals: [[f32; 3]; 3],
}
