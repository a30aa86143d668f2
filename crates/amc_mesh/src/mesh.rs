//! Indexed triangle mesh produced by a sweep

use std::collections::{HashMap, HashSet};

use crate::types::{IndexedTriangle, MeshVertex};

/// Counters gathered while sweeping a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Cells examined
    pub cells_visited: usize,
    /// Cells whose sign code is neither 0 nor 255
    pub live_cells: usize,
    /// Live cells dropped because the output was full
    pub cells_skipped: usize,
    /// Cap quads emitted on shared faces
    pub caps_emitted: usize,
    /// Cap requests whose neighbour asked for the opposite sign
    pub caps_mismatched: usize,
    /// Cap requests still waiting for a neighbour when the sweep ended
    pub caps_unmatched: usize,
}

/// Vertex and index arrays of one extracted isosurface
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub triangles: Vec<IndexedTriangle>,
    /// Set when live cells were skipped for lack of capacity
    pub truncated: bool,
    pub summary: SweepSummary,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex array as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index array as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Flat index list, three per triangle
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Number of triangles using each undirected edge
    pub fn edge_incidence(&self) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for triangle in &self.triangles {
            for (a, b) in triangle.half_edges() {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Edges used by exactly one triangle
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_incidence().values().filter(|&&n| n == 1).count()
    }

    /// Every edge is shared by exactly two triangles
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_incidence().values().all(|&n| n == 2)
    }

    /// No directed edge is used twice, so neighbouring triangles agree on winding
    pub fn is_consistently_oriented(&self) -> bool {
        let mut seen = HashSet::new();
        for triangle in &self.triangles {
            for half_edge in triangle.half_edges() {
                if !seen.insert(half_edge) {
                    return false;
                }
            }
        }
        true
    }

    /// `V - E + F`
    pub fn euler_characteristic(&self) -> i64 {
        let edges = self.edge_incidence().len() as i64;
        self.vertices.len() as i64 - edges + self.triangles.len() as i64
    }
}
