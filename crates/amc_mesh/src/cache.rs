//! Vertex Cache
//!
//! Gives every distinct edge crossing a single vertex index within one sweep.
//! Neighbouring cells address a shared edge by different `(cell, edge)`
//! pairs; both are canonicalised to the same key before lookup:
//!
//! - for each axis in turn, if the edge's mirror across that axis has a
//!   smaller id, step the cell one unit along the axis and use the mirror.
//!
//! After canonicalisation only edges 0, 1 and 2 (the three edges at corner 0)
//! remain, so each cell owns at most three slots. The canonical cell can be
//! one past the last cell of the field, which the power-of-two slot layout
//! covers.

use amc_core::{CellView, Topology, EDGES, PLANE_COUNT, corner_position};
use amc_math::Vec3;

use crate::types::MeshVertex;

/// Slots reserved per cell (three canonical edges, rounded up)
pub const EDGE_SLOTS: usize = 4;

/// Cache key of a cell face, shared by the two cells on either side of it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneKey(pub usize);

/// Edge-to-vertex index map for one sweep
#[derive(Debug, Clone)]
pub struct VertexCache {
    topology: Topology,
    /// Field size the cache was laid out for
    field_size: [usize; 3],
    /// log2 of the padded extent along each axis
    bits: [u32; 3],
    slots: Vec<Option<u32>>,
    /// Number of cache hits per allocated vertex
    usage: Vec<u32>,
}

impl VertexCache {
    /// Lay out a cache for a field of `field_size` samples
    pub fn new(topology: Topology, field_size: [usize; 3]) -> Self {
        let bits = field_size.map(|s| s.max(1).next_power_of_two().trailing_zeros());
        let cells = 1usize << (bits[0] + bits[1] + bits[2]);
        log::debug!(
            "Vertex cache for {:?} samples: {} slots",
            field_size,
            cells * EDGE_SLOTS
        );
        Self {
            topology,
            field_size,
            bits,
            slots: vec![None; cells * EDGE_SLOTS],
            usage: Vec::new(),
        }
    }

    /// Make the cache ready for a new sweep over a field of `field_size`
    ///
    /// Reallocates when the size changed, otherwise just clears.
    pub fn prepare(&mut self, field_size: [usize; 3]) {
        if field_size != self.field_size {
            *self = Self::new(self.topology, field_size);
        } else {
            self.reset();
        }
    }

    /// Forget every allocated vertex
    pub fn reset(&mut self) {
        self.slots.fill(None);
        self.usage.clear();
    }

    pub fn field_size(&self) -> [usize; 3] {
        self.field_size
    }

    /// Total slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of vertices allocated since the last reset
    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// How many times an existing vertex was looked up again
    pub fn vertex_usage(&self, index: u32) -> Option<u32> {
        self.usage.get(index as usize).copied()
    }

    /// Canonical `(cell, edge)` for an edge crossing
    pub fn canonical_edge(&self, cell: [usize; 3], edge: usize) -> ([usize; 3], usize) {
        let mut cell = cell;
        let mut edge = edge;
        for axis in 0..3 {
            let mirror = self.topology.edge_mirror(edge, axis);
            if mirror < edge {
                cell[axis] += 1;
                edge = mirror;
            }
        }
        (cell, edge)
    }

    /// Key of a cell face, expressed on the cell at its negative side
    pub fn plane_key(&self, cell: [usize; 3], plane: usize) -> PlaneKey {
        let mut cell = cell;
        let mut plane = plane;
        if plane % 2 == 1 {
            cell[plane / 2] += 1;
            plane -= 1;
        }
        PlaneKey(self.cell_index(cell) * PLANE_COUNT + plane)
    }

    #[inline]
    fn cell_index(&self, cell: [usize; 3]) -> usize {
        let [bx, by, _] = self.bits;
        cell[0] | (cell[1] << bx) | (cell[2] << (bx + by))
    }

    /// Index of the vertex where the surface crosses `edge` of `cell`
    ///
    /// On a miss the crossing is interpolated from this cell's corner values
    /// and appended to `vertices`.
    pub fn resolve_edge_vertex(
        &mut self,
        cell: [usize; 3],
        edge: usize,
        view: &CellView,
        vertices: &mut Vec<MeshVertex>,
    ) -> u32 {
        let (canonical, canonical_edge) = self.canonical_edge(cell, edge);
        let slot = self.cell_index(canonical) * EDGE_SLOTS + canonical_edge;

        if let Some(index) = self.slots[slot] {
            self.usage[index as usize] += 1;
            return index;
        }

        let [a, b] = EDGES[edge];
        let origin = Vec3::new(cell[0] as f32, cell[1] as f32, cell[2] as f32);
        let position = origin + corner_position(a).lerp(corner_position(b), view.edge_root(edge));

        let index = vertices.len() as u32;
        vertices.push(MeshVertex::at(position));
        self.usage.push(0);
        self.slots[slot] = Some(index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(size: [usize; 3]) -> VertexCache {
        VertexCache::new(Topology::new().unwrap(), size)
    }

    fn view_crossing_everywhere() -> CellView {
        // checkerboard: every edge crossed
        let mut values = [0.0; 8];
        for (v, value) in values.iter_mut().enumerate() {
            *value = if (v.count_ones() % 2) == 0 { -1.0 } else { 1.0 };
        }
        CellView::new(values)
    }

    #[test]
    fn test_sizes_round_up_to_powers_of_two() {
        let c = cache([5, 3, 8]);
        assert_eq!(c.capacity(), 8 * 4 * 8 * EDGE_SLOTS);
    }

    #[test]
    fn test_canonical_edges_are_corner_zero_edges() {
        let c = cache([4, 4, 4]);
        for edge in 0..12 {
            let (_, canonical) = c.canonical_edge([1, 1, 1], edge);
            assert!(canonical < 3, "edge {} canonicalised to {}", edge, canonical);
        }
        assert_eq!(c.canonical_edge([1, 1, 1], 11), ([1, 2, 2], 0));
        assert_eq!(c.canonical_edge([1, 1, 1], 7), ([2, 2, 1], 2));
        assert_eq!(c.canonical_edge([1, 1, 1], 0), ([1, 1, 1], 0));
    }

    #[test]
    fn test_shared_edge_resolves_once() {
        let mut c = cache([3, 2, 2]);
        let view = view_crossing_everywhere();
        let mut verts = Vec::new();

        // edge 3 (corners 1-3) of cell 0 is edge 1 (corners 0-2) of cell 1
        let a = c.resolve_edge_vertex([0, 0, 0], 3, &view, &mut verts);
        let b = c.resolve_edge_vertex([1, 0, 0], 1, &view, &mut verts);
        assert_eq!(a, b);
        assert_eq!(verts.len(), 1);
        assert_eq!(c.vertex_usage(a), Some(1));

        let again = c.resolve_edge_vertex([0, 0, 0], 3, &view, &mut verts);
        assert_eq!(again, a);
        assert_eq!(c.vertex_usage(a), Some(2));
    }

    #[test]
    fn test_interpolated_position() {
        let mut c = cache([3, 3, 3]);
        let mut values = [-1.0; 8];
        values[1] = 3.0;
        let view = CellView::new(values);
        let mut verts = Vec::new();
        let i = c.resolve_edge_vertex([1, 2, 0], 0, &view, &mut verts);
        assert_eq!(verts[i as usize].position, [1.25, 2.0, 0.0]);
        assert_eq!(verts[i as usize].normal, [0.0; 3]);
    }

    #[test]
    fn test_canonical_cell_past_the_field() {
        // the far edge of the last cell lives in a cell outside the field
        let mut c = cache([2, 2, 2]);
        let view = view_crossing_everywhere();
        let mut verts = Vec::new();
        for edge in 0..12 {
            c.resolve_edge_vertex([0, 0, 0], edge, &view, &mut verts);
        }
        assert_eq!(verts.len(), 12);
        assert_eq!(c.len(), 12);
    }

    #[test]
    fn test_plane_keys_match_across_faces() {
        let c = cache([4, 4, 4]);
        for axis in 0..3 {
            let mut next = [1, 1, 1];
            next[axis] += 1;
            assert_eq!(
                c.plane_key([1, 1, 1], axis * 2 + 1),
                c.plane_key(next, axis * 2),
                "axis {}",
                axis
            );
        }
        assert_ne!(c.plane_key([1, 1, 1], 0), c.plane_key([1, 1, 1], 2));
    }

    #[test]
    fn test_reset_and_prepare() {
        let mut c = cache([3, 3, 3]);
        let view = view_crossing_everywhere();
        let mut verts = Vec::new();
        c.resolve_edge_vertex([0, 0, 0], 0, &view, &mut verts);
        assert_eq!(c.len(), 1);

        c.prepare([3, 3, 3]);
        assert!(c.is_empty());
        verts.clear();
        assert_eq!(c.resolve_edge_vertex([0, 0, 0], 0, &view, &mut verts), 0);

        c.prepare([9, 2, 2]);
        assert_eq!(c.field_size(), [9, 2, 2]);
        assert_eq!(c.capacity(), 16 * 2 * 2 * EDGE_SLOTS);
        assert!(c.is_empty());
    }
}
