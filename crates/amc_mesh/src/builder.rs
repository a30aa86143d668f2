//! Field sweep: walks every cell and stitches the case templates into one
//! indexed mesh
//!
//! Cells are visited x-outermost, z-innermost. Shared edge crossings resolve
//! through the [`VertexCache`], so adjacent cells reuse vertices and the
//! result is watertight across cell faces. Faces whose four corners
//! alternate in sign are closed with a cap quad once both neighbours agree
//! on its orientation.

use std::collections::HashMap;

use amc_cases::{CapSign, CaseTable};
use amc_core::{CellView, ScalarField, PLANE_CYCLE};
use amc_math::triangle_normal;

use crate::cache::{PlaneKey, VertexCache};
use crate::inspect::triangulate_cell;
use crate::mesh::Mesh;
use crate::stats::UsageStats;
use crate::types::{DebugTriangle, IndexedTriangle};

/// Most triangles a single cell can add: four from its case, two per cap on
/// each of the three faces it closes
pub const MAX_CELL_TRIANGLES: usize = 10;

/// Most vertices a single cell can add: one per edge
pub const MAX_CELL_VERTICES: usize = 12;

/// Squared length below which a normal is treated as undefined
const NORMAL_EPSILON: f32 = 1e-12;

/// Output limits for one sweep
///
/// A live cell is only processed if the mesh can take its worst case, so the
/// limits are never exceeded. Skipped cells mark the mesh as truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshCapacity {
    pub max_vertices: usize,
    pub max_triangles: usize,
}

impl MeshCapacity {
    pub fn new(max_vertices: usize, max_triangles: usize) -> Self {
        Self { max_vertices, max_triangles }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    fn admits_cell(&self, vertices: usize, triangles: usize) -> bool {
        vertices.saturating_add(MAX_CELL_VERTICES) <= self.max_vertices
            && triangles.saturating_add(MAX_CELL_TRIANGLES) <= self.max_triangles
    }
}

impl Default for MeshCapacity {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// The triangles one cell contributes, in lattice coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct CellInspection {
    pub cell: [usize; 3],
    pub code: u8,
    pub triangles: Vec<DebugTriangle>,
}

/// Extracts meshes from scalar fields using a prebuilt case table
///
/// The vertex cache and pending cap requests are kept between sweeps and
/// reset at the start of each one.
pub struct MeshBuilder<'t> {
    table: &'t CaseTable,
    cache: VertexCache,
    pending_caps: HashMap<PlaneKey, CapSign>,
}

impl<'t> MeshBuilder<'t> {
    pub fn new(table: &'t CaseTable) -> Self {
        Self {
            table,
            cache: VertexCache::new(*table.topology(), [0, 0, 0]),
            pending_caps: HashMap::new(),
        }
    }

    pub fn table(&self) -> &'t CaseTable {
        self.table
    }

    /// Sweep the whole field
    pub fn build<F: ScalarField + ?Sized>(&mut self, field: &F, capacity: MeshCapacity) -> Mesh {
        self.sweep(field, capacity, None)
    }

    /// Sweep the whole field, counting the case of every live cell
    pub fn build_with_stats<F: ScalarField + ?Sized>(
        &mut self,
        field: &F,
        capacity: MeshCapacity,
        stats: &mut UsageStats,
    ) -> Mesh {
        self.sweep(field, capacity, Some(stats))
    }

    /// Triangles of a single cell, or `None` if the cell is outside the field
    pub fn inspect_cell<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        cell: [usize; 3],
    ) -> Option<CellInspection> {
        let counts = field.cell_counts();
        if (0..3).any(|axis| cell[axis] >= counts[axis]) {
            return None;
        }

        let corners = field.cube(cell[0], cell[1], cell[2]);
        let origin = [cell[0] as f32, cell[1] as f32, cell[2] as f32];
        let triangles = triangulate_cell(self.table, corners)
            .into_iter()
            .map(|mut t| {
                for position in &mut t.positions {
                    for axis in 0..3 {
                        position[axis] += origin[axis];
                    }
                }
                t
            })
            .collect();

        Some(CellInspection {
            cell,
            code: CellView::new(corners).sign_code(),
            triangles,
        })
    }

    fn sweep<F: ScalarField + ?Sized>(
        &mut self,
        field: &F,
        capacity: MeshCapacity,
        mut stats: Option<&mut UsageStats>,
    ) -> Mesh {
        self.cache.prepare(field.size());
        self.pending_caps.clear();

        let mut mesh = Mesh::default();
        let [cx, cy, cz] = field.cell_counts();

        for x in 0..cx {
            for y in 0..cy {
                for z in 0..cz {
                    mesh.summary.cells_visited += 1;

                    // zeros count as positive, so a cell touching the surface at a
                    // sample must still emit its case to match its neighbours
                    let view = CellView::new(field.cube(x, y, z));
                    if view.is_uniform() {
                        continue;
                    }
                    mesh.summary.live_cells += 1;

                    let code = view.sign_code();
                    if let Some(stats) = stats.as_deref_mut() {
                        stats.record(code);
                    }

                    if !capacity.admits_cell(mesh.vertices.len(), mesh.triangles.len()) {
                        mesh.summary.cells_skipped += 1;
                        mesh.truncated = true;
                        continue;
                    }

                    self.emit_cell([x, y, z], code, &view, &mut mesh);
                }
            }
        }

        mesh.summary.caps_unmatched = self.pending_caps.len();
        self.pending_caps.clear();

        for vertex in &mut mesh.vertices {
            if let Some(n) = vertex.normal().try_normalized(NORMAL_EPSILON) {
                vertex.normal = n.to_array();
            }
        }

        log::debug!(
            "Swept {} cells ({} live): {} vertices, {} triangles, {} caps",
            mesh.summary.cells_visited,
            mesh.summary.live_cells,
            mesh.vertices.len(),
            mesh.triangles.len(),
            mesh.summary.caps_emitted
        );
        if mesh.summary.caps_mismatched > 0 || mesh.summary.caps_unmatched > 0 {
            log::debug!(
                "Cap requests dropped: {} mismatched, {} without a neighbour",
                mesh.summary.caps_mismatched,
                mesh.summary.caps_unmatched
            );
        }
        if mesh.truncated {
            log::warn!(
                "Mesh truncated: skipped {} live cells (limits {} vertices, {} triangles)",
                mesh.summary.cells_skipped,
                capacity.max_vertices,
                capacity.max_triangles
            );
        }

        mesh
    }

    fn emit_cell(&mut self, cell: [usize; 3], code: u8, view: &CellView, mesh: &mut Mesh) {
        let table = self.table;
        let entry = table.get(code);

        for triangle in &entry.triangles {
            let indices = triangle
                .edges
                .map(|edge| self.cache.resolve_edge_vertex(cell, edge, view, &mut mesh.vertices));
            push_triangle(mesh, indices);
        }

        for (plane, &sign) in entry.caps.iter().enumerate() {
            if !sign.is_cap() {
                continue;
            }
            let key = self.cache.plane_key(cell, plane);
            match self.pending_caps.remove(&key) {
                Some(other) if other == sign => {
                    self.emit_cap(cell, plane, sign, view, mesh);
                    mesh.summary.caps_emitted += 1;
                }
                Some(_) => mesh.summary.caps_mismatched += 1,
                None => {
                    self.pending_caps.insert(key, sign);
                }
            }
        }
    }

    /// Close a shared face with two triangles over its four edge crossings
    fn emit_cap(&mut self, cell: [usize; 3], plane: usize, sign: CapSign, view: &CellView, mesh: &mut Mesh) {
        let edges = self.table.topology().plane(plane).edges;
        let resolved =
            edges.map(|edge| self.cache.resolve_edge_vertex(cell, edge, view, &mut mesh.vertices));
        let [q0, q1, q2, q3] = PLANE_CYCLE.map(|i| resolved[i]);

        if sign == CapSign::Negative {
            push_triangle(mesh, [q0, q1, q3]);
            push_triangle(mesh, [q1, q2, q3]);
        } else {
            push_triangle(mesh, [q0, q3, q1]);
            push_triangle(mesh, [q1, q3, q2]);
        }
    }
}

/// Append a triangle and add its face normal to its vertices
fn push_triangle(mesh: &mut Mesh, indices: [u32; 3]) {
    let [a, b, c] = indices.map(|i| mesh.vertices[i as usize].position());
    if let Some(normal) = triangle_normal(a, b, c).try_normalized(NORMAL_EPSILON) {
        for i in indices {
            let vertex = &mut mesh.vertices[i as usize];
            vertex.normal = (vertex.normal() + normal).to_array();
        }
    }
    mesh.triangles.push(IndexedTriangle { indices });
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_core::VoxelField;
    use amc_math::Vec3;

    fn sphere(n: usize, center: f32, radius: f32) -> VoxelField {
        VoxelField::from_fn([n, n, n], |x, y, z| {
            radius - (Vec3::new(x as f32, y as f32, z as f32) - Vec3::splat(center)).length()
        })
        .unwrap()
    }

    #[test]
    fn test_uniform_fields_are_empty() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        for value in [-1.0, 1.0, 0.0] {
            let field = VoxelField::filled([4, 4, 4], value).unwrap();
            let mesh = builder.build(&field, MeshCapacity::unbounded());
            assert!(mesh.is_empty());
            assert_eq!(mesh.vertex_count(), 0);
            assert_eq!(mesh.summary.cells_visited, 27);
            assert_eq!(mesh.summary.live_cells, 0);
        }
    }

    #[test]
    fn test_sphere_counts() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let mesh = builder.build(&sphere(10, 4.5, 3.0), MeshCapacity::unbounded());
        assert_eq!(mesh.vertex_count(), 192);
        assert_eq!(mesh.triangle_count(), 380);
        assert!(mesh.is_closed());
        assert!(mesh.is_consistently_oriented());
        assert!(!mesh.truncated);
    }

    #[test]
    fn test_surface_through_samples_stays_closed() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        // integer radius around a lattice point puts exact zeros on the surface
        let field = sphere(11, 5.0, 3.0);
        assert!(field.values().contains(&0.0));

        let mesh = builder.build(&field, MeshCapacity::unbounded());
        assert_eq!(mesh.vertex_count(), 174);
        assert_eq!(mesh.triangle_count(), 344);
        assert_eq!(mesh.boundary_edge_count(), 0);
        assert!(mesh.is_closed());
        assert!(mesh.is_consistently_oriented());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let field = sphere(8, 3.5, 2.5);
        let first = builder.build(&field, MeshCapacity::unbounded());
        let second = builder.build(&field, MeshCapacity::unbounded());
        assert_eq!(first, second);
        assert_eq!(first.vertex_count(), 96);
        assert_eq!(first.triangle_count(), 188);
    }

    #[test]
    fn test_cache_follows_field_size() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let small = builder.build(&sphere(8, 3.5, 2.5), MeshCapacity::unbounded());
        let large = builder.build(&sphere(10, 4.5, 3.0), MeshCapacity::unbounded());
        assert_eq!(small.triangle_count(), 188);
        assert_eq!(large.triangle_count(), 380);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let capacity = MeshCapacity::new(1000, 100);
        let mesh = builder.build(&sphere(10, 4.5, 3.0), capacity);
        assert!(mesh.truncated);
        assert!(mesh.triangle_count() <= 100);
        assert!(mesh.triangle_count() > 100 - MAX_CELL_TRIANGLES);
        assert!(mesh.summary.cells_skipped > 0);
    }

    #[test]
    fn test_normals_are_unit_and_point_outward() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let mesh = builder.build(&sphere(10, 4.5, 3.0), MeshCapacity::unbounded());
        for vertex in &mesh.vertices {
            let n = vertex.normal();
            assert!((n.length() - 1.0).abs() < 1e-4);
            let radial = vertex.position() - Vec3::splat(4.5);
            assert!(n.dot(radial) > 0.0);
        }
    }

    #[test]
    fn test_stats_count_live_cells() {
        let table = CaseTable::build().unwrap();
        let mut builder = MeshBuilder::new(&table);
        let mut stats = UsageStats::new();
        let mesh = builder.build_with_stats(&sphere(8, 3.5, 2.5), MeshCapacity::unbounded(), &mut stats);
        assert_eq!(stats.total() as usize, mesh.summary.live_cells);
        assert_eq!(stats.get(0), 0);
        assert_eq!(stats.get(255), 0);
    }

    #[test]
    fn test_inspect_cell() {
        let table = CaseTable::build().unwrap();
        let builder = MeshBuilder::new(&table);
        let mut field = VoxelField::filled([3, 3, 3], -1.0).unwrap();
        field.set(1, 1, 1, 1.0).unwrap();

        let inspection = builder.inspect_cell(&field, [1, 1, 1]).unwrap();
        assert_eq!(inspection.code, 1);
        assert_eq!(inspection.triangles.len(), 1);
        assert_eq!(inspection.triangles[0].positions[0], [1.5, 1.0, 1.0]);

        assert!(builder.inspect_cell(&field, [2, 0, 0]).is_none());
    }
}
