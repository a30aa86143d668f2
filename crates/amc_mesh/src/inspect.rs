//! Single-cell triangulation for debugging and visualisation

use amc_cases::CaseTable;
use amc_core::{CellView, EDGES, corner_position};
use amc_math::{Vec3, triangle_normal};

use crate::types::DebugTriangle;

/// Upper bound on the triangles [`triangulate_cell`] returns
pub const MAX_DEBUG_TRIANGLES: usize = 8;

/// Triangulate one cube of corner values in cell-local coordinates
///
/// Returns nothing for a cell the surface misses. Each triangle carries its
/// own face normal at all three corners.
pub fn triangulate_cell(table: &CaseTable, corners: [f32; 8]) -> Vec<DebugTriangle> {
    let view = CellView::new(corners);
    if view.is_empty() {
        return Vec::new();
    }

    table
        .get(view.sign_code())
        .triangles
        .iter()
        .take(MAX_DEBUG_TRIANGLES)
        .map(|triangle| {
            let points = triangle.edges.map(|edge| {
                let [a, b] = EDGES[edge];
                corner_position(a).lerp(corner_position(b), view.edge_root(edge))
            });
            let normal = triangle_normal(points[0], points[1], points[2])
                .try_normalized(1e-12)
                .unwrap_or(Vec3::ZERO)
                .to_array();
            DebugTriangle {
                positions: points.map(Vec3::to_array),
                normals: [normal; 3],
            }
        })
        .collect()
}
