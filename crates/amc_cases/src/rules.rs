//! Topological classification rules
//!
//! Each rule recognises a corner-sign pattern and appends template triangles
//! to a [`CaseDraft`]. Rules run in a fixed order for every code; a later rule
//! never reuses an edge that an earlier one already anchored a patch on.
//!
//! Corner `v` is negative when bit `v` of the code is clear. Reference normals
//! always point into the negative region (see [`amc_core::reference_normal`]).

use amc_core::{
    Topology, CORNER_COUNT, EDGES, CORNER_EDGES,
    corner_neighbor, edge_axis, edge_between, reference_normal,
};
use amc_math::Vec3;

use crate::case::{CaseRules, CaseTriangle};

/// Working state while one code is classified
#[derive(Debug, Clone)]
pub(crate) struct CaseDraft {
    pub code: u8,
    pub triangles: Vec<CaseTriangle>,
    pub rules: CaseRules,
    /// Bitmask of edges used by triangles emitted so far
    claimed: u16,
}

impl CaseDraft {
    pub fn new(code: u8) -> Self {
        Self {
            code,
            triangles: Vec::new(),
            rules: CaseRules::empty(),
            claimed: 0,
        }
    }

    #[inline]
    pub fn is_negative(&self, corner: usize) -> bool {
        self.code & (1 << corner) == 0
    }

    #[inline]
    pub fn is_positive(&self, corner: usize) -> bool {
        !self.is_negative(corner)
    }

    /// Reference normal of a patch wrapped around `corner`
    #[inline]
    fn corner_normal(&self, corner: usize) -> Vec3 {
        if self.is_negative(corner) {
            reference_normal(corner)
        } else {
            reference_normal(7 - corner)
        }
    }

    /// Whether none of `edges` is used by an emitted triangle
    fn is_free(&self, edges: &[usize]) -> bool {
        edges.iter().all(|&e| self.claimed & (1 << e) == 0)
    }

    fn emit(&mut self, rule: CaseRules, edges: [usize; 3], normal: Vec3) {
        for &e in &edges {
            self.claimed |= 1 << e;
        }
        self.triangles.push(CaseTriangle::new(edges, normal));
        self.rules |= rule;
    }
}

#[inline]
fn bit(axis: usize) -> usize {
    1 << axis
}

/// Corners whose three neighbours all have the opposite sign
fn isolated_corners(draft: &CaseDraft) -> [bool; CORNER_COUNT] {
    let mut isolated = [false; CORNER_COUNT];
    for (v, iso) in isolated.iter_mut().enumerate() {
        *iso = (0..3).all(|axis| draft.is_positive(corner_neighbor(v, axis)) != draft.is_positive(v));
    }
    isolated
}

/// One triangle around every isolated corner
///
/// The polarity with more isolated corners goes first (positive on a tie),
/// and a corner next to one that already produced a triangle is skipped, so
/// two cut-off corners sharing an edge never overlap.
pub(crate) fn single_vertex(draft: &mut CaseDraft) {
    let isolated = isolated_corners(draft);
    let count = |positive: bool| {
        (0..CORNER_COUNT)
            .filter(|&v| isolated[v] && draft.is_positive(v) == positive)
            .count()
    };
    let order = if count(true) >= count(false) { [true, false] } else { [false, true] };

    let mut done = [false; CORNER_COUNT];
    for positive in order {
        for v in 0..CORNER_COUNT {
            if !isolated[v] || draft.is_positive(v) != positive {
                continue;
            }
            if (0..3).any(|axis| done[corner_neighbor(v, axis)]) {
                continue;
            }
            let normal = draft.corner_normal(v);
            draft.emit(CaseRules::SINGLE_VERTEX, CORNER_EDGES[v], normal);
            done[v] = true;
        }
    }
}

/// A quad wall along an edge whose endpoints both differ from all four of
/// their off-axis neighbours
pub(crate) fn edge_wall(draft: &mut CaseDraft) {
    for (e, &[v1, v2]) in EDGES.iter().enumerate() {
        if draft.is_positive(v1) != draft.is_positive(v2) {
            continue;
        }
        let axis = edge_axis(e);
        let a1 = (axis + 1) % 3;
        let a2 = (axis + 2) % 3;

        let walled = [a1, a2].iter().all(|&ax| {
            draft.is_positive(v1) != draft.is_positive(corner_neighbor(v1, ax))
                && draft.is_positive(v2) != draft.is_positive(corner_neighbor(v2, ax))
        });
        if !walled {
            continue;
        }

        let anchors = [
            CORNER_EDGES[v1][a1],
            CORNER_EDGES[v1][a2],
            CORNER_EDGES[v2][a2],
            CORNER_EDGES[v2][a1],
        ];
        if !draft.is_free(&anchors) {
            continue;
        }

        let normal = draft.corner_normal(v1);
        draft.emit(CaseRules::EDGE, [anchors[0], anchors[1], anchors[2]], normal);
        draft.emit(CaseRules::EDGE, [anchors[2], anchors[3], anchors[0]], normal);
    }
}

/// A flat quad across the cell when one side of an axis is entirely
/// negative and the other entirely positive
pub(crate) fn half_split(draft: &mut CaseDraft, topology: &Topology) {
    for axis in 0..3 {
        // low side negative / high side positive, and the reverse
        let mut low_negative = true;
        let mut low_positive = true;
        for v in 0..CORNER_COUNT {
            let high = v & bit(axis) != 0;
            if draft.is_negative(v) == high {
                low_negative = false;
            } else {
                low_positive = false;
            }
        }
        if !low_negative && !low_positive {
            continue;
        }

        let start = (0..EDGES.len())
            .find(|&e| edge_axis(e) == axis)
            .unwrap_or_default();
        let e1 = topology.edge_mirror(start, (axis + 1) % 3);
        let e2 = topology.edge_mirror(start, (axis + 2) % 3);
        let end = topology.edge_mirror(e2, (axis + 1) % 3);

        let normal = if low_negative { reference_normal(0) } else { reference_normal(7) };
        draft.emit(CaseRules::HALF_SPLIT, [start, e1, e2], normal);
        draft.emit(CaseRules::HALF_SPLIT, [e1, end, e2], normal);
    }
}

/// Three corners around a face corner, all opposite to their neighbours
/// across the face
///
/// Only the first matching `(corner, axis)` pair is used.
pub(crate) fn triple_vertex(draft: &mut CaseDraft) {
    for v in 0..CORNER_COUNT {
        for axis in 0..3 {
            let a1 = (axis + 1) % 3;
            let a2 = (axis + 2) % 3;
            let v1 = v ^ bit(a1);
            let v2 = v ^ bit(a2);
            let v12 = v1 ^ bit(a2);
            let va = v ^ bit(axis);
            let v1a = v1 ^ bit(axis);
            let v2a = v2 ^ bit(axis);

            let edges = [
                edge_between(v2, v2a),
                edge_between(v1, v1a),
                edge_between(v1, v12),
                edge_between(v2, v12),
                edge_between(v, va),
            ];
            if !draft.is_free(&edges) {
                continue;
            }

            let inner = [v, v1, v2];
            let outer = [va, v1a, v2a, v12];
            let all = |corners: &[usize], negative: bool| {
                corners.iter().all(|&c| draft.is_negative(c) == negative)
            };

            if all(&inner, true) && all(&outer, false) {
                let normal = reference_normal(v);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[0], edges[1], edges[2]], normal);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[2], edges[3], edges[0]], normal);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[0], edges[4], edges[1]], normal);
                return;
            }
            if all(&inner, false) && all(&outer, true) {
                let normal = reference_normal(7 - v);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[0], edges[2], edges[1]], normal);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[2], edges[0], edges[3]], normal);
                draft.emit(CaseRules::TRIPLE_VERTEX, [edges[0], edges[1], edges[4]], normal);
                return;
            }
        }
    }
}

/// A negative corner with its three neighbours, every other corner positive
pub(crate) fn four_vertex(draft: &mut CaseDraft) {
    for v in 0..CORNER_COUNT {
        let v1 = v ^ 1;
        let v2 = v ^ 2;
        let v3 = v ^ 4;
        let v12 = v1 ^ 2;
        let v13 = v1 ^ 4;
        let v23 = v2 ^ 4;
        let v123 = v12 ^ 4;

        let inside = [v, v1, v2, v3].iter().all(|&c| draft.is_negative(c));
        let outside = [v12, v13, v23, v123].iter().all(|&c| draft.is_positive(c));
        if !(inside && outside) {
            continue;
        }

        let normal = reference_normal(v);
        let e1_13 = edge_between(v1, v13);
        let e1_12 = edge_between(v1, v12);
        let e2_12 = edge_between(v2, v12);
        let e3_13 = edge_between(v3, v13);
        let e2_23 = edge_between(v2, v23);
        let e3_23 = edge_between(v3, v23);
        draft.emit(CaseRules::FOUR_VERTEX, [e1_13, e1_12, e2_12], normal);
        draft.emit(CaseRules::FOUR_VERTEX, [e3_13, e1_13, e2_12], normal);
        draft.emit(CaseRules::FOUR_VERTEX, [e3_13, e2_12, e2_23], normal);
        draft.emit(CaseRules::FOUR_VERTEX, [e3_13, e2_23, e3_23], normal);
    }
}

/// Negative corners forming a path `v -> a -> b -> c` that steps once along
/// each axis
///
/// Only the first matching path is used.
pub(crate) fn snake(draft: &mut CaseDraft) {
    for v in 0..CORNER_COUNT {
        for ax1 in 0..3 {
            for step in 1..3 {
                let ax2 = (ax1 + step) % 3;
                let ax3 = 3 - ax1 - ax2;
                let a = v ^ bit(ax1);
                let b = a ^ bit(ax2);
                let c = b ^ bit(ax3);
                let path = [v, a, b, c];

                let matches = (0..CORNER_COUNT).all(|i| path.contains(&i) == draft.is_negative(i));
                if !matches {
                    continue;
                }

                let v2 = v ^ bit(ax2);
                let v3 = v ^ bit(ax3);
                let v13 = a ^ bit(ax3);
                let v23 = v2 ^ bit(ax3);

                let normal = reference_normal(a);
                let hub = edge_between(c, v23);
                draft.emit(CaseRules::SNAKE, [edge_between(v, v3), edge_between(a, v13), hub], normal);
                draft.emit(CaseRules::SNAKE, [edge_between(v, v2), edge_between(v, v3), hub], normal);
                draft.emit(CaseRules::SNAKE, [edge_between(v2, b), edge_between(v, v2), hub], normal);
                draft.emit(CaseRules::SNAKE, [edge_between(a, v13), edge_between(v13, c), hub], normal);
                return;
            }
        }
    }
}
