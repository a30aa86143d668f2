//! Case table construction
//!
//! For every sign code the builder runs the classification rules in order,
//! fixes triangle winding against the rule's reference normal, then decides
//! which cell faces need a cap quad. The result is validated before it is
//! handed out; a failed check means a rule defect, never bad input.

use amc_core::{
    Topology, EDGES, EDGE_COUNT, PLANE_COUNT,
    edge_midpoint, reference_normal, plane_index,
};
use amc_math::triangle_normal;

use crate::case::{CapSign, CaseEntry, CaseTriangle};
use crate::error::CaseTableError;
use crate::rules::{self, CaseDraft};
use crate::table::CaseTable;

/// Builds the 256-entry case table
///
/// # Example
/// ```ignore
/// let table = CaseTableBuilder::new()?.build()?;
/// assert_eq!(table.get(1).triangle_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CaseTableBuilder {
    topology: Topology,
}

impl CaseTableBuilder {
    /// Derive the cube topology and prepare a builder
    pub fn new() -> Result<Self, CaseTableError> {
        Ok(Self::with_topology(Topology::new()?))
    }

    /// Use an already derived topology
    pub fn with_topology(topology: Topology) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Classify every code and validate the result
    pub fn build(&self) -> Result<CaseTable, CaseTableError> {
        let entries = (0..=255u8)
            .map(|code| self.build_case(code))
            .collect::<Result<Vec<_>, _>>()?;
        let table = CaseTable::from_entries(self.topology, entries)?;

        log::info!(
            "Built case table: {} triangles over 256 cases, {} cases with caps, at most {} per case",
            table.total_triangles(),
            table.capped_case_count(),
            table.max_triangles_per_case()
        );
        Ok(table)
    }

    /// Classify a single code
    pub fn build_case(&self, code: u8) -> Result<CaseEntry, CaseTableError> {
        if code == 0 || code == 255 {
            return Ok(CaseEntry::empty(code));
        }

        let mut draft = CaseDraft::new(code);
        rules::single_vertex(&mut draft);
        rules::edge_wall(&mut draft);
        rules::half_split(&mut draft, &self.topology);
        rules::triple_vertex(&mut draft);
        rules::four_vertex(&mut draft);
        rules::snake(&mut draft);

        fix_winding(&mut draft.triangles);
        let caps = self.select_caps(&draft)?;

        log::trace!(
            "case {:3}: {} triangles, rules {:?}, caps {:?}",
            code,
            draft.triangles.len(),
            draft.rules,
            caps.map(CapSign::as_i8)
        );

        Ok(CaseEntry {
            code,
            triangles: draft.triangles,
            caps,
            rules: draft.rules,
        })
    }

    /// Pick the cap sign of every face crossed on all four edges
    ///
    /// Such a face has alternating corner signs, so two triangle segments
    /// lie in it. The first segment cuts off one face corner; the cap is
    /// oriented along that corner's reference normal, measured against the
    /// face's outward direction and flipped for negative-side faces so that
    /// both cells sharing the face record the same sign.
    fn select_caps(&self, draft: &CaseDraft) -> Result<[CapSign; PLANE_COUNT], CaseTableError> {
        let mut caps = [CapSign::None; PLANE_COUNT];

        for axis in 0..3 {
            for side in 0..2 {
                let index = plane_index(axis, side);
                let plane = self.topology.plane(index);

                let segments: Vec<(usize, usize)> = draft
                    .triangles
                    .iter()
                    .flat_map(|t| (0..3).map(move |k| (t.edges[k], t.edges[(k + 1) % 3])))
                    .filter(|&(a, b)| plane.contains_edge(a) && plane.contains_edge(b))
                    .collect();
                if segments.len() != 2 {
                    continue;
                }
                let covered = segments
                    .iter()
                    .fold(0u16, |mask, &(a, b)| mask | (1 << a) | (1 << b));
                let plane_mask = plane.edges.iter().fold(0u16, |mask, &e| mask | (1 << e));
                if covered != plane_mask {
                    continue;
                }

                let (a, b) = segments[0];
                let corner = EDGES[a]
                    .iter()
                    .copied()
                    .find(|c| EDGES[b].contains(c))
                    .ok_or(CaseTableError::CapWithoutCorner { code: draft.code, plane: index })?;

                let normal = if draft.is_negative(corner) {
                    reference_normal(corner)
                } else {
                    reference_normal(7 - corner)
                };
                let along = if normal.dot(plane.outward) > 0.0 { 1 } else { -1 };
                let sign = if side == 0 { -along } else { along };
                caps[index] = CapSign::from_i8(sign);
            }
        }

        Ok(caps)
    }
}

/// Midpoint normal of a template triangle
pub fn template_normal(triangle: &CaseTriangle) -> amc_math::Vec3 {
    let [a, b, c] = triangle.edges;
    triangle_normal(edge_midpoint(a), edge_midpoint(b), edge_midpoint(c))
}

/// Swap the last two edges of every triangle facing away from its reference
fn fix_winding(triangles: &mut [CaseTriangle]) {
    for triangle in triangles.iter_mut() {
        if template_normal(triangle).dot(triangle.normal) < 0.0 {
            triangle.edges.swap(1, 2);
        }
    }
}

/// Check one entry against the invariants every case must satisfy
pub(crate) fn validate_entry(topology: &Topology, entry: &CaseEntry) -> Result<(), CaseTableError> {
    let code = entry.code;
    if code == 0 || code == 255 {
        if !entry.is_empty() || entry.has_caps() {
            return Err(CaseTableError::UnexpectedGeometry(code));
        }
        return Ok(());
    }
    if entry.is_empty() {
        return Err(CaseTableError::Unclassified(code));
    }

    for (i, triangle) in entry.triangles.iter().enumerate() {
        if triangle.edges.iter().any(|&e| e >= EDGE_COUNT) {
            return Err(CaseTableError::EdgeOutOfRange { code, triangle: i });
        }
        if template_normal(triangle).dot(triangle.normal) < 0.0 {
            return Err(CaseTableError::WindingMismatch { code, triangle: i });
        }
    }

    let used = entry.edge_mask();
    for (edge, &[a, b]) in EDGES.iter().enumerate() {
        let crossed = ((code >> a) & 1) != ((code >> b) & 1);
        let is_used = used & (1 << edge) != 0;
        if crossed != is_used {
            return Err(CaseTableError::EdgeMismatch { code, edge });
        }
    }

    // cap emission resolves all four face edges, so they must all be crossed
    for (plane, sign) in entry.caps.iter().enumerate() {
        if sign.is_cap() != topology.plane(plane).alternates(code) {
            return Err(CaseTableError::CapMismatch { code, plane });
        }
    }

    Ok(())
}
