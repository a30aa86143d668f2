//! Unit cube topology
//!
//! Corners, edges and faces ("planes") of a lattice cell, plus the symmetry
//! lookups used by the case table builder and the vertex cache.
//!
//! Corner `v` sits at `(v & 1, (v >> 1) & 1, (v >> 2) & 1)`. Edges connect
//! corners differing in exactly one bit and are numbered by enumerating the
//! pairs `v1 < v2` in lexical order:
//!
//! ```text
//! e0 (0,1)  e1 (0,2)  e2 (0,4)  e3 (1,3)  e4 (1,5)  e5 (2,3)
//! e6 (2,6)  e7 (3,7)  e8 (4,5)  e9 (4,6)  e10 (5,7) e11 (6,7)
//! ```
//!
//! Planes are numbered `axis * 2 + side`, side 1 being the positive side of
//! the axis.

use amc_math::{Vec3, triangle_normal};

/// Number of cube corners
pub const CORNER_COUNT: usize = 8;
/// Number of cube edges
pub const EDGE_COUNT: usize = 12;
/// Number of cube faces
pub const PLANE_COUNT: usize = 6;

/// Edge endpoints, lower corner first
pub const EDGES: [[usize; 2]; EDGE_COUNT] = compute_edges();

/// `CORNER_EDGES[corner][axis]`: the edge leaving `corner` along `axis`
pub const CORNER_EDGES: [[usize; 3]; CORNER_COUNT] = compute_corner_edges();

/// Order in which a plane's four edges are visited around its boundary
pub const PLANE_CYCLE: [usize; 4] = [0, 1, 3, 2];

/// Enumerate corner pairs differing in a single bit at compile time
const fn compute_edges() -> [[usize; 2]; EDGE_COUNT] {
    let mut edges = [[0usize; 2]; EDGE_COUNT];
    let mut count = 0;
    let mut v1 = 0;

    while v1 < CORNER_COUNT - 1 {
        let mut v2 = v1 + 1;
        while v2 < CORNER_COUNT {
            let diff = v1 ^ v2;
            if diff == 1 || diff == 2 || diff == 4 {
                edges[count] = [v1, v2];
                count += 1;
            }
            v2 += 1;
        }
        v1 += 1;
    }

    edges
}

/// Invert the edge table: every corner has exactly one edge per axis
const fn compute_corner_edges() -> [[usize; 3]; CORNER_COUNT] {
    let mut table = [[0usize; 3]; CORNER_COUNT];
    let mut edge = 0;

    while edge < EDGE_COUNT {
        let a = EDGES[edge][0];
        let b = EDGES[edge][1];
        let axis = (a ^ b).trailing_zeros() as usize;
        table[a][axis] = edge;
        table[b][axis] = edge;
        edge += 1;
    }

    table
}

/// Axis along which an edge runs
#[inline]
pub const fn edge_axis(edge: usize) -> usize {
    let diff = EDGES[edge][0] ^ EDGES[edge][1];
    diff.trailing_zeros() as usize
}

/// Corner reached by flipping `corner` across `axis`
#[inline]
pub const fn corner_neighbor(corner: usize, axis: usize) -> usize {
    corner ^ (1 << axis)
}

/// Whether `corner` lies on the given side of `axis`
#[inline]
pub const fn corner_on_side(corner: usize, axis: usize, side: usize) -> bool {
    ((corner >> axis) & 1) == side
}

/// Corner position inside the unit cube
#[inline]
pub fn corner_position(corner: usize) -> Vec3 {
    Vec3::new(
        (corner & 1) as f32,
        ((corner >> 1) & 1) as f32,
        ((corner >> 2) & 1) as f32,
    )
}

/// Midpoint of an edge inside the unit cube
#[inline]
pub fn edge_midpoint(edge: usize) -> Vec3 {
    let [a, b] = EDGES[edge];
    (corner_position(a) + corner_position(b)) * 0.5
}

/// Edge between two corners that differ in exactly one bit
#[inline]
pub fn edge_between(a: usize, b: usize) -> usize {
    debug_assert_eq!((a ^ b).count_ones(), 1, "corners {} and {} are not adjacent", a, b);
    CORNER_EDGES[a][(a ^ b).trailing_zeros() as usize]
}

/// Find the edge connecting two corners, in either order
pub fn find_edge(a: usize, b: usize) -> Option<usize> {
    EDGES
        .iter()
        .position(|&[p, q]| (p == a && q == b) || (p == b && q == a))
}

/// Per-axis +/-1 vector, +1 where the corresponding bit of `bits` is set
///
/// The reference normal of a patch around a negative corner `v` is
/// `reference_normal(v)`, around a non-negative corner `reference_normal(7 - v)`.
/// Either way it points towards the negative region.
#[inline]
pub fn reference_normal(bits: usize) -> Vec3 {
    let component = |axis: usize| if bits & (1 << axis) != 0 { 1.0 } else { -1.0 };
    Vec3::new(component(0), component(1), component(2))
}

/// Index of the plane on `side` (0 or 1) of `axis`
#[inline]
pub const fn plane_index(axis: usize, side: usize) -> usize {
    axis * 2 + side
}

/// One cube face
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneInfo {
    /// Axis the face is perpendicular to
    pub axis: usize,
    /// 0 for the negative side, 1 for the positive side
    pub side: usize,
    /// The four edges lying in the face
    ///
    /// Ordered so that the midpoints of the first three wind counter-clockwise
    /// seen from outside the cube. Walk them with [`PLANE_CYCLE`].
    pub edges: [usize; 4],
    /// The four corners lying in the face, ascending
    pub corners: [usize; 4],
    /// Unit normal pointing out of the cube
    pub outward: Vec3,
}

impl PlaneInfo {
    /// Whether the face holds the given edge
    #[inline]
    pub fn contains_edge(&self, edge: usize) -> bool {
        self.edges.contains(&edge)
    }

    /// Whether the face corners alternate in sign under `code`
    ///
    /// Corners are ascending, so `corners[0]/corners[3]` and
    /// `corners[1]/corners[2]` are the diagonals.
    pub fn alternates(&self, code: u8) -> bool {
        let [c0, c1, c2, c3] = self.corners.map(|c| (code >> c) & 1 == 1);
        c0 == c3 && c1 == c2 && c0 != c1
    }
}

/// Error deriving the cube topology
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// Reflecting an edge across an axis did not land on an edge
    MissingMirror { edge: usize, axis: usize },
    /// A face did not collect exactly four edges or corners
    MalformedPlane(usize),
    /// The first three edge midpoints of a face are collinear
    DegeneratePlane(usize),
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::MissingMirror { edge, axis } => {
                write!(f, "Edge {} has no mirror across axis {}", edge, axis)
            }
            TopologyError::MalformedPlane(p) => {
                write!(f, "Plane {} does not have four edges and four corners", p)
            }
            TopologyError::DegeneratePlane(p) => {
                write!(f, "Plane {} has collinear edge midpoints", p)
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// Derived symmetry and face tables
///
/// Built once and shared by the case table builder and the vertex cache.
/// Construction validates every derived lookup so the hot paths can index
/// the tables directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Topology {
    /// `mirror[edge][axis]`: the edge reflected across `axis`
    mirror: [[usize; 3]; EDGE_COUNT],
    planes: [PlaneInfo; PLANE_COUNT],
}

impl Topology {
    /// Derive the mirror and face tables
    pub fn new() -> Result<Self, TopologyError> {
        let mut mirror = [[0usize; 3]; EDGE_COUNT];
        for (edge, row) in mirror.iter_mut().enumerate() {
            let [a, b] = EDGES[edge];
            for (axis, slot) in row.iter_mut().enumerate() {
                *slot = find_edge(corner_neighbor(a, axis), corner_neighbor(b, axis))
                    .ok_or(TopologyError::MissingMirror { edge, axis })?;
            }
        }

        let mut planes = [PlaneInfo {
            axis: 0,
            side: 0,
            edges: [0; 4],
            corners: [0; 4],
            outward: Vec3::ZERO,
        }; PLANE_COUNT];

        for axis in 0..3 {
            for side in 0..2 {
                let index = plane_index(axis, side);
                planes[index] = Self::derive_plane(index, axis, side)?;
            }
        }

        Ok(Self { mirror, planes })
    }

    fn derive_plane(index: usize, axis: usize, side: usize) -> Result<PlaneInfo, TopologyError> {
        let edges: Vec<usize> = (0..EDGE_COUNT)
            .filter(|&e| {
                let [a, b] = EDGES[e];
                corner_on_side(a, axis, side) && corner_on_side(b, axis, side)
            })
            .collect();
        let corners: Vec<usize> = (0..CORNER_COUNT)
            .filter(|&v| corner_on_side(v, axis, side))
            .collect();

        let mut edges: [usize; 4] = edges
            .try_into()
            .map_err(|_| TopologyError::MalformedPlane(index))?;
        let corners: [usize; 4] = corners
            .try_into()
            .map_err(|_| TopologyError::MalformedPlane(index))?;

        let mut outward = Vec3::ZERO;
        outward.set_axis(axis, if side == 1 { 1.0 } else { -1.0 });

        let normal = triangle_normal(
            edge_midpoint(edges[0]),
            edge_midpoint(edges[1]),
            edge_midpoint(edges[2]),
        );
        let facing = normal.dot(outward);
        if facing == 0.0 {
            return Err(TopologyError::DegeneratePlane(index));
        }
        if facing < 0.0 {
            edges.swap(1, 2);
        }

        Ok(PlaneInfo { axis, side, edges, corners, outward })
    }

    /// Edge reflected across `axis`
    #[inline]
    pub fn edge_mirror(&self, edge: usize, axis: usize) -> usize {
        self.mirror[edge][axis]
    }

    /// Face description for plane index `plane`
    #[inline]
    pub fn plane(&self, plane: usize) -> &PlaneInfo {
        &self.planes[plane]
    }

    /// All six faces, indexed by plane
    #[inline]
    pub fn planes(&self) -> &[PlaneInfo; PLANE_COUNT] {
        &self.planes
    }
}
