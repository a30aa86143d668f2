//! Case entries: the triangulation template for one sign code

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use amc_core::PLANE_COUNT;
use amc_math::Vec3;

/// Whether and how a cell face is stitched with a cap quad
///
/// The sign is the direction of the cap's normal along the face's axis.
/// Two cells sharing a face emit the cap only if both recorded the same sign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapSign {
    /// Cap normal points along the negative axis direction
    Negative,
    /// No cap on this face
    #[default]
    None,
    /// Cap normal points along the positive axis direction
    Positive,
}

impl CapSign {
    /// -1, 0 or +1
    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            CapSign::Negative => -1,
            CapSign::None => 0,
            CapSign::Positive => 1,
        }
    }

    /// Sign of `value`, with zero meaning no cap
    #[inline]
    pub fn from_i8(value: i8) -> Self {
        match value {
            v if v < 0 => CapSign::Negative,
            0 => CapSign::None,
            _ => CapSign::Positive,
        }
    }

    /// Whether a cap is requested
    #[inline]
    pub fn is_cap(self) -> bool {
        self != CapSign::None
    }
}

bitflags! {
    /// Classification rules that contributed triangles to a case
    ///
    /// Purely informational; used by the inspection tooling.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CaseRules: u8 {
        /// A corner cut off from its three neighbours
        const SINGLE_VERTEX = 1 << 0;
        /// A wall running along one edge
        const EDGE = 1 << 1;
        /// The cell split cleanly in half along one axis
        const HALF_SPLIT = 1 << 2;
        /// Three corners around a face corner
        const TRIPLE_VERTEX = 1 << 3;
        /// A corner with all three of its neighbours
        const FOUR_VERTEX = 1 << 4;
        /// A four corner path with one step along each axis
        const SNAKE = 1 << 5;
    }
}

/// One template triangle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseTriangle {
    /// Cell edges holding the three vertices, counter-clockwise seen from
    /// the side `normal` points to
    pub edges: [usize; 3],
    /// Reference normal of the rule that produced the triangle
    pub normal: Vec3,
}

impl CaseTriangle {
    #[inline]
    pub fn new(edges: [usize; 3], normal: Vec3) -> Self {
        Self { edges, normal }
    }
}

/// Triangulation template for one sign code
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseEntry {
    /// Sign code this entry describes (bit `v` set when corner `v >= 0`)
    pub code: u8,
    /// Template triangles over cell edges
    pub triangles: Vec<CaseTriangle>,
    /// Cap request per plane
    pub caps: [CapSign; PLANE_COUNT],
    /// Rules that produced the triangles
    #[serde(default)]
    pub rules: CaseRules,
}

impl CaseEntry {
    /// Entry with no geometry
    pub fn empty(code: u8) -> Self {
        Self {
            code,
            triangles: Vec::new(),
            caps: [CapSign::None; PLANE_COUNT],
            rules: CaseRules::empty(),
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn cap(&self, plane: usize) -> CapSign {
        self.caps[plane]
    }

    /// Whether any face of this case requests a cap
    pub fn has_caps(&self) -> bool {
        self.caps.iter().any(|c| c.is_cap())
    }

    /// Bitmask of the edges used by the triangles
    pub fn edge_mask(&self) -> u16 {
        self.triangles
            .iter()
            .flat_map(|t| t.edges.iter())
            .fold(0u16, |mask, &e| mask | (1 << e))
    }
}
