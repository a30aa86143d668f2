//! Isosurface extraction over scalar fields
//!
//! - [`MeshBuilder`] - Sweeps a field with a [`CaseTable`](amc_cases::CaseTable)
//! - [`VertexCache`] - Shares edge crossings between neighbouring cells
//! - [`Mesh`] - Indexed output with watertightness checks
//! - [`UsageStats`] - Per-case counters
//! - [`triangulate_cell`] - Debug triangulation of a single cube

mod types;
mod cache;
mod mesh;
mod builder;
mod stats;
mod inspect;

pub use types::{MeshVertex, IndexedTriangle, DebugTriangle};
pub use cache::{VertexCache, PlaneKey, EDGE_SLOTS};
pub use mesh::{Mesh, SweepSummary};
pub use builder::{MeshBuilder, MeshCapacity, CellInspection, MAX_CELL_TRIANGLES, MAX_CELL_VERTICES};
pub use stats::UsageStats;
pub use inspect::{triangulate_cell, MAX_DEBUG_TRIANGLES};
