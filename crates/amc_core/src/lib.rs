//! Core types for marching cubes
//!
//! - [`Topology`] - Cube corners, edges and planes with their symmetry tables
//! - [`ScalarField`] - Read access to a sampled signed field
//! - [`VoxelField`] - Owned dense field
//! - [`CellView`] - Corner samples of one cell, sign code and emptiness test

pub mod topology;
mod field;
mod cell;

pub use topology::{
    Topology, TopologyError, PlaneInfo,
    EDGES, CORNER_EDGES, PLANE_CYCLE, CORNER_COUNT, EDGE_COUNT, PLANE_COUNT,
    edge_axis, edge_midpoint, corner_neighbor, corner_position, edge_between, find_edge,
    reference_normal, plane_index,
};
pub use field::{ScalarField, VoxelField, FieldError};
pub use cell::CellView;

pub use amc_math::Vec3;
