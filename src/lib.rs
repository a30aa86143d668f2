//! Algorithmic marching cubes
//!
//! The library crates do the work; this package adds the pieces the command
//! line tool needs:
//!
//! - [`config`] - Layered configuration (TOML files and `AMC_` environment)
//! - [`scene`] - Demo fields (blended spheres, ambiguous two-cell strips)
//! - [`export`] - Wavefront OBJ output

pub mod config;
pub mod scene;
pub mod export;

pub use amc_cases::CaseTable;
pub use amc_core::{ScalarField, VoxelField};
pub use amc_mesh::{Mesh, MeshBuilder, MeshCapacity, UsageStats};
