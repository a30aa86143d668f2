//! 3D Mathematics Library
//!
//! Small vector toolkit shared by the marching cubes crates.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`triangle_normal`] - Unnormalised face normal of a triangle

mod vec3;

pub use vec3::{Vec3, triangle_normal};
