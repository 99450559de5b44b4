//! Small fixed-size linear algebra used by the transform pipeline.
//!
//! Convention (crate-wide):
//! - matrices are indexed `[row][col]`
//! - vectors are columns, so `v' = M * v`
//! - GPU uploads are column-major (the WGSL `mat4x4<f32>` layout)

mod mat4;

pub use mat4::Mat4;
