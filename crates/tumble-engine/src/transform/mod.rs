//! Model/view/projection transform chain.
//!
//! View and projection are computed once from a [`CameraConfig`]. The model
//! matrix is a pure function of the frame [`Tick`](crate::time::Tick).

mod camera;
mod pipeline;

pub use camera::CameraConfig;
pub use pipeline::{
    advance_model, compute_projection, view_matrix, TransformError, TransformState, ROTATION_RATE,
};
