//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! drives the [`FrameLoop`](crate::frame_loop::FrameLoop) from redraws.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
