//! Tumble engine crate.
//!
//! A minimal real-time rasterizer: a shader pipeline, a static geometry
//! store, the model/view/projection transform chain, and a frame loop that
//! redraws one rotating primitive until asked to quit.
//!
//! Rendering goes through the [`device::RenderDevice`] seam, implemented by
//! [`device::Gpu`] (wgpu) and [`device::HeadlessDevice`] (command recorder).

pub mod assets;
pub mod device;
pub mod frame_loop;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod math;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod transform;
pub mod window;
