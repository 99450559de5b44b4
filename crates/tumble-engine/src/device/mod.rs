//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the `RenderDevice` seam between the core and command submission
//! - the wgpu-backed implementation (`Gpu`): Instance/Adapter/Device/Queue,
//!   Surface configuration, frame acquisition and presentation
//! - a recording implementation (`HeadlessDevice`) for playback and tests

mod backend;
mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use backend::{
    BufferDesc, BufferId, BufferUsage, DrawCall, ProgramDesc, ProgramId, RenderDevice, StageDesc,
    VertexArrayDesc, VertexArrayId,
};
pub use error::{FrameError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::{DeviceCommand, HeadlessDevice};
pub use init::GpuInit;
