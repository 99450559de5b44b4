//! Shader pipeline: WGSL stages are parsed and validated on the CPU with
//! naga, linked by checking their shared interface, and only then handed to
//! a [`RenderDevice`](crate::device::RenderDevice).

mod error;
mod program;
mod reflect;
pub mod sources;
mod stage;

pub use error::ShaderError;
pub use program::{
    build_program, link_program, ShaderProgram, UniformBlock, UniformField, UniformHandle,
};
pub use reflect::Varying;
pub use stage::{compile_stage, CompiledStage, ShaderStage};
