use crate::geometry::VertexLayout;
use crate::shader::UniformBlock;

use super::FrameError;

/// Device-issued handle to a linked shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Device-issued handle to a GPU buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Device-issued handle to a vertex array (buffers + layout + program).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexArrayId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// One validated shader stage.
#[derive(Debug, Copy, Clone)]
pub struct StageDesc<'a> {
    pub source: &'a str,
    pub entry_point: &'a str,
}

/// Everything a device needs to allocate a program.
#[derive(Debug, Copy, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex: StageDesc<'a>,
    pub fragment: StageDesc<'a>,
    pub uniform_blocks: &'a [UniformBlock],
}

/// Static buffer contents; the buffer is sized exactly to `contents`.
#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub usage: BufferUsage,
    pub contents: &'a [u8],
}

/// Binds a vertex layout onto a vertex buffer for use with one program.
#[derive(Debug, Copy, Clone)]
pub struct VertexArrayDesc<'a> {
    pub label: &'a str,
    pub program: ProgramId,
    pub layout: &'a VertexLayout,
    pub vertex_buffer: BufferId,
    pub index_buffer: Option<BufferId>,
}

/// A single triangle-list draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    Arrays { vertex_count: u32 },
    Indexed { index_count: u32, format: wgpu::IndexFormat },
}

/// Command submission seam.
///
/// The call pattern is stateful: `use_program` and `bind_vertex_array` set
/// the current state, `clear` and `draw` record work against it, and
/// `present` submits everything recorded since the previous present.
///
/// Resource creation is infallible here: programs arrive pre-validated from
/// the shader pipeline and layouts are checked by the geometry store.
pub trait RenderDevice {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> ProgramId;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId;

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc<'_>) -> VertexArrayId;

    /// Writes `bytes` into uniform binding `binding` of `program` at `offset`.
    fn write_uniform(&mut self, program: ProgramId, binding: u32, offset: u32, bytes: &[u8]);

    fn use_program(&mut self, program: ProgramId);

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId);

    fn clear(&mut self, color: wgpu::Color);

    fn draw(&mut self, call: DrawCall);

    fn present(&mut self) -> Result<(), FrameError>;
}
