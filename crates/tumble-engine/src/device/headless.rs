use std::collections::{HashMap, VecDeque};

use super::backend::{
    BufferDesc, BufferId, BufferUsage, DrawCall, ProgramDesc, ProgramId, RenderDevice,
    VertexArrayDesc, VertexArrayId,
};
use super::FrameError;

/// One call received by a [`HeadlessDevice`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    CreateProgram { id: ProgramId, label: String },
    CreateBuffer { id: BufferId, usage: BufferUsage, len: usize },
    CreateVertexArray { id: VertexArrayId, program: ProgramId },
    WriteUniform { program: ProgramId, binding: u32, offset: u32, len: usize },
    UseProgram(ProgramId),
    BindVertexArray(VertexArrayId),
    Clear(wgpu::Color),
    Draw(DrawCall),
    Present,
}

/// A [`RenderDevice`] without a GPU.
///
/// Records every command and keeps CPU copies of buffer and uniform contents.
/// Present results can be scripted with [`HeadlessDevice::queue_present_result`];
/// unscripted presents succeed.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    commands: Vec<DeviceCommand>,
    programs: Vec<HeadlessProgram>,
    buffers: Vec<Vec<u8>>,
    vertex_arrays: Vec<ProgramId>,
    present_results: VecDeque<Result<(), FrameError>>,
    frames_presented: u64,
}

#[derive(Debug)]
struct HeadlessProgram {
    /// Uniform memory keyed by binding.
    uniforms: HashMap<u32, Vec<u8>>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Commands recorded after the first `skip` entries.
    pub fn commands_since(&self, skip: usize) -> &[DeviceCommand] {
        self.commands.get(skip..).unwrap_or(&[])
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Draw(call) => Some(*call),
                _ => None,
            })
            .collect()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.0 as usize).map(Vec::as_slice)
    }

    /// Current contents of one uniform binding of `program`.
    pub fn uniform_contents(&self, program: ProgramId, binding: u32) -> Option<&[u8]> {
        self.programs
            .get(program.0 as usize)
            .and_then(|p| p.uniforms.get(&binding))
            .map(Vec::as_slice)
    }

    /// Successful presents so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Scripts the result of an upcoming present. Results are consumed in order.
    pub fn queue_present_result(&mut self, result: Result<(), FrameError>) {
        self.present_results.push_back(result);
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> ProgramId {
        let id = ProgramId(self.programs.len() as u32);
        let uniforms = desc
            .uniform_blocks
            .iter()
            .map(|block| (block.binding, vec![0u8; block.size as usize]))
            .collect();
        self.programs.push(HeadlessProgram { uniforms });
        self.commands.push(DeviceCommand::CreateProgram {
            id,
            label: desc.label.to_string(),
        });
        id
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(desc.contents.to_vec());
        self.commands.push(DeviceCommand::CreateBuffer {
            id,
            usage: desc.usage,
            len: desc.contents.len(),
        });
        id
    }

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc<'_>) -> VertexArrayId {
        let id = VertexArrayId(self.vertex_arrays.len() as u32);
        self.vertex_arrays.push(desc.program);
        self.commands.push(DeviceCommand::CreateVertexArray {
            id,
            program: desc.program,
        });
        id
    }

    fn write_uniform(&mut self, program: ProgramId, binding: u32, offset: u32, bytes: &[u8]) {
        self.commands.push(DeviceCommand::WriteUniform {
            program,
            binding,
            offset,
            len: bytes.len(),
        });

        let Some(memory) = self
            .programs
            .get_mut(program.0 as usize)
            .and_then(|p| p.uniforms.get_mut(&binding))
        else {
            return;
        };
        let start = offset as usize;
        if let Some(dst) = memory.get_mut(start..start + bytes.len()) {
            dst.copy_from_slice(bytes);
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        self.commands.push(DeviceCommand::UseProgram(program));
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.commands.push(DeviceCommand::BindVertexArray(vertex_array));
    }

    fn clear(&mut self, color: wgpu::Color) {
        self.commands.push(DeviceCommand::Clear(color));
    }

    fn draw(&mut self, call: DrawCall) {
        self.commands.push(DeviceCommand::Draw(call));
    }

    fn present(&mut self) -> Result<(), FrameError> {
        self.commands.push(DeviceCommand::Present);
        let result = self.present_results.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.frames_presented += 1;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::StageDesc;
    use crate::shader::UniformBlock;

    fn program(device: &mut HeadlessDevice, blocks: &[UniformBlock]) -> ProgramId {
        device.create_program(&ProgramDesc {
            label: "test",
            vertex: StageDesc { source: "", entry_point: "vs_main" },
            fragment: StageDesc { source: "", entry_point: "fs_main" },
            uniform_blocks: blocks,
        })
    }

    #[test]
    fn handles_are_sequential() {
        let mut device = HeadlessDevice::new();
        let a = device.create_buffer(&BufferDesc { label: "a", usage: BufferUsage::Vertex, contents: &[1, 2] });
        let b = device.create_buffer(&BufferDesc { label: "b", usage: BufferUsage::Index, contents: &[3] });
        assert_eq!((a, b), (BufferId(0), BufferId(1)));
        assert_eq!(device.buffer_contents(b), Some(&[3u8][..]));
    }

    #[test]
    fn uniform_writes_land_at_offset() {
        let mut device = HeadlessDevice::new();
        let block = UniformBlock { name: "u".into(), binding: 2, size: 8, fields: Vec::new() };
        let id = program(&mut device, &[block]);

        device.write_uniform(id, 2, 4, &[9, 9, 9, 9]);
        assert_eq!(device.uniform_contents(id, 2), Some(&[0, 0, 0, 0, 9, 9, 9, 9][..]));
    }

    #[test]
    fn out_of_range_uniform_write_is_ignored() {
        let mut device = HeadlessDevice::new();
        let block = UniformBlock { name: "u".into(), binding: 0, size: 4, fields: Vec::new() };
        let id = program(&mut device, &[block]);

        device.write_uniform(id, 0, 2, &[1, 1, 1, 1]);
        device.write_uniform(id, 7, 0, &[1]);
        assert_eq!(device.uniform_contents(id, 0), Some(&[0, 0, 0, 0][..]));
    }

    #[test]
    fn scripted_present_results_are_consumed_in_order() {
        let mut device = HeadlessDevice::new();
        device.queue_present_result(Err(FrameError::Skipped("timeout".into())));

        assert!(device.present().is_err());
        assert!(device.present().is_ok());
        assert_eq!(device.frames_presented(), 1);
    }
}
