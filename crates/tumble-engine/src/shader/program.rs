use std::collections::HashMap;

use crate::device::{ProgramDesc, ProgramId, RenderDevice, StageDesc};
use crate::math::Mat4;

use super::{compile_stage, CompiledStage, ShaderError, ShaderStage, Varying};

/// One member of a uniform struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

/// A `var<uniform>` global in bind group 0.
///
/// `fields` is empty unless the global is a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    pub name: String,
    pub binding: u32,
    pub size: u32,
    pub fields: Vec<UniformField>,
}

/// Location of a named uniform inside a program's uniform memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformHandle {
    pub binding: u32,
    pub offset: u32,
    pub size: u32,
}

impl UniformHandle {
    /// Returned for names the program does not declare.
    pub const INVALID: UniformHandle = UniformHandle {
        binding: u32::MAX,
        offset: 0,
        size: 0,
    };

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.size != 0 && self.binding != u32::MAX
    }
}

/// A linked vertex + fragment pair resident on a device.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    id: ProgramId,
    label: String,
    vertex_inputs: Vec<Varying>,
    blocks: Vec<UniformBlock>,
    resolved: HashMap<String, UniformHandle>,
}

impl ShaderProgram {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Vertex attributes the vertex stage reads, ordered by location.
    pub fn vertex_inputs(&self) -> &[Varying] {
        &self.vertex_inputs
    }

    pub fn uniform_blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    /// Looks up `name` as a uniform global, then as a uniform struct member.
    ///
    /// Unknown names resolve to [`UniformHandle::INVALID`]. Every answer is
    /// cached, misses included.
    pub fn resolve_uniform(&mut self, name: &str) -> UniformHandle {
        if let Some(handle) = self.resolved.get(name) {
            return *handle;
        }

        let handle = self.lookup(name);
        if !handle.is_valid() {
            log::debug!("program `{}` has no uniform `{name}`", self.label);
        }
        self.resolved.insert(name.to_string(), handle);
        handle
    }

    fn lookup(&self, name: &str) -> UniformHandle {
        if let Some(block) = self.blocks.iter().find(|b| b.name == name) {
            return UniformHandle {
                binding: block.binding,
                offset: 0,
                size: block.size,
            };
        }

        self.blocks
            .iter()
            .find_map(|block| {
                block.fields.iter().find(|f| f.name == name).map(|f| UniformHandle {
                    binding: block.binding,
                    offset: f.offset,
                    size: f.size,
                })
            })
            .unwrap_or(UniformHandle::INVALID)
    }

    /// Writes `bytes` at `handle`. Invalid handles are ignored.
    pub fn upload<D: RenderDevice + ?Sized>(&self, device: &mut D, handle: UniformHandle, bytes: &[u8]) {
        if !handle.is_valid() {
            return;
        }
        if bytes.len() > handle.size as usize {
            log::warn!(
                "uniform write of {} bytes exceeds slot of {} bytes in program `{}`; ignored",
                bytes.len(),
                handle.size,
                self.label
            );
            return;
        }
        device.write_uniform(self.id, handle.binding, handle.offset, bytes);
    }

    /// Uploads `matrix` in column-major order.
    pub fn upload_mat4<D: RenderDevice + ?Sized>(&self, device: &mut D, handle: UniformHandle, matrix: &Mat4) {
        self.upload(device, handle, bytemuck::cast_slice(&matrix.to_cols_array()));
    }
}

/// Links two compiled stages into a program and makes it current.
///
/// Every `@location` the fragment stage reads must be written by the vertex
/// stage with the same type, and the fragment stage must write a single
/// `vec4<f32>` color at location 0. Uniform buffers in bind group 0 are the
/// only bindings a program may declare; a binding declared by both stages
/// must agree on name and size. All problems are reported together in the
/// link log.
pub fn link_program<D: RenderDevice + ?Sized>(
    device: &mut D,
    label: &str,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<ShaderProgram, ShaderError> {
    let mut problems = Vec::new();

    if vertex.stage() != ShaderStage::Vertex {
        problems.push(format!("expected a vertex stage, got {}", vertex.stage()));
    }
    if fragment.stage() != ShaderStage::Fragment {
        problems.push(format!("expected a fragment stage, got {}", fragment.stage()));
    }

    for input in fragment.inputs() {
        let name = input.name.as_deref().unwrap_or("<unnamed>");
        match vertex.outputs().iter().find(|o| o.location == input.location) {
            None => problems.push(format!(
                "fragment input `{name}` at location {} is not written by the vertex stage",
                input.location
            )),
            Some(output) if output.ty != input.ty => problems.push(format!(
                "location {}: vertex stage writes {:?}, fragment stage reads {:?}",
                input.location, output.ty, input.ty
            )),
            Some(_) => {}
        }
    }

    match fragment.outputs() {
        [color] if color.location == 0 && color.f32_components() == Some(4) => {}
        [] => problems.push("fragment stage writes no color output".to_string()),
        [color] if color.location == 0 => problems.push(format!(
            "fragment color output must be vec4<f32>, found {:?}",
            color.ty
        )),
        outputs => problems.push(format!(
            "fragment stage must write only location 0, writes locations {:?}",
            outputs.iter().map(|o| o.location).collect::<Vec<_>>()
        )),
    }

    for stage in [vertex, fragment] {
        for foreign in stage.foreign_bindings() {
            problems.push(format!(
                "{} `{}` at group {} binding {} in the {} stage; only uniform buffers are supported",
                foreign.kind,
                foreign.name,
                foreign.group,
                foreign.binding,
                stage.stage()
            ));
        }
    }

    let mut blocks: Vec<UniformBlock> = Vec::new();
    for uniform in vertex.uniforms().iter().chain(fragment.uniforms()) {
        let block = &uniform.block;
        if uniform.group != 0 {
            problems.push(format!(
                "uniform `{}` is in group {}; only group 0 is supported",
                block.name, uniform.group
            ));
            continue;
        }
        match blocks.iter().find(|b| b.binding == block.binding) {
            None => blocks.push(block.clone()),
            Some(existing) if existing.name != block.name || existing.size != block.size => {
                problems.push(format!(
                    "binding {} declared as `{}` ({} bytes) and `{}` ({} bytes)",
                    block.binding, existing.name, existing.size, block.name, block.size
                ))
            }
            Some(_) => {}
        }
    }

    if !problems.is_empty() {
        return Err(ShaderError::Link {
            log: problems.join("\n"),
        });
    }

    blocks.sort_by_key(|b| b.binding);

    let id = device.create_program(&ProgramDesc {
        label,
        vertex: StageDesc {
            source: vertex.source(),
            entry_point: vertex.entry_point(),
        },
        fragment: StageDesc {
            source: fragment.source(),
            entry_point: fragment.entry_point(),
        },
        uniform_blocks: &blocks,
    });
    device.use_program(id);

    log::info!("linked program `{label}` ({} uniform bindings)", blocks.len());

    Ok(ShaderProgram {
        id,
        label: label.to_string(),
        vertex_inputs: vertex.inputs().to_vec(),
        blocks,
        resolved: HashMap::new(),
    })
}

/// Compiles both stages and links them. Nothing reaches the device unless
/// both stages compile.
pub fn build_program<D: RenderDevice + ?Sized>(
    device: &mut D,
    label: &str,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ShaderProgram, ShaderError> {
    let vertex = compile_stage(vertex_source, ShaderStage::Vertex)?;
    let fragment = compile_stage(fragment_source, ShaderStage::Fragment)?;
    link_program(device, label, &vertex, &fragment)
}
