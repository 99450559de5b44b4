use anyhow::{Context, Result};
use wgpu::SurfaceError;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::backend::{
    BufferDesc, BufferId, BufferUsage, DrawCall, ProgramDesc, ProgramId, RenderDevice,
    VertexArrayDesc, VertexArrayId,
};
use super::surface;
use super::{FrameError, GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects, the surface configuration, and every resource
/// created through [`RenderDevice`].
///
/// Handles issued by this type index into its resource tables; they are never
/// freed before the `Gpu` itself is dropped.
pub struct Gpu<'w> {
    /// Surface bound to the window.
    surface: wgpu::Surface<'w>,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    programs: Vec<GpuProgram>,
    buffers: Vec<wgpu::Buffer>,
    vertex_arrays: Vec<GpuVertexArray>,

    current_program: Option<ProgramId>,
    current_vertex_array: Option<VertexArrayId>,
    pending_clear: Option<wgpu::Color>,
    pending_draws: Vec<PendingDraw>,
}

struct GpuProgram {
    label: String,
    vertex_module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_module: wgpu::ShaderModule,
    fragment_entry: String,
    pipeline_layout: wgpu::PipelineLayout,
    bind_group: Option<wgpu::BindGroup>,
    /// `(binding, buffer)` pairs, one per uniform block.
    uniform_buffers: Vec<(u32, wgpu::Buffer)>,
}

struct GpuVertexArray {
    program: ProgramId,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: BufferId,
    index_buffer: Option<BufferId>,
}

#[derive(Debug, Copy, Clone)]
struct PendingDraw {
    program: ProgramId,
    vertex_array: VertexArrayId,
    call: DrawCall,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tumble device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::debug!("surface configured: {format:?} {}x{}", config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            programs: Vec::new(),
            buffers: Vec::new(),
            vertex_arrays: Vec::new(),
            current_program: None,
            current_vertex_array: None,
            pending_clear: None,
            pending_draws: Vec::new(),
        })
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tumble frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the surface texture.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: &SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }

    fn encode_draws(&self, frame: &mut GpuFrame, clear: Option<wgpu::Color>, draws: &[PendingDraw]) {
        let load = clear.map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear);

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tumble frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for draw in draws {
            let Some(vao) = self.vertex_arrays.get(draw.vertex_array.0 as usize) else { continue };
            let Some(program) = self.programs.get(draw.program.0 as usize) else { continue };
            let Some(vbo) = self.buffers.get(vao.vertex_buffer.0 as usize) else { continue };

            rpass.set_pipeline(&vao.pipeline);
            if let Some(bind_group) = program.bind_group.as_ref() {
                rpass.set_bind_group(0, bind_group, &[]);
            }
            rpass.set_vertex_buffer(0, vbo.slice(..));

            match draw.call {
                DrawCall::Arrays { vertex_count } => rpass.draw(0..vertex_count, 0..1),
                DrawCall::Indexed { index_count, format } => {
                    let Some(ibo) = vao.index_buffer.and_then(|id| self.buffers.get(id.0 as usize))
                    else {
                        log::warn!("indexed draw on vertex array {:?} without index buffer", draw.vertex_array);
                        continue;
                    };
                    rpass.set_index_buffer(ibo.slice(..), format);
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
            }
        }
    }
}

impl RenderDevice for Gpu<'_> {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> ProgramId {
        let vertex_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.vertex.source.into()),
        });
        let fragment_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.fragment.source.into()),
        });

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = desc
            .uniform_blocks
            .iter()
            .map(|block| wgpu::BindGroupLayoutEntry {
                binding: block.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(u64::from(block.size)),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(desc.label),
            entries: &layout_entries,
        });

        let uniform_buffers: Vec<(u32, wgpu::Buffer)> = desc
            .uniform_blocks
            .iter()
            .map(|block| {
                let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&block.name),
                    // Uniform buffer sizes must be multiples of 16.
                    size: u64::from(block.size).next_multiple_of(16),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (block.binding, buffer)
            })
            .collect();

        let bind_group = (!uniform_buffers.is_empty()).then(|| {
            let entries: Vec<wgpu::BindGroupEntry> = uniform_buffers
                .iter()
                .map(|(binding, buffer)| wgpu::BindGroupEntry {
                    binding: *binding,
                    resource: buffer.as_entire_binding(),
                })
                .collect();

            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(desc.label),
                layout: &bind_group_layout,
                entries: &entries,
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = if bind_group.is_some() {
            vec![&bind_group_layout]
        } else {
            Vec::new()
        };

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(GpuProgram {
            label: desc.label.to_string(),
            vertex_module,
            vertex_entry: desc.vertex.entry_point.to_string(),
            fragment_module,
            fragment_entry: desc.fragment.entry_point.to_string(),
            pipeline_layout,
            bind_group,
            uniform_buffers,
        });
        id
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let usage = match desc.usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(desc.label),
            contents: desc.contents,
            usage,
        });

        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(buffer);
        id
    }

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc<'_>) -> VertexArrayId {
        let program = &self.programs[desc.program.0 as usize];

        let attributes: Vec<wgpu::VertexAttribute> = desc
            .layout
            .attributes
            .iter()
            .map(|attr| wgpu::VertexAttribute {
                format: attr.format(),
                offset: u64::from(attr.offset),
                shader_location: attr.index,
            })
            .collect();

        let buffers = [wgpu::VertexBufferLayout {
            array_stride: u64::from(desc.layout.stride),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&program.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &program.vertex_module,
                entry_point: Some(program.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &program.fragment_module,
                entry_point: Some(program.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Both faces stay visible while the object spins.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("vertex array `{}` bound to program `{}`", desc.label, program.label);

        let id = VertexArrayId(self.vertex_arrays.len() as u32);
        self.vertex_arrays.push(GpuVertexArray {
            program: desc.program,
            pipeline,
            vertex_buffer: desc.vertex_buffer,
            index_buffer: desc.index_buffer,
        });
        id
    }

    fn write_uniform(&mut self, program: ProgramId, binding: u32, offset: u32, bytes: &[u8]) {
        let Some(program) = self.programs.get(program.0 as usize) else { return };
        let Some((_, buffer)) = program.uniform_buffers.iter().find(|(b, _)| *b == binding) else {
            return;
        };
        self.queue.write_buffer(buffer, u64::from(offset), bytes);
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current_program = Some(program);
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.current_vertex_array = Some(vertex_array);
    }

    fn clear(&mut self, color: wgpu::Color) {
        // A clear discards anything drawn before it in the same frame.
        self.pending_draws.clear();
        self.pending_clear = Some(color);
    }

    fn draw(&mut self, call: DrawCall) {
        let (Some(program), Some(vertex_array)) = (self.current_program, self.current_vertex_array)
        else {
            log::warn!("draw issued without a bound program and vertex array; ignored");
            return;
        };

        let Some(vao) = self.vertex_arrays.get(vertex_array.0 as usize) else { return };
        if vao.program != program {
            log::warn!(
                "vertex array {:?} was built for {:?}, current program is {:?}; draw ignored",
                vertex_array,
                vao.program,
                program
            );
            return;
        }

        self.pending_draws.push(PendingDraw {
            program,
            vertex_array,
            call,
        });
    }

    fn present(&mut self) -> std::result::Result<(), FrameError> {
        let clear = self.pending_clear.take();
        let draws = std::mem::take(&mut self.pending_draws);

        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.handle_surface_error(&err);
                return Err(surface::frame_error(action, &err));
            }
        };

        self.encode_draws(&mut frame, clear, &draws);
        self.submit(frame);
        Ok(())
    }
}
