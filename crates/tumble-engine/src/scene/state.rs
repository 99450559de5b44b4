use crate::device::RenderDevice;
use crate::geometry::{presets, upload_mesh};
use crate::render::RenderableObject;
use crate::shader::build_program;
use crate::transform::TransformState;

use super::{InitError, SceneConfig, SceneVariant};

/// Everything the frame loop reads and updates each iteration.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub object: RenderableObject,
    pub transforms: TransformState,
    pub clear_color: wgpu::Color,
}

/// Builds the scene on `device`: transforms, shader program, mesh, and the
/// renderable tying them together.
///
/// Transforms and shader sources are checked first, so a bad camera or an
/// unreadable shader file fails before anything is created on the device.
pub fn initialize<D: RenderDevice + ?Sized>(
    device: &mut D,
    config: &SceneConfig,
) -> Result<RenderState, InitError> {
    let variant = config.variant;
    let transforms = TransformState::new(&config.camera)?;
    let (vertex_source, fragment_source) = config.shaders.load(variant)?;

    let program = build_program(device, variant.name(), &vertex_source, &fragment_source)?;

    let mesh = match variant {
        SceneVariant::ColoredTriangle => {
            upload_mesh(device, variant.name(), presets::colored_triangle(), None)?
        }
        SceneVariant::IndexedQuad => {
            let (vertices, indices) = presets::indexed_quad();
            upload_mesh(device, variant.name(), vertices, Some(indices))?
        }
    };

    let object = RenderableObject::new(device, variant.name(), mesh, program)?;
    log::info!("scene `{variant}` initialized");

    Ok(RenderState {
        object,
        transforms,
        clear_color: config.clear_color,
    })
}
