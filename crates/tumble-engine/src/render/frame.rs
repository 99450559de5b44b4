use crate::device::{FrameError, RenderDevice};
use crate::transform::TransformState;

use super::RenderableObject;

pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Draws `object` with the current `transforms` and presents.
///
/// Matrices are uploaded by the uniform names `view`, `projection` and
/// `model`; names the program does not declare are skipped.
pub fn render_frame<D: RenderDevice + ?Sized>(
    device: &mut D,
    object: &mut RenderableObject,
    transforms: &TransformState,
    clear: wgpu::Color,
) -> Result<(), FrameError> {
    let program = object.program_mut();
    let view = program.resolve_uniform("view");
    let projection = program.resolve_uniform("projection");
    let model = program.resolve_uniform("model");

    let program = object.program();
    program.upload_mat4(device, view, &transforms.view);
    program.upload_mat4(device, projection, &transforms.projection);
    program.upload_mat4(device, model, &transforms.model);

    device.bind_vertex_array(object.vertex_array());
    device.use_program(program.id());
    device.clear(clear);
    device.draw(object.mesh().draw_call());
    device.present()
}
