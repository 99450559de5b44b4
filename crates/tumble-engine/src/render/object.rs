use crate::device::{RenderDevice, VertexArrayDesc, VertexArrayId};
use crate::geometry::{GeometryError, Mesh, VertexLayout};
use crate::shader::ShaderProgram;

/// One mesh drawn with one program.
#[derive(Debug, Clone)]
pub struct RenderableObject {
    mesh: Mesh,
    program: ShaderProgram,
    vertex_array: VertexArrayId,
}

impl RenderableObject {
    /// Binds `mesh` onto `program` and creates the vertex array.
    ///
    /// Every vertex input the program reads must be `f32` (scalar or vector)
    /// and needs an attribute of the same width in the mesh layout. Extra
    /// attributes are allowed.
    pub fn new<D: RenderDevice + ?Sized>(
        device: &mut D,
        label: &str,
        mesh: Mesh,
        program: ShaderProgram,
    ) -> Result<Self, GeometryError> {
        check_layout(mesh.layout(), &program)?;

        let vertex_array = device.create_vertex_array(&VertexArrayDesc {
            label,
            program: program.id(),
            layout: mesh.layout(),
            vertex_buffer: mesh.vertex_buffer(),
            index_buffer: mesh.index_buffer().map(|ib| ib.buffer),
        });

        log::info!(
            "renderable `{label}`: mesh `{}` with program `{}`",
            mesh.label(),
            program.label()
        );

        Ok(Self {
            mesh,
            program,
            vertex_array,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }
}

fn check_layout(layout: &VertexLayout, program: &ShaderProgram) -> Result<(), GeometryError> {
    for input in program.vertex_inputs() {
        let location = input.location;
        let Some(attr) = layout.attribute(location) else {
            return Err(GeometryError::LayoutMismatch {
                location,
                reason: "no attribute at this location".into(),
            });
        };
        match input.f32_components() {
            Some(n) if n == attr.components => {}
            Some(n) => {
                return Err(GeometryError::LayoutMismatch {
                    location,
                    reason: format!("shader reads {n} components, layout has {}", attr.components),
                });
            }
            None => {
                return Err(GeometryError::LayoutMismatch {
                    location,
                    reason: format!("input type {:?} is not f32 or a vector of f32", input.ty),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCommand, HeadlessDevice};
    use crate::geometry::{presets, upload_mesh};
    use crate::shader::{build_program, sources};

    #[test]
    fn creates_vertex_array_for_matching_layout() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(&mut device, "tri", &presets::COLORED_TRIANGLE, None).unwrap();
        let program =
            build_program(&mut device, "colored", sources::COLORED_VERTEX, sources::COLORED_FRAGMENT)
                .unwrap();
        let program_id = program.id();

        let object = RenderableObject::new(&mut device, "tri", mesh, program).unwrap();
        assert_eq!(
            device.commands().last(),
            Some(&DeviceCommand::CreateVertexArray { id: object.vertex_array(), program: program_id })
        );
    }

    #[test]
    fn unused_attributes_are_allowed() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(&mut device, "tri", &presets::COLORED_TRIANGLE, None).unwrap();
        let program =
            build_program(&mut device, "flat", sources::FLAT_VERTEX, sources::FLAT_FRAGMENT).unwrap();

        assert!(RenderableObject::new(&mut device, "tri", mesh, program).is_ok());
    }

    #[test]
    fn missing_attribute_is_rejected() {
        let mut device = HeadlessDevice::new();
        let (vertices, indices) = presets::indexed_quad();
        let mesh = upload_mesh(&mut device, "quad", vertices, Some(indices)).unwrap();
        let program =
            build_program(&mut device, "colored", sources::COLORED_VERTEX, sources::COLORED_FRAGMENT)
                .unwrap();

        let err = RenderableObject::new(&mut device, "quad", mesh, program).unwrap_err();
        assert!(matches!(err, GeometryError::LayoutMismatch { location: 1, .. }));
    }

    #[test]
    fn component_count_mismatch_is_rejected() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(&mut device, "tri", &presets::COLORED_TRIANGLE, None).unwrap();
        let vs = "@vertex fn vs_main(@location(0) p: vec4<f32>) -> @builtin(position) vec4<f32> { return p; }";
        let program = build_program(&mut device, "wide", vs, sources::FLAT_FRAGMENT).unwrap();

        let err = RenderableObject::new(&mut device, "tri", mesh, program).unwrap_err();
        assert!(matches!(err, GeometryError::LayoutMismatch { location: 0, .. }));
    }

    #[test]
    fn integer_input_is_rejected() {
        let mut device = HeadlessDevice::new();
        let (vertices, indices) = presets::indexed_quad();
        let mesh = upload_mesh(&mut device, "quad", vertices, Some(indices)).unwrap();
        let vs = "@vertex fn vs_main(@location(0) p: vec3<u32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(vec3<f32>(p), 1.0);
            }";
        let program = build_program(&mut device, "unsigned", vs, sources::FLAT_FRAGMENT).unwrap();
        let commands_before = device.commands().len();

        let err = RenderableObject::new(&mut device, "quad", mesh, program).unwrap_err();
        let GeometryError::LayoutMismatch { location: 0, reason } = &err else { panic!("{err:?}") };
        assert!(reason.contains("f32"), "{reason}");
        assert_eq!(device.commands().len(), commands_before);
    }
}
