use crate::device::{BufferDesc, BufferId, BufferUsage, DrawCall, RenderDevice};

use super::{GeometryError, VertexLayout, VertexRecord};

/// GPU index buffer of `u32` triangle-list indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexBuffer {
    pub buffer: BufferId,
    pub count: u32,
}

/// Static triangle-list geometry resident on a device.
///
/// Buffers are sized exactly to the uploaded data and never resized.
#[derive(Debug, Clone)]
pub struct Mesh {
    label: String,
    vertex_buffer: BufferId,
    vertex_count: u32,
    index_buffer: Option<IndexBuffer>,
    layout: VertexLayout,
}

impl Mesh {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_buffer(&self) -> Option<IndexBuffer> {
        self.index_buffer
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Layout of the records in the vertex buffer.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn triangle_count(&self) -> u32 {
        match self.index_buffer {
            Some(ib) => ib.count / 3,
            None => self.vertex_count / 3,
        }
    }

    /// The draw that renders the whole mesh, matching how it was uploaded.
    pub fn draw_call(&self) -> DrawCall {
        match self.index_buffer {
            Some(ib) => DrawCall::Indexed {
                index_count: ib.count,
                format: wgpu::IndexFormat::Uint32,
            },
            None => DrawCall::Arrays {
                vertex_count: self.vertex_count,
            },
        }
    }
}

/// Copies `vertices` (and `indices`, if any) into static device buffers.
///
/// Fails before touching the device when the data is not a valid triangle
/// list.
pub fn upload_mesh<D, V>(
    device: &mut D,
    label: &str,
    vertices: &[V],
    indices: Option<&[u32]>,
) -> Result<Mesh, GeometryError>
where
    D: RenderDevice + ?Sized,
    V: VertexRecord,
{
    let layout = V::layout()?;
    if vertices.is_empty() {
        return Err(GeometryError::EmptyMesh { label: label.to_string() });
    }
    let vertex_count = vertices.len() as u32;

    match indices {
        Some(indices) => {
            if indices.is_empty() || indices.len() % 3 != 0 {
                return Err(GeometryError::PartialTriangle {
                    label: label.to_string(),
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    label: label.to_string(),
                    index,
                    vertex_count,
                });
            }
        }
        None if vertices.len() % 3 != 0 => {
            return Err(GeometryError::PartialTriangle {
                label: label.to_string(),
                count: vertices.len(),
            });
        }
        None => {}
    }

    let vertex_buffer = device.create_buffer(&BufferDesc {
        label,
        usage: BufferUsage::Vertex,
        contents: bytemuck::cast_slice(vertices),
    });

    let index_buffer = indices.map(|indices| IndexBuffer {
        buffer: device.create_buffer(&BufferDesc {
            label,
            usage: BufferUsage::Index,
            contents: bytemuck::cast_slice(indices),
        }),
        count: indices.len() as u32,
    });

    log::info!(
        "uploaded mesh `{label}`: {vertex_count} vertices, {} indices",
        index_buffer.map_or(0, |ib| ib.count)
    );

    Ok(Mesh {
        label: label.to_string(),
        vertex_buffer,
        vertex_count,
        index_buffer,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessDevice;
    use crate::geometry::presets;
    use crate::geometry::{describe_layout, AttributeSpec, ColoredVertex, PositionVertex};

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn vertex_count_round_trips() {
        let mut device = HeadlessDevice::new();
        let vertices = vec![PositionVertex::new([0.0; 3]); 9];
        let mesh = upload_mesh(&mut device, "nine", &vertices, None).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 3);
    }

    #[test]
    fn buffers_are_sized_exactly() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(
            &mut device,
            "quad",
            &presets::QUAD_VERTICES,
            Some(&presets::QUAD_INDICES),
        )
        .unwrap();

        let vbo = device.buffer_contents(mesh.vertex_buffer()).unwrap();
        assert_eq!(vbo.len(), 4 * 12);

        let ib = mesh.index_buffer().unwrap();
        let ibo = device.buffer_contents(ib.buffer).unwrap();
        assert_eq!(ibo, bytemuck::cast_slice::<u32, u8>(&[1, 2, 0, 0, 2, 3]));
    }

    // ── draw calls ────────────────────────────────────────────────────────

    #[test]
    fn non_indexed_mesh_draws_arrays() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(&mut device, "tri", &presets::COLORED_TRIANGLE, None).unwrap();
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.draw_call(), DrawCall::Arrays { vertex_count: 3 });
        assert_eq!(Ok(mesh.layout().clone()), <ColoredVertex as VertexRecord>::layout());
    }

    #[test]
    fn indexed_mesh_draws_u32_elements() {
        let mut device = HeadlessDevice::new();
        let mesh = upload_mesh(
            &mut device,
            "quad",
            &presets::QUAD_VERTICES,
            Some(&presets::QUAD_INDICES),
        )
        .unwrap();
        assert_eq!(
            mesh.draw_call(),
            DrawCall::Indexed { index_count: 6, format: wgpu::IndexFormat::Uint32 }
        );
        assert_eq!(mesh.triangle_count(), 2);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn rejects_empty_mesh_without_touching_device() {
        let mut device = HeadlessDevice::new();
        let err = upload_mesh::<_, PositionVertex>(&mut device, "empty", &[], None).unwrap_err();
        assert!(matches!(err, GeometryError::EmptyMesh { .. }));
        assert_eq!(device.buffer_count(), 0);
    }

    #[test]
    fn rejects_partial_triangle() {
        let mut device = HeadlessDevice::new();
        let err = upload_mesh(&mut device, "q", &presets::QUAD_VERTICES, Some(&[0, 1]))
            .unwrap_err();
        assert!(matches!(err, GeometryError::PartialTriangle { count: 2, .. }));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut device = HeadlessDevice::new();
        let err = upload_mesh(&mut device, "q", &presets::QUAD_VERTICES, Some(&[0, 1, 4]))
            .unwrap_err();
        assert!(matches!(err, GeometryError::IndexOutOfRange { index: 4, vertex_count: 4, .. }));
    }

    /// Claims a fourth float that the 12-byte record does not hold.
    #[repr(C)]
    #[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct OverreachingVertex {
        position: [f32; 3],
    }

    impl VertexRecord for OverreachingVertex {
        fn layout() -> Result<VertexLayout, GeometryError> {
            describe_layout(&[AttributeSpec { index: 0, components: 4, stride: 12, offset: 0 }])
        }
    }

    #[test]
    fn rejects_record_with_invalid_layout_without_touching_device() {
        let mut device = HeadlessDevice::new();
        let vertices = [OverreachingVertex { position: [0.0; 3] }; 3];

        let err = upload_mesh(&mut device, "bad", &vertices, None).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidLayout(_)));
        assert_eq!(device.buffer_count(), 0);
    }
}
