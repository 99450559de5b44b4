use super::GeometryError;

const FLOAT_SIZE: u32 = std::mem::size_of::<f32>() as u32;

/// One attribute as described by a caller: `(index, component count, stride,
/// byte offset)`. All components are `f32`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeSpec {
    pub index: u32,
    pub components: u32,
    pub stride: u32,
    pub offset: u32,
}

/// A validated attribute within a [`VertexLayout`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub index: u32,
    /// Number of `f32` components, `1..=4`.
    pub components: u32,
    /// Byte offset within one vertex record.
    pub offset: u32,
}

impl VertexAttribute {
    #[inline]
    pub fn size(&self) -> u32 {
        self.components * FLOAT_SIZE
    }

    pub fn format(&self) -> wgpu::VertexFormat {
        match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// Interleaved attribute layout of a single vertex buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    pub stride: u32,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn attribute(&self, index: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.index == index)
    }
}

/// Validates attribute specs for one interleaved buffer.
///
/// Every spec must share the same stride and fit inside it. Checks stop at the
/// record boundary: whether the buffer really holds records of that shape is
/// guaranteed by [`VertexRecord`](super::VertexRecord), not here.
pub fn describe_layout(specs: &[AttributeSpec]) -> Result<VertexLayout, GeometryError> {
    let Some(first) = specs.first() else {
        return Err(GeometryError::InvalidLayout("no attributes".into()));
    };
    let stride = first.stride;
    if stride == 0 || stride % FLOAT_SIZE != 0 {
        return Err(GeometryError::InvalidLayout(format!(
            "stride {stride} is not a positive multiple of {FLOAT_SIZE}"
        )));
    }

    let mut attributes: Vec<VertexAttribute> = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.stride != stride {
            return Err(GeometryError::InvalidLayout(format!(
                "attribute {} has stride {}, expected {stride}",
                spec.index, spec.stride
            )));
        }
        if !(1..=4).contains(&spec.components) {
            return Err(GeometryError::InvalidLayout(format!(
                "attribute {} has {} components",
                spec.index, spec.components
            )));
        }
        if spec.offset % FLOAT_SIZE != 0 {
            return Err(GeometryError::InvalidLayout(format!(
                "attribute {} offset {} is not {FLOAT_SIZE}-byte aligned",
                spec.index, spec.offset
            )));
        }
        if attributes.iter().any(|a| a.index == spec.index) {
            return Err(GeometryError::InvalidLayout(format!(
                "attribute index {} is used twice",
                spec.index
            )));
        }

        let attr = VertexAttribute {
            index: spec.index,
            components: spec.components,
            offset: spec.offset,
        };
        if attr.offset + attr.size() > stride {
            return Err(GeometryError::InvalidLayout(format!(
                "attribute {} ends at byte {}, past stride {stride}",
                attr.index,
                attr.offset + attr.size()
            )));
        }
        attributes.push(attr);
    }

    Ok(VertexLayout { stride, attributes })
}
