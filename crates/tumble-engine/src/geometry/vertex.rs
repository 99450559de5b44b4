use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use super::{describe_layout, AttributeSpec, GeometryError, VertexLayout};

/// A plain-old-data vertex record that knows its own attribute layout.
pub trait VertexRecord: Pod {
    /// Layout of one record, validated through [`describe_layout`].
    fn layout() -> Result<VertexLayout, GeometryError>;
}

/// Position + per-vertex RGB color, 24 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColoredVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

impl VertexRecord for ColoredVertex {
    fn layout() -> Result<VertexLayout, GeometryError> {
        let stride = size_of::<Self>() as u32;
        describe_layout(&[
            AttributeSpec {
                index: 0,
                components: 3,
                stride,
                offset: offset_of!(Self, position) as u32,
            },
            AttributeSpec {
                index: 1,
                components: 3,
                stride,
                offset: offset_of!(Self, color) as u32,
            },
        ])
    }
}

/// Position only, 12 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    pub const fn new(position: [f32; 3]) -> Self {
        Self { position }
    }
}

impl VertexRecord for PositionVertex {
    fn layout() -> Result<VertexLayout, GeometryError> {
        describe_layout(&[AttributeSpec {
            index: 0,
            components: 3,
            stride: size_of::<Self>() as u32,
            offset: offset_of!(Self, position) as u32,
        }])
    }
}
