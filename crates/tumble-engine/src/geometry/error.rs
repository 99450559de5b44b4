use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("mesh `{label}` has no vertices")]
    EmptyMesh { label: String },

    #[error("mesh `{label}` has {count} elements, which is not a whole number of triangles")]
    PartialTriangle { label: String, count: usize },

    #[error("mesh `{label}` index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { label: String, index: u32, vertex_count: u32 },

    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),

    #[error("vertex input at location {location} does not match the layout: {reason}")]
    LayoutMismatch { location: u32, reason: String },
}
