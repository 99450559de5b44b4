//! Geometry store: vertex records, layouts, and static GPU meshes.
//!
//! Each vertex record type publishes the layout of its own bytes, so a mesh
//! and the layout bound onto its buffer always come from the same schema.

mod error;
mod layout;
mod mesh;
pub mod presets;
mod vertex;

pub use error::GeometryError;
pub use layout::{describe_layout, AttributeSpec, VertexAttribute, VertexLayout};
pub use mesh::{upload_mesh, IndexBuffer, Mesh};
pub use vertex::{ColoredVertex, PositionVertex, VertexRecord};
