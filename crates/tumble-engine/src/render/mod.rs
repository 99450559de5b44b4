//! Frame renderer.
//!
//! A [`RenderableObject`] ties one mesh to one linked program. Rendering a
//! frame uploads the current matrices, binds, clears, draws, and presents.

mod frame;
mod object;

pub use frame::{render_frame, DEFAULT_CLEAR_COLOR};
pub use object::RenderableObject;
