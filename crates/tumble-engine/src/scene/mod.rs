//! One-time scene setup: shaders, geometry, and transforms for the chosen
//! [`SceneVariant`], bundled into the [`RenderState`] the frame loop owns.

mod config;
mod error;
mod state;

pub use config::{SceneConfig, SceneVariant, ShaderSources, UnknownVariant};
pub use error::InitError;
pub use state::{initialize, RenderState};
