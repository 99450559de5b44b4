use thiserror::Error;

use crate::assets::AssetError;
use crate::geometry::GeometryError;
use crate::shader::ShaderError;
use crate::transform::TransformError;

/// Anything that can stop [`initialize`](super::initialize).
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}
