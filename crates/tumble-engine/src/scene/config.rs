use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::assets::{read_text_file, AssetError};
use crate::render::DEFAULT_CLEAR_COLOR;
use crate::shader::sources;
use crate::transform::CameraConfig;

/// Which primitive the demo draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SceneVariant {
    /// Per-vertex colored triangle, non-indexed.
    #[default]
    ColoredTriangle,
    /// Position-only quad from two indexed triangles, painted white.
    IndexedQuad,
}

impl SceneVariant {
    pub fn name(self) -> &'static str {
        match self {
            SceneVariant::ColoredTriangle => "triangle",
            SceneVariant::IndexedQuad => "quad",
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown scene `{0}` (expected `triangle` or `quad`)")]
pub struct UnknownVariant(pub String);

impl FromStr for SceneVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triangle" => Ok(SceneVariant::ColoredTriangle),
            "quad" => Ok(SceneVariant::IndexedQuad),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Where the WGSL for the two stages comes from.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum ShaderSources {
    /// The built-in stages matching the variant.
    #[default]
    Builtin,
    Files { vertex: PathBuf, fragment: PathBuf },
}

impl ShaderSources {
    /// Returns `(vertex, fragment)` source text.
    pub fn load(&self, variant: SceneVariant) -> Result<(String, String), AssetError> {
        match self {
            ShaderSources::Builtin => {
                let (vs, fs) = match variant {
                    SceneVariant::ColoredTriangle => {
                        (sources::COLORED_VERTEX, sources::COLORED_FRAGMENT)
                    }
                    SceneVariant::IndexedQuad => (sources::FLAT_VERTEX, sources::FLAT_FRAGMENT),
                };
                Ok((vs.to_string(), fs.to_string()))
            }
            ShaderSources::Files { vertex, fragment } => {
                Ok((read_text_file(vertex)?, read_text_file(fragment)?))
            }
        }
    }
}

/// Scene setup parameters.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub variant: SceneVariant,
    pub shaders: ShaderSources,
    pub camera: CameraConfig,
    pub clear_color: wgpu::Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::default(),
            shaders: ShaderSources::default(),
            camera: CameraConfig::default(),
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_names() {
        assert_eq!("triangle".parse(), Ok(SceneVariant::ColoredTriangle));
        assert_eq!("quad".parse(), Ok(SceneVariant::IndexedQuad));
        assert_eq!(
            "cube".parse::<SceneVariant>(),
            Err(UnknownVariant("cube".into()))
        );
    }

    #[test]
    fn name_round_trips_through_from_str() {
        for v in [SceneVariant::ColoredTriangle, SceneVariant::IndexedQuad] {
            assert_eq!(v.name().parse(), Ok(v));
        }
    }

    #[test]
    fn builtin_sources_follow_variant() {
        let (vs, fs) = ShaderSources::Builtin.load(SceneVariant::IndexedQuad).unwrap();
        assert_eq!(vs, sources::FLAT_VERTEX);
        assert_eq!(fs, sources::FLAT_FRAGMENT);
    }

    #[test]
    fn missing_shader_file_is_an_asset_error() {
        let shaders = ShaderSources::Files {
            vertex: "/nonexistent/tumble/shader.vert.wgsl".into(),
            fragment: "/nonexistent/tumble/shader.frag.wgsl".into(),
        };
        let err = shaders.load(SceneVariant::ColoredTriangle).unwrap_err();
        assert!(err.path().ends_with("shader.vert.wgsl"));
    }
}
