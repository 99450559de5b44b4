use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::reflect::{self, ForeignBinding, ReflectedUniform, Varying};
use super::ShaderError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// A parsed and validated stage, plus the interface reflected from it.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: ShaderStage,
    source: String,
    entry_point: String,
    inputs: Vec<Varying>,
    outputs: Vec<Varying>,
    uniforms: Vec<ReflectedUniform>,
    foreign: Vec<ForeignBinding>,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// `@location` inputs of the entry point, ordered by location.
    pub fn inputs(&self) -> &[Varying] {
        &self.inputs
    }

    /// `@location` outputs of the entry point, ordered by location.
    pub fn outputs(&self) -> &[Varying] {
        &self.outputs
    }

    pub(super) fn uniforms(&self) -> &[ReflectedUniform] {
        &self.uniforms
    }

    pub(super) fn foreign_bindings(&self) -> &[ForeignBinding] {
        &self.foreign
    }
}

/// Parses and validates WGSL `source` as a `stage` shader.
///
/// The first entry point declared for `stage` is used. A module without one
/// is a compilation failure.
pub fn compile_stage(source: &str, stage: ShaderStage) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Compilation {
        stage,
        log: diagnostic(err.emit_to_string(source), &err),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Compilation {
            stage,
            log: diagnostic(err.emit_to_string(source), &err),
        })?;

    let Some(entry) = module.entry_points.iter().find(|ep| ep.stage == stage.to_naga()) else {
        return Err(ShaderError::Compilation {
            stage,
            log: format!("no @{stage} entry point in module"),
        });
    };

    log::debug!("compiled {stage} stage `{}`", entry.name);

    Ok(CompiledStage {
        stage,
        source: source.to_string(),
        entry_point: entry.name.clone(),
        inputs: reflect::inputs(&module, entry),
        outputs: reflect::outputs(&module, entry),
        uniforms: reflect::uniforms(&module),
        foreign: reflect::foreign_bindings(&module),
    })
}

/// Rendered diagnostics can come back empty when the error carries no span.
fn diagnostic(rendered: String, err: &dyn fmt::Display) -> String {
    if rendered.trim().is_empty() {
        err.to_string()
    } else {
        rendered
    }
}
