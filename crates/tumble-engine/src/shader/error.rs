use thiserror::Error;

use super::ShaderStage;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ShaderError {
    /// Parse or validation failure. `log` is the full rendered diagnostic.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compilation { stage: ShaderStage, log: String },

    /// The two stages do not fit together.
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// The compiler or linker diagnostic, verbatim.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compilation { log, .. } | ShaderError::Link { log } => log,
        }
    }
}
