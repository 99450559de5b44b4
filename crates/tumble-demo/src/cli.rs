use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tumble_engine::scene::{SceneVariant, ShaderSources};

pub const USAGE: &str = "usage: tumble-demo [triangle|quad] [--vertex PATH --fragment PATH]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub variant: SceneVariant,
    pub shaders: ShaderSources,
}

/// Parses everything after the program name.
pub fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut variant = None;
    let mut vertex: Option<PathBuf> = None;
    let mut fragment: Option<PathBuf> = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--vertex" => {
                let path = args.next().context("--vertex needs a path")?;
                vertex = Some(path.into());
            }
            "--fragment" => {
                let path = args.next().context("--fragment needs a path")?;
                fragment = Some(path.into());
            }
            flag if flag.starts_with('-') => bail!("unknown option `{flag}`"),
            name => {
                if variant.is_some() {
                    bail!("unexpected argument `{name}`");
                }
                variant = Some(name.parse::<SceneVariant>()?);
            }
        }
    }

    let shaders = match (vertex, fragment) {
        (None, None) => ShaderSources::Builtin,
        (Some(vertex), Some(fragment)) => ShaderSources::Files { vertex, fragment },
        _ => bail!("--vertex and --fragment must be given together"),
    };

    Ok(Args {
        variant: variant.unwrap_or_default(),
        shaders,
    })
}
