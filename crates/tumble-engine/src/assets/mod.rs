//! Text asset loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Missing file, unreadable file, or contents that are not UTF-8.
    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    pub fn path(&self) -> &Path {
        match self {
            AssetError::Io { path, .. } => path,
        }
    }
}

/// Reads a whole UTF-8 file.
///
/// Only the path and byte count are logged, never the contents.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tumble-assets-{}-{name}", std::process::id()))
    }

    #[test]
    fn reads_whole_file() {
        let path = temp_path("ok.wgsl");
        std::fs::write(&path, "@fragment fn fs_main() {}\n").unwrap();

        let text = read_text_file(&path).unwrap();
        assert_eq!(text, "@fragment fn fs_main() {}\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = temp_path("missing.wgsl");
        let err = read_text_file(&path).unwrap_err();

        assert_eq!(err.path(), path.as_path());
        let AssetError::Io { source, .. } = &err;
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let path = temp_path("binary.wgsl");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(read_text_file(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
