use std::path::{Path, PathBuf};

use crate::error::LaunchError;

/// Resolve the wrapped binary to an executable path.
///
/// Bare names are searched on `PATH`; anything containing a path
/// separator is checked in place.
pub fn resolve_executable(binary: &str) -> Result<PathBuf, LaunchError> {
    match which::which(binary) {
        Ok(path) => Ok(path),
        Err(err) => {
            tracing::debug!(binary, "Executable lookup failed: {}", err);
            let path = Path::new(binary);
            if path.components().count() > 1 && path.exists() {
                Err(LaunchError::NotExecutable {
                    path: path.to_path_buf(),
                })
            } else {
                Err(LaunchError::NotFound {
                    binary: binary.to_string(),
                })
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn finds_sh_on_path() {
        let path = resolve_executable("sh").unwrap();
        assert!(path.is_absolute());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = resolve_executable("anton-definitely-not-installed").unwrap_err();
        assert!(matches!(err, LaunchError::NotFound { .. }));
    }

    #[test]
    fn plain_file_is_not_executable() {
        let file = NamedTempFile::new().unwrap();
        let err = resolve_executable(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LaunchError::NotExecutable { .. }));
    }
}
