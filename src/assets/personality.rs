use std::fs;
use std::path::Path;

use crate::error::AssetLoadError;

const BUILTIN_PERSONALITY: &str = include_str!("../../assets/personality.txt");

/// System-prompt text appended to the wrapped program's invocation.
pub fn load_personality(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return builtin_personality();
    };
    match read_personality(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("{}; using built-in personality", err);
            builtin_personality()
        }
    }
}

pub fn read_personality(path: &Path) -> Result<String, AssetLoadError> {
    let text = fs::read_to_string(path).map_err(|source| AssetLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(text.to_string())
}

fn builtin_personality() -> String {
    BUILTIN_PERSONALITY.trim().to_string()
}
