//! Logo template loading and version substitution.

use std::fs;
use std::path::Path;

use crate::error::AssetLoadError;

/// Placeholder token replaced with the version line.
pub const VERSION_TOKEN: &str = "{VERSION}";
/// Inner width of the box the version line is centred in.
pub const VERSION_FIELD_WIDTH: usize = 60;
/// Shown while the version probe is still running.
pub const LOADING_TEXT: &str = "Loading...";

const BUILTIN_TEMPLATE: &str = include_str!("../../assets/logo.txt");

/// The logo template with a single `{VERSION}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoTemplate {
    text: String,
}

impl LogoTemplate {
    pub fn builtin() -> Self {
        Self {
            text: BUILTIN_TEMPLATE.to_string(),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a template from disk.
    pub fn read(path: &Path) -> Result<Self, AssetLoadError> {
        let text = fs::read_to_string(path).map_err(|source| AssetLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(AssetLoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { text })
    }

    /// Configured template, or the built-in one if it cannot be read.
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Self::read) {
            Some(Ok(template)) => template,
            Some(Err(err)) => {
                tracing::warn!("{}; using built-in logo", err);
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    /// Substitute the version line into the template.
    ///
    /// The text is centred in a [`VERSION_FIELD_WIDTH`] column field when
    /// it fits, otherwise inserted as-is. A template without the token is
    /// returned unchanged.
    pub fn render(&self, version_line: &str) -> String {
        if !self.text.contains(VERSION_TOKEN) {
            return self.text.clone();
        }
        self.text
            .replacen(VERSION_TOKEN, &center(version_line, VERSION_FIELD_WIDTH), 1)
    }
}

/// `"<version> (<model>)"`, the line placed in the banner.
pub fn version_line(version: &str, model: &str) -> String {
    format!("{} ({})", version, model)
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let total = width - len;
    let left = total / 2;
    let right = total - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
