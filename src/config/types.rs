use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Root configuration container.
///
/// Every section is optional in the file; missing keys fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    pub agent: AgentConfig,
    pub assets: AssetPaths,
    pub readiness: ReadinessConfig,
    pub animation: AnimationConfig,
    pub branding: BrandingConfig,
}

/// The wrapped program and how it is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Binary name or path. `CLAUDE_BIN` overrides this.
    pub binary: String,
    /// Prepend `--append-system-prompt <personality>` to the forwarded args.
    pub inject_personality: bool,
    /// Also ask the binary for its model ID when building the banner.
    pub probe_model: bool,
    /// Upper bound for each probe invocation, in milliseconds.
    pub probe_timeout_ms: u64,
}

/// Optional overrides for the static text assets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub logo: Option<PathBuf>,
    pub personality: Option<PathBuf>,
    pub dialogue_cache: Option<PathBuf>,
}

/// Readiness detection knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Separator glyph sequence printed right above the prompt.
    pub separator: String,
    /// Prompt marker expected somewhere after the separator.
    pub prompt_marker: String,
    pub poll_interval_ms: u64,
    /// Absolute ceiling before readiness is declared unconditionally.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Skip the scripted intro (same as `--skip-intro`).
    pub skip: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Rewrite brand strings in the child's output during passthrough.
    pub patch_output: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            binary: "claude".to_string(),
            inject_personality: true,
            probe_model: true,
            probe_timeout_ms: 5000,
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            separator: "────────".to_string(),
            prompt_marker: ">".to_string(),
            poll_interval_ms: 50,
            timeout_ms: 3000,
        }
    }
}

impl AgentConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl AssetPaths {
    /// Where the dialogue cache lives when no explicit path is configured.
    pub fn dialogue_cache_path(&self) -> PathBuf {
        self.dialogue_cache.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("anton")
                .join("dialogues-cache.json")
        })
    }
}
