//! Version and model probes against the wrapped binary.
//!
//! Probes run in the background while the intro plays. A failed probe
//! never blocks anything: the placeholder text is used instead.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::assets::{version_line, LogoTemplate};
use crate::error::VersionProbeError;

pub const UNKNOWN_VERSION: &str = "Unknown";
pub const UNKNOWN_MODEL: &str = "Unknown Model";
const MODEL_PROMPT: &str = "output only your exact model ID, nothing else";

/// What to ask the wrapped binary.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub binary: PathBuf,
    pub include_model: bool,
    pub timeout: Duration,
}

/// Run `binary args...` and return its trimmed output.
///
/// Stdout is preferred; stderr is used when stdout is empty.
pub async fn run_probe(
    binary: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<String, VersionProbeError> {
    let child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();
    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| VersionProbeError::Timeout(timeout))??;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let text = if stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).trim().to_string()
    } else {
        stdout
    };

    if !output.status.success() {
        return Err(VersionProbeError::Failed(output.status.code().unwrap_or(-1)));
    }
    if text.is_empty() {
        return Err(VersionProbeError::EmptyOutput);
    }
    Ok(text)
}

/// Probe version (and optionally model) concurrently and format the line.
pub async fn probe_version_line(request: &ProbeRequest) -> String {
    let version = run_probe(&request.binary, &["--version"], request.timeout);
    let model = async {
        if request.include_model {
            run_probe(&request.binary, &["-p", MODEL_PROMPT], request.timeout).await
        } else {
            Err(VersionProbeError::EmptyOutput)
        }
    };
    let (version, model) = tokio::join!(version, model);

    let version = version.unwrap_or_else(|err| {
        tracing::warn!("Version probe failed: {}", err);
        UNKNOWN_VERSION.to_string()
    });
    let model = model.unwrap_or_else(|err| {
        if request.include_model {
            tracing::warn!("Model probe failed: {}", err);
        }
        UNKNOWN_MODEL.to_string()
    });
    version_line(&version, &model)
}

/// Probe and render the final banner from the template.
pub async fn resolve_banner(template: LogoTemplate, request: ProbeRequest) -> String {
    let line = probe_version_line(&request).await;
    template.render(&line)
}

/// Banner for the `--version`/`--help` shortcuts: version only, no model.
pub async fn resolve_version_banner(template: &LogoTemplate, request: &ProbeRequest) -> String {
    let version = run_probe(&request.binary, &["--version"], request.timeout)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!("Version probe failed: {}", err);
            UNKNOWN_VERSION.to_string()
        });
    template.render(&version)
}
