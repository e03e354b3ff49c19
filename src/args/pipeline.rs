//! Turns the raw command line into a launch mode and spawn parameters.

use std::path::PathBuf;

use clap::Parser;

use crate::args::classifier::{classify, ClassifiedArg};
use crate::args::registry::{flag_registry, Shortcut};

/// Flags owned by the wrapper itself, parsed with clap once the
/// classifier has pulled them out of the raw argument list.
#[derive(Debug, Default, Parser)]
#[command(name = "anton", disable_help_flag = true, disable_version_flag = true)]
struct WrapperFlags {
    /// Skip the scripted intro but keep the branded banner.
    #[arg(long)]
    skip_intro: bool,
}

/// What the wrapper should do for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Full session protocol, optionally without the intro.
    Session { skip_intro: bool },
    /// Banner with version info, no child session.
    Version,
    /// Banner, then the child in direct passthrough.
    Help,
}

/// Result of processing the raw command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: LaunchMode,
    /// Arguments forwarded to the wrapped program, in original order.
    pub forwarded: Vec<String>,
}

/// Ready-to-use parameters for spawning the PTY process.
#[derive(Debug, Clone)]
pub struct SpawnParams {
    /// Resolved executable.
    pub command: PathBuf,
    /// CLI arguments for the command.
    pub args: Vec<String>,
    /// Environment variables added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

/// Process raw user arguments (without the program name).
pub fn parse_invocation(raw_args: &[String]) -> Invocation {
    let classified = classify(raw_args, &flag_registry());

    let mut owned = Vec::new();
    let mut shortcut = None;
    let mut forwarded = Vec::new();

    for arg in classified {
        match arg {
            ClassifiedArg::WrapperOwned(flag) => owned.push(flag),
            ClassifiedArg::Shortcut { flag, kind } => {
                // --version wins over --help, matching the order they are checked.
                shortcut = match (shortcut, kind) {
                    (Some(Shortcut::Version), _) => Some(Shortcut::Version),
                    (_, kind) => Some(kind),
                };
                forwarded.push(flag);
            }
            ClassifiedArg::Passthrough(arg) => forwarded.push(arg),
        }
    }

    let flags = WrapperFlags::try_parse_from(std::iter::once("anton".to_string()).chain(owned))
        .unwrap_or_else(|err| {
            tracing::warn!("Ignoring wrapper flags: {}", err);
            WrapperFlags::default()
        });

    let mode = match shortcut {
        Some(Shortcut::Version) => LaunchMode::Version,
        Some(Shortcut::Help) => LaunchMode::Help,
        None => LaunchMode::Session {
            skip_intro: flags.skip_intro,
        },
    };

    Invocation { mode, forwarded }
}

/// Build spawn parameters for the wrapped program.
///
/// The personality, when present, goes in front of the user's own
/// arguments as `--append-system-prompt <text>`.
pub fn build_spawn_params(
    command: PathBuf,
    forwarded: &[String],
    personality: Option<&str>,
) -> SpawnParams {
    let mut args = Vec::with_capacity(forwarded.len() + 2);
    if let Some(personality) = personality {
        args.push("--append-system-prompt".to_string());
        args.push(personality.to_string());
    }
    args.extend(forwarded.iter().cloned());

    SpawnParams {
        command,
        args,
        env: vec![("TERM".to_string(), "xterm-256color".to_string())],
    }
}
