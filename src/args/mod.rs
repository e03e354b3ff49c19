//! Argument handling pipeline.
//!
//! ```text
//! User Input → Classify → Parse wrapper flags → Invocation → SpawnParams
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod classifier;
mod pipeline;
mod registry;

pub use classifier::{classify, ClassifiedArg};
pub use pipeline::{build_spawn_params, parse_invocation, Invocation, LaunchMode, SpawnParams};
pub use registry::{flag_registry, FlagBehavior, FlagDef, Shortcut};
