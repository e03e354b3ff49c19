//! Flag registry: the handful of flags the wrapper cares about.
//!
//! Everything not listed here is forwarded to the wrapped program untouched.

/// How the wrapper handles a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagBehavior {
    /// Wrapper's own flag, consumed and never forwarded.
    WrapperOwned,
    /// Short-circuits the session protocol (`--version`, `--help`).
    Shortcut(Shortcut),
}

/// Flags that bypass the normal session protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Render the branded banner and exit.
    Version,
    /// Render the branded banner, then run the child in plain passthrough.
    Help,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Primary long form (e.g., "--skip-intro").
    pub long: &'static str,
    /// Optional short form (e.g., "-v").
    pub short: Option<&'static str>,
    /// How the wrapper handles it.
    pub behavior: FlagBehavior,
    /// Human-readable description.
    pub description: &'static str,
}

impl FlagDef {
    /// Check if an argument matches this flag (long or short form).
    pub fn matches(&self, arg: &str) -> bool {
        arg == self.long || self.short == Some(arg)
    }
}

/// Build the complete flag registry.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        FlagDef {
            long: "--skip-intro",
            short: None,
            behavior: FlagBehavior::WrapperOwned,
            description: "Skip the scripted intro but keep the branded banner",
        },
        FlagDef {
            long: "--version",
            short: Some("-v"),
            behavior: FlagBehavior::Shortcut(Shortcut::Version),
            description: "Show the branded banner with version info",
        },
        FlagDef {
            long: "--help",
            short: Some("-h"),
            behavior: FlagBehavior::Shortcut(Shortcut::Help),
            description: "Show the branded banner and the wrapped program's help",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_forms_match() {
        let registry = flag_registry();
        let version = registry.iter().find(|d| d.long == "--version").unwrap();
        assert!(version.matches("--version"));
        assert!(version.matches("-v"));
        assert!(!version.matches("--verbose"));
    }

    #[test]
    fn skip_intro_has_no_short_form() {
        let registry = flag_registry();
        let skip = registry.iter().find(|d| d.long == "--skip-intro").unwrap();
        assert_eq!(skip.short, None);
        assert_eq!(skip.behavior, FlagBehavior::WrapperOwned);
    }
}
