//! Argument classifier: raw args into classified args.

use crate::args::registry::{FlagBehavior, FlagDef, Shortcut};

/// A classified argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedArg {
    /// Wrapper-owned flag, handed to clap and never forwarded.
    WrapperOwned(String),
    /// Protocol shortcut. Still forwarded, the child may need it.
    Shortcut { flag: String, kind: Shortcut },
    /// Anything else: forwarded verbatim.
    Passthrough(String),
}

/// Classify raw args against the registry.
///
/// Everything after a literal `--` is passed through without inspection.
pub fn classify(raw_args: &[String], registry: &[FlagDef]) -> Vec<ClassifiedArg> {
    let mut args = Vec::with_capacity(raw_args.len());
    let mut iter = raw_args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            args.push(ClassifiedArg::Passthrough(arg.clone()));
            args.extend(iter.by_ref().cloned().map(ClassifiedArg::Passthrough));
            break;
        }

        let def = arg
            .starts_with('-')
            .then(|| registry.iter().find(|d| d.matches(arg)))
            .flatten();

        let classified = match def.map(|d| d.behavior) {
            Some(FlagBehavior::WrapperOwned) => ClassifiedArg::WrapperOwned(arg.clone()),
            Some(FlagBehavior::Shortcut(kind)) => ClassifiedArg::Shortcut {
                flag: arg.clone(),
                kind,
            },
            None => ClassifiedArg::Passthrough(arg.clone()),
        };
        args.push(classified);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::registry::flag_registry;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_flags_and_positionals_pass_through() {
        let classified = classify(&strings(&["--model", "opus", "fix it"]), &flag_registry());
        assert_eq!(
            classified,
            vec![
                ClassifiedArg::Passthrough("--model".into()),
                ClassifiedArg::Passthrough("opus".into()),
                ClassifiedArg::Passthrough("fix it".into()),
            ]
        );
    }

    #[test]
    fn wrapper_flag_is_recognized_anywhere() {
        let classified = classify(&strings(&["--model", "opus", "--skip-intro"]), &flag_registry());
        assert_eq!(
            classified[2],
            ClassifiedArg::WrapperOwned("--skip-intro".into())
        );
    }

    #[test]
    fn short_shortcut_is_recognized() {
        let classified = classify(&strings(&["-h"]), &flag_registry());
        assert_eq!(
            classified,
            vec![ClassifiedArg::Shortcut {
                flag: "-h".into(),
                kind: Shortcut::Help
            }]
        );
    }

    #[test]
    fn double_dash_stops_classification() {
        let classified = classify(&strings(&["--", "--version", "--skip-intro"]), &flag_registry());
        assert!(classified
            .iter()
            .all(|arg| matches!(arg, ClassifiedArg::Passthrough(_))));
        assert_eq!(classified.len(), 3);
    }
}
