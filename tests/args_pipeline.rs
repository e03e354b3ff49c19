//! Integration tests for the args pipeline module.

mod common;

use std::path::PathBuf;

use anton::args::{
    build_spawn_params, classify, flag_registry, parse_invocation, ClassifiedArg, LaunchMode,
    Shortcut,
};

use common::raw_args;

// =============================================================================
// CLASSIFIER TESTS
// =============================================================================

#[test]
fn classify_separates_owned_shortcut_and_passthrough() {
    let args = raw_args(&["--skip-intro", "-v", "--model", "opus"]);
    let result = classify(&args, &flag_registry());

    assert_eq!(
        result,
        vec![
            ClassifiedArg::WrapperOwned("--skip-intro".into()),
            ClassifiedArg::Shortcut {
                flag: "-v".into(),
                kind: Shortcut::Version
            },
            ClassifiedArg::Passthrough("--model".into()),
            ClassifiedArg::Passthrough("opus".into()),
        ]
    );
}

#[test]
fn classify_stops_after_double_dash() {
    let args = raw_args(&["--", "--skip-intro", "--help"]);
    let result = classify(&args, &flag_registry());

    assert!(result
        .iter()
        .all(|arg| matches!(arg, ClassifiedArg::Passthrough(_))));
    assert_eq!(result.len(), 3);
}

// =============================================================================
// INVOCATION TESTS
// =============================================================================

#[test]
fn no_args_runs_a_full_session() {
    let invocation = parse_invocation(&[]);
    assert_eq!(invocation.mode, LaunchMode::Session { skip_intro: false });
    assert!(invocation.forwarded.is_empty());
}

#[test]
fn skip_intro_is_consumed() {
    let invocation = parse_invocation(&raw_args(&["--skip-intro", "-p", "hi"]));
    assert_eq!(invocation.mode, LaunchMode::Session { skip_intro: true });
    assert_eq!(invocation.forwarded, raw_args(&["-p", "hi"]));
}

#[test]
fn version_flags_select_version_mode() {
    for flag in ["--version", "-v"] {
        let invocation = parse_invocation(&raw_args(&[flag]));
        assert_eq!(invocation.mode, LaunchMode::Version, "flag {}", flag);
        assert_eq!(invocation.forwarded, raw_args(&[flag]));
    }
}

#[test]
fn help_flags_select_help_mode() {
    for flag in ["--help", "-h"] {
        let invocation = parse_invocation(&raw_args(&[flag]));
        assert_eq!(invocation.mode, LaunchMode::Help, "flag {}", flag);
    }
}

#[test]
fn version_wins_over_help() {
    let invocation = parse_invocation(&raw_args(&["--help", "--version"]));
    assert_eq!(invocation.mode, LaunchMode::Version);
    let invocation = parse_invocation(&raw_args(&["-v", "-h"]));
    assert_eq!(invocation.mode, LaunchMode::Version);
}

#[test]
fn forwarded_order_is_preserved() {
    let invocation = parse_invocation(&raw_args(&[
        "--resume",
        "--skip-intro",
        "abc",
        "--verbose",
    ]));
    assert_eq!(invocation.forwarded, raw_args(&["--resume", "abc", "--verbose"]));
}

// =============================================================================
// SPAWN PARAMS TESTS
// =============================================================================

#[test]
fn personality_goes_in_front_of_user_args() {
    let forwarded = raw_args(&["-p", "hello"]);
    let params = build_spawn_params(PathBuf::from("/usr/bin/claude"), &forwarded, Some("be Anton"));

    assert_eq!(params.command, PathBuf::from("/usr/bin/claude"));
    assert_eq!(
        params.args,
        raw_args(&["--append-system-prompt", "be Anton", "-p", "hello"])
    );
}

#[test]
fn without_personality_args_are_forwarded_unchanged() {
    let forwarded = raw_args(&["--model", "opus"]);
    let params = build_spawn_params(PathBuf::from("claude"), &forwarded, None);
    assert_eq!(params.args, forwarded);
}

#[test]
fn spawn_env_sets_a_color_terminal() {
    let params = build_spawn_params(PathBuf::from("claude"), &[], None);
    assert!(params
        .env
        .iter()
        .any(|(key, value)| key == "TERM" && value == "xterm-256color"));
}
