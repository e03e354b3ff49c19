//! Config file loading and how it feeds a session.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anton::args::build_spawn_params;
use anton::config::WrapperConfig;
use anton::session::SessionConfig;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"
[agent]
binary = "/opt/claude/bin/claude"
inject_personality = false
probe_model = false
probe_timeout_ms = 1200

[assets]
dialogue_cache = "/tmp/anton-test-cache.json"

[readiness]
separator = "===="
prompt_marker = "$"
poll_interval_ms = 20
timeout_ms = 900

[animation]
skip = true

[branding]
patch_output = true
"#;

fn load(content: &str) -> WrapperConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    WrapperConfig::load_from(file.path()).unwrap()
}

#[test]
fn full_file_is_parsed() {
    let config = load(FULL_CONFIG);

    assert_eq!(config.agent.binary, "/opt/claude/bin/claude");
    assert!(!config.agent.inject_personality);
    assert!(!config.agent.probe_model);
    assert_eq!(config.agent.probe_timeout(), Duration::from_millis(1200));
    assert_eq!(
        config.assets.dialogue_cache_path(),
        PathBuf::from("/tmp/anton-test-cache.json")
    );
    assert_eq!(config.readiness.separator, "====");
    assert_eq!(config.readiness.prompt_marker, "$");
    assert!(config.animation.skip);
    assert!(config.branding.patch_output);
}

#[test]
fn unknown_keys_are_tolerated() {
    let config = load("[agent]\nbinary = \"claude-dev\"\nfuture_option = 3\n");
    assert_eq!(config.agent.binary, "claude-dev");
}

#[test]
fn session_config_follows_the_file() {
    let config = load(FULL_CONFIG);
    let spawn = build_spawn_params(PathBuf::from("/opt/claude/bin/claude"), &[], None);

    let session = SessionConfig::from_config(&config, spawn, PathBuf::from("/work"), false);

    // animation.skip forces the intro off even without --skip-intro
    assert!(session.skip_intro);
    assert!(session.patch_output);
    assert_eq!(session.cwd, PathBuf::from("/work"));
    assert_eq!(session.readiness.separator, b"====".to_vec());
    assert_eq!(session.readiness.prompt_marker, b"$".to_vec());
    assert_eq!(session.readiness.poll_interval, Duration::from_millis(20));
    assert_eq!(session.readiness.timeout, Duration::from_millis(900));

    let probe = session.probe.expect("probe request");
    assert!(!probe.include_model);
    assert_eq!(probe.timeout, Duration::from_millis(1200));
    assert_eq!(probe.binary, PathBuf::from("/opt/claude/bin/claude"));
}

#[test]
fn default_session_keeps_the_intro() {
    let config = WrapperConfig::default();
    let spawn = build_spawn_params(PathBuf::from("claude"), &[], None);

    let session = SessionConfig::from_config(&config, spawn, PathBuf::from("."), false);

    assert!(!session.skip_intro);
    assert!(!session.patch_output);
    assert_eq!(session.readiness.timeout, Duration::from_millis(3000));
    assert_eq!(session.readiness.poll_interval, Duration::from_millis(50));
}
