use std::io;
use std::path::PathBuf;
use std::process;

use anton::args::{build_spawn_params, flag_registry, parse_invocation, Invocation, LaunchMode};
use anton::assets::{load_personality, LogoTemplate};
use anton::config::WrapperConfig;
use anton::error::LaunchError;
use anton::logging::init_tracing;
use anton::probe::{resolve_version_banner, ProbeRequest};
use anton::pty::resolve_executable;
use anton::session::{write_banner, Orchestrator, SessionConfig, StdConsole};
use anton::terminal::connect_terminal;

fn main() {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start runtime: {}", err);
            process::exit(1);
        }
    };

    let code = runtime.block_on(run());
    // process::exit skips destructors; everything must be dropped by now.
    drop(runtime);
    process::exit(code);
}

async fn run() -> i32 {
    let config = WrapperConfig::load();
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_invocation(&raw_args);
    tracing::info!(
        mode = ?invocation.mode,
        forwarded = invocation.forwarded.len(),
        "Starting anton"
    );

    let command = match resolve_executable(&config.agent.binary) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return 1;
        }
    };

    match invocation.mode {
        LaunchMode::Version => {
            print_banner(&config, &command).await;
            0
        }
        LaunchMode::Help => {
            print_banner(&config, &command).await;
            print_wrapper_flags();
            run_session(&config, command, &invocation, true, true).await
        }
        LaunchMode::Session { skip_intro } => {
            run_session(&config, command, &invocation, skip_intro, false).await
        }
    }
}

async fn print_banner(config: &WrapperConfig, command: &PathBuf) {
    let logo = LogoTemplate::load(config.assets.logo.as_deref());
    let request = ProbeRequest {
        binary: command.clone(),
        include_model: false,
        timeout: config.agent.probe_timeout(),
    };
    let banner = resolve_version_banner(&logo, &request).await;
    if let Err(err) = write_banner(&mut io::stdout(), &banner) {
        tracing::warn!("Failed to print banner: {}", err);
    }
}

fn print_wrapper_flags() {
    println!("Son of Anton options (everything else goes to Claude Code):");
    for flag in flag_registry() {
        let name = match flag.short {
            Some(short) => format!("{}, {}", short, flag.long),
            None => format!("    {}", flag.long),
        };
        println!("  {:<18} {}", name, flag.description);
    }
    println!();
}

async fn run_session(
    config: &WrapperConfig,
    command: PathBuf,
    invocation: &Invocation,
    skip_intro: bool,
    direct: bool,
) -> i32 {
    let personality = config
        .agent
        .inject_personality
        .then(|| load_personality(config.assets.personality.as_deref()));
    let spawn = build_spawn_params(command, &invocation.forwarded, personality.as_deref());
    let cwd = std::env::current_dir().unwrap_or_else(|err| {
        tracing::warn!("Cannot read current directory: {}", err);
        PathBuf::from(".")
    });
    let session = SessionConfig::from_config(config, spawn, cwd, skip_intro);

    let guard = match connect_terminal() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to prepare the terminal: {}", err);
            return 1;
        }
    };

    let mut orchestrator = Orchestrator::new(session, StdConsole::new());
    let result = if direct {
        orchestrator.run_direct().await
    } else {
        orchestrator.run().await
    };
    drop(guard);

    match result {
        Ok(code) => {
            tracing::info!(code, "Session finished");
            code
        }
        Err(err) => {
            match err.downcast_ref::<LaunchError>() {
                Some(launch) => eprintln!("{}", launch.user_message()),
                None => eprintln!("anton: {:#}", err),
            }
            1
        }
    }
}
