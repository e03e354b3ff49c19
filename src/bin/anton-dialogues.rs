//! Fill the dialogue cache by asking the wrapped binary for lines.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use anton::assets::generate::extend_cache;
use anton::config::WrapperConfig;
use anton::logging::init_tracing;
use anton::pty::resolve_executable;

#[derive(Debug, Parser)]
#[command(name = "anton-dialogues", about = "Generate intro dialogues for Son of Anton")]
struct Cli {
    /// How many dialogues to add.
    #[arg(default_value_t = 10)]
    count: usize,

    /// Cache file to extend (defaults to the configured cache).
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

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
    let code = runtime.block_on(run(cli));
    drop(runtime);
    process::exit(code);
}

async fn run(cli: Cli) -> i32 {
    let config = WrapperConfig::load();
    let binary = match resolve_executable(&config.agent.binary) {
        Ok(binary) => binary,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return 1;
        }
    };
    let cache = cli
        .cache
        .unwrap_or_else(|| config.assets.dialogue_cache_path());

    println!(
        "Generating {} dialogues with {} into {}",
        cli.count,
        binary.display(),
        cache.display()
    );
    match extend_cache(&cache, &binary, cli.count, &mut rand::thread_rng()).await {
        Ok(total) => {
            println!("Cache now holds {} dialogues", total);
            0
        }
        Err(err) => {
            eprintln!("Failed to extend {}: {}", cache.display(), err);
            1
        }
    }
}
