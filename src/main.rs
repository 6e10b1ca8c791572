//! kudos - optimistic like-toggle engine demo driver
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kudos::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Run { config } => run_demo(config).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Run { config: None });
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "-c" | "--config" => {
            let path = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing config path"))?;
            Ok(Command::Run {
                config: Some(PathBuf::from(path)),
            })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'kudos --help' for usage"
        )),
    }
}

async fn run_demo(config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::default(),
    };
    kudos::demo::run(&config).await
}

fn print_help() {
    println!(
        r#"❤️  kudos - optimistic like-toggle engine

USAGE:
    kudos                              Run the demo feed session
    kudos [COMMAND]

COMMANDS:
    help                               Show this help
    version                            Show version

OPTIONS:
    -c, --config <path>                TOML config for the demo session
                                       (post_count, latency_ms, fail_every,
                                        toggle_rounds)

Set RUST_LOG=debug to watch flips, reconciliation, and rollbacks in the log."#
    );
}

fn print_version() {
    println!("kudos {}", kudos::VERSION);
}
