//! CloudTech Support - CLI entry point
//!
//! Runs the simulated support chat in the terminal, or headless with a
//! scripted conversation, and manages the configuration file.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    run_chat_command, run_config_init, run_config_path, run_config_validate,
    run_simulate_command, CommandError,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// CloudTech live support simulator
#[derive(Parser)]
#[command(name = "cloudtech-support")]
#[command(version, about = "Simulated CloudTech live support chat")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the cloudtech-support CLI
#[derive(Subcommand)]
enum Commands {
    /// Open a support chat in the terminal
    Chat {
        /// Seed for reply selection and delays
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a support session without a terminal and print the transcript
    Simulate {
        /// Seed for reply selection and delays
        #[arg(long)]
        seed: Option<u64>,

        /// Customer message to send once connected (repeatable, sent in order)
        #[arg(short, long = "message", value_name = "TEXT")]
        messages: Vec<String>,

        /// Print one JSON object per message instead of text lines
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Chat { seed } => block_on(run_chat_command(config, seed)),
        Commands::Simulate {
            seed,
            messages,
            json,
        } => block_on(run_simulate_command(config, seed, &messages, json)),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => run_config_init(config, force),
            ConfigAction::Path => {
                run_config_path();
                Ok(())
            }
            ConfigAction::Validate => run_config_validate(config),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs `future` to completion on a fresh multi-threaded runtime.
fn block_on<F>(future: F) -> Result<(), CommandError>
where
    F: std::future::Future<Output = Result<(), CommandError>>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(future)
}
