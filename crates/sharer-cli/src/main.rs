//! Tool Sharer CLI
//!
//! Publish, import, browse and like hosted HTML tools from the command line.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(&cli.global, cmd),
        None => {
            println!("{} Tool Sharer CLI", "sharer".green().bold());
            println!();
            println!("Run {} for available commands.", "sharer --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("verbose mode enabled");
}

fn execute_command(global: &cli::GlobalArgs, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Import { reference } => {
            commands::run_import(&Context::from_args(global)?, &reference)
        }
        Commands::Publish { prompt, code, file } => commands::run_publish(
            &Context::from_args(global)?,
            &prompt,
            code.as_deref(),
            file.as_deref(),
        ),
        Commands::View { id } => commands::run_view(&Context::from_args(global)?, &id),
        Commands::Gallery { search, sort, json } => {
            commands::run_gallery(&Context::from_args(global)?, &search, sort, json)
        }
        Commands::Like { id } => commands::run_like(&Context::from_args(global)?, &id),
        Commands::Encode { file, base } => commands::run_encode(&file, &base),
        Commands::Completions { shell } => {
            commands::run_completions(shell);
            Ok(())
        }
    }
}
