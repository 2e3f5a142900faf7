//! release-matrix CLI - builds and publishes firmware for every board

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use release_matrix::util::Shell;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns the process exit code.
fn run() -> Result<i32> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("release_matrix=debug")
    } else {
        EnvFilter::new("release_matrix=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Plan(args) => commands::plan::execute(args, &shell).map(|()| 0),
        Commands::Clean(args) => commands::clean::execute(args, &shell).map(|()| 0),
        Commands::Completions(args) => commands::completions::execute(args).map(|()| 0),
    }
}
