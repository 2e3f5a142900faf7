//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use release_matrix::util::shell::ColorChoice;

/// release-matrix - build and publish firmware images for every board and language
#[derive(Parser)]
#[command(name = "release-matrix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every board in every variant and publish the images
    Build(BuildArgs),

    /// Show the builds a release would run, without running them
    Plan(PlanArgs),

    /// Remove build directories of every supported port
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

/// Settings shared by every command that reads the catalog.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Board catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory holding one subdirectory per port
    #[arg(long)]
    pub ports_dir: Option<PathBuf>,

    /// Root of the published release tree
    #[arg(long)]
    pub release_root: Option<PathBuf>,

    /// Build tool to invoke
    #[arg(long)]
    pub tool: Option<String>,
}

/// Board and language selection.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Boards to build, overriding $BOARDS and the full catalog
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub boards: Option<Vec<String>>,

    /// Languages to build, overriding the catalog
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub languages: Option<Vec<String>>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Number of parallel jobs per build
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Use CI parallelism even when $GITHUB_ACTION is unset
    #[arg(long)]
    pub ci: bool,

    /// Keep existing build directories
    #[arg(long)]
    pub no_purge: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}
