mod completions;
mod generate;
mod new;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use new::NewCommand;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for kitgen_core::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "kit")]
#[command(version)]
#[command(about = "Scaffold Go services and register them in docker-compose")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Project root holding the service directories
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Path to kit.toml (defaults to <root>/kit.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::New(cmd) => cmd.run(&self.global),
            Commands::Generate(cmd) => cmd.run(&self.global),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create something new
    New(NewCommand),

    /// Regenerate project-level files
    Generate(GenerateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
