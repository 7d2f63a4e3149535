//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

use threadworks::ops::RemovalBackend;
use threadworks::util::cli::GlobalArgs;

/// Threadworks - build and clean the threads demo programs with the native toolchain
#[derive(Parser)]
#[command(name = "threadworks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the three demo executables
    Build(BuildArgs),

    /// Remove build artifacts
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Run the compiler invocations concurrently
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// How files are removed: shell, native
    #[arg(long, value_parser = parse_removal)]
    pub removal: Option<RemovalBackend>,
}

fn parse_removal(s: &str) -> Result<RemovalBackend, String> {
    s.parse().map_err(|e: threadworks::util::Error| e.to_string())
}
