//! Threadworks CLI - build and clean the threads demo programs

use anyhow::Result;
use clap::Parser;

use threadworks::util::logging;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let shell = cli.global.shell();
    logging::init(&shell);

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &cli.global, &shell),
        Commands::Clean(args) => commands::clean::execute(args, &cli.global, &shell),
    }
}
