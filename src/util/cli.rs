//! Command-line arguments shared by the `build` and `clean` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::ops::FailurePolicy;
use crate::platform::Platform;
use crate::util::shell::{ColorChoice, Shell};
use crate::util::GlobalContext;

/// Output format for status and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageFormat {
    #[default]
    Human,
    Json,
}

/// Flags accepted by both commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Use this platform's code path instead of detecting the host
    #[arg(long, global = true, value_parser = parse_platform, env = "THREADWORKS_PLATFORM")]
    pub platform: Option<Platform>,

    /// Print the invocations without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// What to do with failed invocations: ignore, report
    #[arg(long, global = true, value_parser = parse_policy)]
    pub failure_policy: Option<FailurePolicy>,
}

impl GlobalArgs {
    /// Build the output shell these flags ask for.
    pub fn shell(&self) -> Shell {
        Shell::from_flags(
            self.quiet,
            self.verbose,
            self.color,
            self.message_format == MessageFormat::Json,
        )
    }

    /// Resolve the working directory, platform and configuration.
    pub fn context(&self) -> Result<GlobalContext> {
        match &self.directory {
            Some(dir) => {
                let dir = dir
                    .canonicalize()
                    .with_context(|| format!("failed to resolve directory: {}", dir.display()))?;
                Ok(GlobalContext::with_cwd(dir, self.platform))
            }
            None => {
                let cwd = std::env::current_dir().context("failed to get current directory")?;
                Ok(GlobalContext::with_cwd(cwd, self.platform))
            }
        }
    }
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse().map_err(|e: crate::util::Error| e.to_string())
}

fn parse_policy(s: &str) -> Result<FailurePolicy, String> {
    s.parse().map_err(|e: crate::util::Error| e.to_string())
}
