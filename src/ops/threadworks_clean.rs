//! Implementation of `clean`.
//!
//! One removal request per artifact pattern, in the platform's fixed order.
//! How a request is carried out is up to the [`Remover`]:
//! - [`ShellRemover`] (default) hands the pattern to the platform's removal
//!   utility through its shell, which does the expansion.
//! - [`NativeRemover`] matches file names in the working directory
//!   in-process and deletes the matches.
//!
//! Matching nothing is success either way.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::toolchain::CommandSpec;
use crate::core::artifact::{cleanup_patterns, uncovered_executables, ArtifactPattern};
use crate::platform::Platform;
use crate::util::config::Config;
use crate::util::errors::Error;
use crate::util::fs::remove_matching;
use crate::util::process::{CommandRunner, InvocationStatus};
use crate::util::shell::Status;

use super::{finish, run_invocation, skip_platform, FailurePolicy, OpsContext, OrchestrationReport};

/// How removal requests are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalBackend {
    /// Delegate to `rm` / `del` through the platform shell
    #[default]
    Shell,
    /// Match and delete in-process
    Native,
}

impl RemovalBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalBackend::Native => "native",
            RemovalBackend::Shell => "shell",
        }
    }
}

impl fmt::Display for RemovalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" => Ok(RemovalBackend::Native),
            "shell" => Ok(RemovalBackend::Shell),
            _ => Err(Error::UnknownRemovalBackend(s.to_string())),
        }
    }
}

/// Carries out one removal request.
pub trait Remover: Send + Sync {
    /// The external command this remover would run, if it runs one.
    fn command(&self, pattern: &ArtifactPattern) -> Option<CommandSpec>;

    /// Remove files matching `pattern` in `cwd`.
    fn remove(&self, pattern: &ArtifactPattern, cwd: &Path) -> Result<InvocationStatus>;
}

/// Removes matches with the `glob` crate and `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRemover;

impl Remover for NativeRemover {
    fn command(&self, _pattern: &ArtifactPattern) -> Option<CommandSpec> {
        None
    }

    fn remove(&self, pattern: &ArtifactPattern, cwd: &Path) -> Result<InvocationStatus> {
        let removed = remove_matching(cwd, pattern.as_str())?;
        tracing::debug!("`{}`: removed {} file(s)", pattern, removed);
        Ok(InvocationStatus::success())
    }
}

/// Delegates each request to the platform removal utility.
pub struct ShellRemover<'a> {
    platform: Platform,
    runner: &'a dyn CommandRunner,
}

impl<'a> ShellRemover<'a> {
    pub fn new(platform: Platform, runner: &'a dyn CommandRunner) -> Self {
        ShellRemover { platform, runner }
    }
}

impl Remover for ShellRemover<'_> {
    fn command(&self, pattern: &ArtifactPattern) -> Option<CommandSpec> {
        removal_command(self.platform, pattern)
    }

    fn remove(&self, pattern: &ArtifactPattern, cwd: &Path) -> Result<InvocationStatus> {
        match removal_command(self.platform, pattern) {
            Some(cmd) => self.runner.run(&cmd, cwd),
            // No removal utility known; nothing to remove with
            None => Ok(InvocationStatus::success()),
        }
    }
}

/// The removal-utility command for one pattern.
///
/// The pattern travels as its own argument. On Linux the shell expands it
/// (`$1` is deliberately unquoted) and `rm -f` tolerates no match; on
/// Windows `del` expands wildcards itself.
pub fn removal_command(platform: Platform, pattern: &ArtifactPattern) -> Option<CommandSpec> {
    match platform {
        Platform::Linux => Some(
            CommandSpec::new("sh")
                .args(["-c", "rm -f -- $1", "sh"])
                .arg(pattern.as_str()),
        ),
        Platform::Windows => Some(
            CommandSpec::new("cmd")
                .args(["/C", "del", "/Q", "/F"])
                .arg(pattern.as_str()),
        ),
        Platform::Unrecognized => None,
    }
}

/// Build the remover for a backend.
pub fn remover_for<'a>(
    backend: RemovalBackend,
    platform: Platform,
    runner: &'a dyn CommandRunner,
) -> Box<dyn Remover + 'a> {
    match backend {
        RemovalBackend::Native => Box::new(NativeRemover),
        RemovalBackend::Shell => Box::new(ShellRemover::new(platform, runner)),
    }
}

/// Options for the clean command.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Print the removal requests without carrying them out
    pub dry_run: bool,

    /// What to do with failed removal requests
    pub policy: FailurePolicy,

    /// How removal requests are carried out
    pub backend: RemovalBackend,
}

impl CleanOptions {
    /// Options as configured, before command-line overrides.
    pub fn from_config(config: &Config) -> Self {
        CleanOptions {
            dry_run: false,
            policy: config.clean.failure_policy.unwrap_or_default(),
            backend: config.clean.removal.unwrap_or_default(),
        }
    }
}

/// Remove build artifacts for the context's platform.
///
/// Never fails; apply [`OrchestrationReport::check`] to honor the policy.
pub fn clean(ctx: &OpsContext<'_>, remover: &dyn Remover, opts: &CleanOptions) -> OrchestrationReport {
    let start = Instant::now();
    let patterns = cleanup_patterns(ctx.platform);

    if patterns.is_empty() {
        skip_platform(ctx, "clean");
        return finish(ctx, "clean", opts.policy, Vec::new(), start);
    }

    let uncovered = uncovered_executables(ctx.platform);
    if !uncovered.is_empty() {
        ctx.shell.warn(format!(
            "no cleanup pattern for {} matches the built executable(s) {}; they are left in place",
            ctx.platform,
            uncovered.join(", ")
        ));
    }

    let records = patterns
        .iter()
        .map(|pattern| {
            run_invocation(
                ctx,
                "clean",
                Status::Removing,
                pattern.to_string(),
                remover.command(pattern),
                opts.dry_run,
                || remover.remove(pattern, ctx.cwd),
            )
        })
        .collect();

    finish(ctx, "clean", opts.policy, records, start)
}
