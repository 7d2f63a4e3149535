//! High-level operations.
//!
//! This module contains the implementation of the `build` and `clean`
//! commands, plus the invocation bookkeeping both share.
//!
//! Every external invocation produces an [`InvocationRecord`]. Neither
//! command ever stops early: the [`FailurePolicy`] only decides whether
//! failures turn into an error once everything has been attempted.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::events::OrchestrationEvent;
use crate::builder::toolchain::CommandSpec;
use crate::platform::Platform;
use crate::util::errors::Error;
use crate::util::process::InvocationStatus;
use crate::util::shell::{format_duration, Shell, Status};
use crate::util::GlobalContext;

pub mod threadworks_build;
pub mod threadworks_clean;

pub use threadworks_build::{build, plan_build, BuildOptions, BuildPlan, BuildStep};
pub use threadworks_clean::{
    clean, removal_command, remover_for, CleanOptions, NativeRemover, RemovalBackend, Remover,
    ShellRemover,
};

/// What to do once invocations have failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep going and report success regardless
    #[default]
    Ignore,
    /// Keep going, then report failure if anything failed
    Report,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Ignore => "ignore",
            FailurePolicy::Report => "report",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(FailurePolicy::Ignore),
            "report" => Ok(FailurePolicy::Report),
            _ => Err(Error::UnknownFailurePolicy(s.to_string())),
        }
    }
}

/// Shared inputs for both operations.
#[derive(Debug, Clone, Copy)]
pub struct OpsContext<'a> {
    /// Platform resolved once at startup
    pub platform: Platform,
    /// Directory invocations run in
    pub cwd: &'a Path,
    /// Output shell
    pub shell: &'a Shell,
}

impl<'a> OpsContext<'a> {
    /// Create an operations context from the global context.
    pub fn new(gctx: &'a GlobalContext, shell: &'a Shell) -> Self {
        OpsContext {
            platform: gctx.platform(),
            cwd: gctx.cwd(),
            shell,
        }
    }
}

/// How a single invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Ran and reported success
    Succeeded,
    /// Ran and reported failure
    Failed { code: Option<i32> },
    /// Could not be carried out at all (e.g. program not found)
    Error(String),
    /// Dry run; nothing executed
    NotRun,
}

impl InvocationOutcome {
    /// Whether this outcome counts as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, InvocationOutcome::Failed { .. } | InvocationOutcome::Error(_))
    }
}

/// Record of one attempted invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRecord {
    /// Target name or artifact pattern
    pub label: String,
    /// Human-readable command line
    pub command: String,
    /// How it ended
    pub outcome: InvocationOutcome,
}

/// Everything one `build` or `clean` run did.
#[derive(Debug, Clone)]
pub struct OrchestrationReport {
    /// "build" or "clean"
    pub command: &'static str,
    /// Platform the run used
    pub platform: Platform,
    /// Policy applied to failures
    pub policy: FailurePolicy,
    /// One record per invocation, in table order
    pub records: Vec<InvocationRecord>,
    /// Wall-clock duration
    pub duration: Duration,
}

impl OrchestrationReport {
    /// Number of invocations that actually executed.
    pub fn attempted(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome != InvocationOutcome::NotRun)
            .count()
    }

    /// Failed invocations.
    pub fn failures(&self) -> impl Iterator<Item = &InvocationRecord> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }

    /// Number of failed invocations.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Apply the failure policy.
    ///
    /// Under [`FailurePolicy::Ignore`] this always succeeds.
    pub fn check(&self) -> Result<(), Error> {
        let failed = self.failure_count();
        if self.policy == FailurePolicy::Report && failed > 0 {
            return Err(Error::InvocationsFailed {
                command: self.command,
                failed,
                total: self.records.len(),
            });
        }
        Ok(())
    }
}

/// Emit the no-op notice for a platform without a code path.
pub(crate) fn skip_platform(ctx: &OpsContext<'_>, command: &'static str) {
    tracing::debug!(
        "{}: no code path for platform `{}` (host os `{}`)",
        command,
        ctx.platform,
        std::env::consts::OS
    );
    ctx.shell.status(
        Status::Skipped,
        format!("{}: platform `{}` is not supported, nothing to do", command, ctx.platform),
    );
    ctx.shell.json_event(
        &OrchestrationEvent::PlatformSkipped {
            command,
            platform: ctx.platform,
        }
        .to_json(),
    );
}

/// Run one invocation, report it, and record the outcome.
///
/// Never fails: a spawn error becomes an [`InvocationOutcome::Error`].
pub(crate) fn run_invocation(
    ctx: &OpsContext<'_>,
    command: &'static str,
    status: Status,
    label: String,
    invocation: Option<CommandSpec>,
    dry_run: bool,
    run: impl FnOnce() -> Result<InvocationStatus>,
) -> InvocationRecord {
    let command_line = match &invocation {
        Some(spec) => spec.to_string(),
        None => format!("remove {}", label),
    };

    ctx.shell.json_event(
        &OrchestrationEvent::InvocationStarted {
            command,
            label: label.clone(),
            invocation: invocation.clone(),
            dry_run,
        }
        .to_json(),
    );

    if dry_run {
        ctx.shell.status(Status::Planned, &command_line);
        return InvocationRecord {
            label,
            command: command_line,
            outcome: InvocationOutcome::NotRun,
        };
    }

    ctx.shell.status(status, &label);
    if ctx.shell.is_verbose() {
        ctx.shell.note(format!("Running `{}`", command_line));
    }
    tracing::debug!("{}: starting `{}`", command, command_line);

    let (outcome, exit_code, error) = match run() {
        Ok(s) if s.success => (InvocationOutcome::Succeeded, s.code, None),
        Ok(s) => {
            let code = s.code.map_or_else(|| "signal".to_string(), |c| c.to_string());
            ctx.shell.status(
                Status::Error,
                format!("`{}` failed (exit status {}); continuing", label, code),
            );
            (InvocationOutcome::Failed { code: s.code }, s.code, None)
        }
        Err(e) => {
            let msg = format!("{:#}", e);
            ctx.shell.status(
                Status::Error,
                format!("`{}` could not run: {}; continuing", label, msg),
            );
            (InvocationOutcome::Error(msg.clone()), None, Some(msg))
        }
    };

    ctx.shell.json_event(
        &OrchestrationEvent::InvocationFinished {
            command,
            label: label.clone(),
            success: outcome == InvocationOutcome::Succeeded,
            exit_code,
            error,
        }
        .to_json(),
    );

    InvocationRecord {
        label,
        command: command_line,
        outcome,
    }
}

/// Close out a run: print the summary and build the report.
pub(crate) fn finish(
    ctx: &OpsContext<'_>,
    command: &'static str,
    policy: FailurePolicy,
    records: Vec<InvocationRecord>,
    start: Instant,
) -> OrchestrationReport {
    let report = OrchestrationReport {
        command,
        platform: ctx.platform,
        policy,
        records,
        duration: start.elapsed(),
    };

    let failures = report.failure_count();
    if report.attempted() > 0 {
        let mut summary = format!(
            "{} for {}: {} invocation(s)",
            command,
            ctx.platform,
            report.attempted()
        );
        if failures > 0 {
            summary.push_str(&format!(", {} failed", failures));
            if policy == FailurePolicy::Ignore {
                summary.push_str(" (ignored)");
            }
        }
        summary.push_str(&format!(" in {}", format_duration(report.duration)));
        ctx.shell.status(Status::Finished, summary);
    }

    ctx.shell.json_event(
        &OrchestrationEvent::Finished {
            command,
            platform: ctx.platform,
            invocations: report.attempted(),
            failures,
            duration_ms: millis(report.duration),
        }
        .to_json(),
    );

    report
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: InvocationOutcome) -> InvocationRecord {
        InvocationRecord {
            label: "static_threads".to_string(),
            command: "g++ -o static_threads".to_string(),
            outcome,
        }
    }

    fn report(policy: FailurePolicy, records: Vec<InvocationRecord>) -> OrchestrationReport {
        OrchestrationReport {
            command: "build",
            platform: Platform::Linux,
            policy,
            records,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("ignore".parse::<FailurePolicy>().unwrap(), FailurePolicy::Ignore);
        assert_eq!("Report".parse::<FailurePolicy>().unwrap(), FailurePolicy::Report);
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Ignore);
    }

    #[test]
    fn test_outcome_is_failure() {
        assert!(!InvocationOutcome::Succeeded.is_failure());
        assert!(!InvocationOutcome::NotRun.is_failure());
        assert!(InvocationOutcome::Failed { code: Some(1) }.is_failure());
        assert!(InvocationOutcome::Error("not found".into()).is_failure());
    }

    #[test]
    fn test_ignore_policy_always_passes() {
        let r = report(
            FailurePolicy::Ignore,
            vec![
                record(InvocationOutcome::Failed { code: Some(1) }),
                record(InvocationOutcome::Error("spawn".into())),
            ],
        );
        assert_eq!(r.failure_count(), 2);
        assert!(r.check().is_ok());
    }

    #[test]
    fn test_report_policy_fails_after_the_fact() {
        let r = report(
            FailurePolicy::Report,
            vec![
                record(InvocationOutcome::Failed { code: Some(1) }),
                record(InvocationOutcome::Succeeded),
                record(InvocationOutcome::Succeeded),
            ],
        );
        let err = r.check().unwrap_err();
        assert_eq!(err.to_string(), "1 of 3 build invocation(s) failed");
    }

    #[test]
    fn test_report_policy_passes_without_failures() {
        let r = report(FailurePolicy::Report, vec![record(InvocationOutcome::Succeeded)]);
        assert!(r.check().is_ok());
    }

    #[test]
    fn test_attempted_excludes_dry_run() {
        let r = report(
            FailurePolicy::Ignore,
            vec![record(InvocationOutcome::NotRun), record(InvocationOutcome::Succeeded)],
        );
        assert_eq!(r.attempted(), 1);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
