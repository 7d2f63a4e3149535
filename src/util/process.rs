//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

use crate::builder::toolchain::CommandSpec;

/// Builder for subprocess execution.
///
/// Child processes inherit stdout, stderr and the environment, so whatever
/// the tool prints reaches the terminal untouched.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Create a process builder from a structured command.
    pub fn from_spec(spec: &CommandSpec) -> Self {
        ProcessBuilder::new(&spec.program).args(&spec.args)
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute and return status only.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// Display the command for messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of one external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationStatus {
    /// Whether the invocation reported success
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
}

impl InvocationStatus {
    /// A successful invocation with exit code 0.
    pub fn success() -> Self {
        InvocationStatus {
            success: true,
            code: Some(0),
        }
    }

    /// A failed invocation with the given exit code.
    pub fn failure(code: Option<i32>) -> Self {
        InvocationStatus {
            success: false,
            code,
        }
    }
}

impl From<ExitStatus> for InvocationStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            InvocationStatus::success()
        } else {
            // No code means the child was killed by a signal
            InvocationStatus::failure(status.code())
        }
    }
}

/// Runs structured commands.
///
/// `Err` means the process could not be started at all; a process that ran
/// and exited non-zero is `Ok` with an unsuccessful status.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` in `cwd` and wait for it to exit.
    fn run(&self, cmd: &CommandSpec, cwd: &Path) -> Result<InvocationStatus>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec, cwd: &Path) -> Result<InvocationStatus> {
        let pb = ProcessBuilder::from_spec(cmd).cwd(cwd);
        tracing::debug!("running `{}` in {}", pb.display_command(), cwd.display());
        Ok(pb.status()?.into())
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}
