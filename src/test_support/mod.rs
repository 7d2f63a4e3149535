//! Test utilities and mocks for Threadworks unit tests.
//!
//! Provides recording implementations of the process and removal seams so
//! the orchestrators can be tested without a compiler on the machine.
//!
//! # Example
//!
//! ```rust,ignore
//! use threadworks::test_support::{quiet_shell, RecordingRunner};
//!
//! #[test]
//! fn test_example() {
//!     let runner = RecordingRunner::new().fail_when("static_threads.cpp", 1);
//!     // Run `build` with the runner, then inspect runner.calls()...
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::toolchain::CommandSpec;
use crate::core::artifact::ArtifactPattern;
use crate::ops::Remover;
use crate::util::process::{CommandRunner, InvocationStatus};
use crate::util::shell::{ColorChoice, Shell, ShellMode, Verbosity};

/// A shell that prints nothing but errors.
pub fn quiet_shell() -> Shell {
    Shell::new(ShellMode::Human {
        verbosity: Verbosity::Quiet,
        color: ColorChoice::Never,
    })
}

/// Command runner that records calls instead of spawning processes.
///
/// By default every command succeeds. Commands can be made to fail by
/// naming one of their arguments.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(CommandSpec, PathBuf)>>,
    failures: Vec<(String, i32)>,
    spawn_errors: Vec<String>,
    touch_outputs: bool,
}

impl RecordingRunner {
    /// Create a runner where everything succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for commands that have `arg` among their arguments.
    pub fn fail_when(mut self, arg: &str, code: i32) -> Self {
        self.failures.push((arg.to_string(), code));
        self
    }

    /// Fail to start commands that have `arg` among their arguments.
    pub fn spawn_error_when(mut self, arg: &str) -> Self {
        self.spawn_errors.push(arg.to_string());
        self
    }

    /// Create the files a successful compiler run would leave behind.
    pub fn touch_outputs(mut self) -> Self {
        self.touch_outputs = true;
        self
    }

    /// Commands run so far, in call order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.lock().iter().map(|(cmd, _)| cmd.clone()).collect()
    }

    /// Working directories of the calls, in call order.
    pub fn cwds(&self) -> Vec<PathBuf> {
        self.lock().iter().map(|(_, cwd)| cwd.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(CommandSpec, PathBuf)>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn has_arg(cmd: &CommandSpec, arg: &str) -> bool {
        cmd.args.iter().any(|a| a == arg)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec, cwd: &Path) -> Result<InvocationStatus> {
        self.lock().push((cmd.clone(), cwd.to_path_buf()));

        if self.spawn_errors.iter().any(|a| Self::has_arg(cmd, a)) {
            bail!("failed to execute `{}`", cmd.program.display());
        }

        if let Some((_, code)) = self.failures.iter().find(|(a, _)| Self::has_arg(cmd, a)) {
            return Ok(InvocationStatus::failure(Some(*code)));
        }

        if self.touch_outputs {
            for name in simulated_outputs(cmd) {
                fs::write(cwd.join(&name), "")?;
            }
        }

        Ok(InvocationStatus::success())
    }
}

/// Files `g++ -o` or `cl` would produce for a command.
fn simulated_outputs(cmd: &CommandSpec) -> Vec<String> {
    if let Some(pos) = cmd.args.iter().position(|a| a == "-o") {
        return cmd.args.get(pos + 1).cloned().into_iter().collect();
    }

    let sources: Vec<&str> = cmd
        .args
        .iter()
        .filter_map(|a| a.strip_suffix(".cpp"))
        .collect();
    let Some(first) = sources.first() else {
        return Vec::new();
    };

    let mut outputs: Vec<String> = sources.iter().map(|s| format!("{}.obj", s)).collect();
    outputs.push(format!("{}.exe", first));
    outputs.push(format!("{}.ilk", first));
    outputs.push(format!("{}.pdb", first));
    outputs.push("vc140.pdb".to_string());
    outputs
}

/// Remover that records patterns instead of touching the filesystem.
#[derive(Debug, Default)]
pub struct RecordingRemover {
    patterns: Mutex<Vec<String>>,
    fail_on: Vec<String>,
}

impl RecordingRemover {
    /// Create a remover where every request succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report failure for this pattern.
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.fail_on.push(pattern.to_string());
        self
    }

    /// Patterns requested so far, in call order.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Remover for RecordingRemover {
    fn command(&self, _pattern: &ArtifactPattern) -> Option<CommandSpec> {
        None
    }

    fn remove(&self, pattern: &ArtifactPattern, _cwd: &Path) -> Result<InvocationStatus> {
        if let Ok(mut patterns) = self.patterns.lock() {
            patterns.push(pattern.to_string());
        }

        if self.fail_on.iter().any(|p| p == pattern.as_str()) {
            return Ok(InvocationStatus::failure(Some(1)));
        }
        Ok(InvocationStatus::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_outputs_gcc() {
        let cmd = CommandSpec::new("g++").args(["-o", "test_threads", "test_threads.cpp", "os_linux.cpp"]);
        assert_eq!(simulated_outputs(&cmd), ["test_threads"]);
    }

    #[test]
    fn test_simulated_outputs_cl() {
        let cmd = CommandSpec::new("cl").args(["/nologo", "object_threads.cpp", "os_windows.cpp"]);
        assert_eq!(
            simulated_outputs(&cmd),
            [
                "object_threads.obj",
                "os_windows.obj",
                "object_threads.exe",
                "object_threads.ilk",
                "object_threads.pdb",
                "vc140.pdb",
            ]
        );
    }

    #[test]
    fn test_recording_runner_failures() {
        let tmp = tempfile::TempDir::new().unwrap();
        let runner = RecordingRunner::new()
            .fail_when("a.cpp", 4)
            .spawn_error_when("b.cpp");

        let failed = runner.run(&CommandSpec::new("g++").arg("a.cpp"), tmp.path()).unwrap();
        assert_eq!(failed, InvocationStatus::failure(Some(4)));

        assert!(runner.run(&CommandSpec::new("g++").arg("b.cpp"), tmp.path()).is_err());
        assert!(runner.run(&CommandSpec::new("g++").arg("c.cpp"), tmp.path()).unwrap().success);
        assert_eq!(runner.calls().len(), 3);
    }
}
