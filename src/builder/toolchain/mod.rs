//! Toolchain abstraction for the native C++ compilers.
//!
//! Each supported platform has exactly one toolchain, and each toolchain
//! turns a [`TargetSpec`] into a single compile-and-link command. Commands
//! are structured values (program + ordered arguments), never shell strings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::target::TargetSpec;
use crate::platform::Platform;
use crate::util::config::ToolchainSettings;

mod gcc;
mod msvc;

pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// A command to execute: program plus ordered arguments.
///
/// Children inherit the parent's environment unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "g++", "cl")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to generate commands for its specific compiler.
pub trait Toolchain: Send + Sync {
    /// Get the platform this toolchain serves.
    ///
    /// Selects the OS-abstraction source from the target table.
    fn platform(&self) -> Platform;

    /// Get the compiler program.
    fn compiler_path(&self) -> &Path;

    /// Generate the command that compiles and links one target.
    fn compile_command(&self, target: &TargetSpec) -> CommandSpec;
}

/// Get the toolchain for a platform, applying program overrides.
///
/// Returns `None` for [`Platform::Unrecognized`].
pub fn toolchain_for(platform: Platform, settings: &ToolchainSettings) -> Option<Box<dyn Toolchain>> {
    match platform {
        Platform::Windows => {
            let cl = settings.cl.clone().unwrap_or_else(|| PathBuf::from("cl"));
            Some(Box::new(MsvcToolchain::new(cl)))
        }
        Platform::Linux => {
            let cxx = settings.cxx.clone().unwrap_or_else(|| PathBuf::from("g++"));
            Some(Box::new(GccToolchain::new(cxx)))
        }
        Platform::Unrecognized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_display() {
        let cmd = CommandSpec::new("g++").args(["-o", "a", "a.cpp"]);
        assert_eq!(cmd.to_string(), "g++ -o a a.cpp");
    }

    #[test]
    fn test_toolchain_for_defaults() {
        let settings = ToolchainSettings::default();

        let msvc = toolchain_for(Platform::Windows, &settings).unwrap();
        assert_eq!(msvc.platform(), Platform::Windows);
        assert_eq!(msvc.compiler_path(), Path::new("cl"));

        let gcc = toolchain_for(Platform::Linux, &settings).unwrap();
        assert_eq!(gcc.platform(), Platform::Linux);
        assert_eq!(gcc.compiler_path(), Path::new("g++"));

        assert!(toolchain_for(Platform::Unrecognized, &settings).is_none());
    }

    #[test]
    fn test_toolchain_for_overrides_program_only() {
        let settings = ToolchainSettings {
            cxx: Some(PathBuf::from("/opt/gcc/bin/g++")),
            cl: None,
        };
        let gcc = toolchain_for(Platform::Linux, &settings).unwrap();
        let cmd = gcc.compile_command(&crate::core::target::TARGETS[0]);

        assert_eq!(cmd.program, PathBuf::from("/opt/gcc/bin/g++"));
        assert_eq!(cmd.args, ["-o", "static_threads", "static_threads.cpp", "os_linux.cpp"]);
    }
}
