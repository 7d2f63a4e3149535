//! GCC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::target::TargetSpec;
use crate::platform::Platform;

use super::{CommandSpec, Toolchain};

/// GNU C++ toolchain (Linux).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C++ compiler driver
    pub cxx: PathBuf,
}

impl GccToolchain {
    /// Create a new GCC toolchain.
    pub fn new(cxx: PathBuf) -> Self {
        GccToolchain { cxx }
    }
}

impl Toolchain for GccToolchain {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn compiler_path(&self) -> &Path {
        &self.cxx
    }

    fn compile_command(&self, target: &TargetSpec) -> CommandSpec {
        // Compile and link in one step, output named after the target
        let cmd = CommandSpec::new(&self.cxx).args(["-o", target.name]);
        match target.sources(self.platform()) {
            Some(sources) => cmd.args(sources),
            None => cmd,
        }
    }
}
