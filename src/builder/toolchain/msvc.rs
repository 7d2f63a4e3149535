//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::target::TargetSpec;
use crate::platform::Platform;

use super::{CommandSpec, Toolchain};

/// Warning-level, debug-info and exception-model flags passed to every
/// compile. C4127 appears twice; the list is kept as it has always shipped.
const CL_FLAGS: [&str; 7] = ["/nologo", "/W4", "/Zi", "/EHsc", "-wd4127", "-wd4702", "-wd4127"];

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe (compiler)
    pub cl: PathBuf,
}

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new(cl: PathBuf) -> Self {
        MsvcToolchain { cl }
    }
}

impl Toolchain for MsvcToolchain {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn compiler_path(&self) -> &Path {
        &self.cl
    }

    fn compile_command(&self, target: &TargetSpec) -> CommandSpec {
        // cl names the executable after the first source file
        let cmd = CommandSpec::new(&self.cl).args(CL_FLAGS);
        match target.sources(self.platform()) {
            Some(sources) => cmd.args(sources),
            None => cmd,
        }
    }
}
