//! Global context for Threadworks operations.
//!
//! Resolves, once per process, everything the orchestrators share: the
//! working directory, the host platform, and the merged configuration.

use std::path::{Path, PathBuf};

use crate::platform::Platform;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Directory the tools run in and clean up
    cwd: PathBuf,

    /// Platform resolved at startup
    platform: Platform,

    /// Merged global + project configuration
    config: Config,
}

impl GlobalContext {
    /// Create a context for a specific working directory.
    ///
    /// `platform` overrides host detection when given.
    pub fn with_cwd(cwd: PathBuf, platform: Option<Platform>) -> Self {
        let platform = platform.unwrap_or_else(|| {
            let detected = Platform::detect();
            tracing::debug!(
                "detected platform `{}` (host os `{}`)",
                detected,
                std::env::consts::OS
            );
            detected
        });

        let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));

        GlobalContext {
            cwd,
            platform,
            config,
        }
    }

    /// Get the working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the resolved platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_uses_given_directory() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf(), Some(Platform::Linux));
        assert_eq!(ctx.cwd(), tmp.path());
        assert_eq!(ctx.platform(), Platform::Linux);
    }

    #[test]
    fn test_platform_override() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf(), Some(Platform::Windows));
        assert_eq!(ctx.platform(), Platform::Windows);

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf(), None);
        assert_eq!(ctx.platform(), Platform::detect());
    }

    #[test]
    fn test_reads_project_config() {
        let tmp = TempDir::new().unwrap();
        let path = project_config_path(tmp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[toolchain]\ncxx = \"clang++\"\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf(), Some(Platform::Linux));
        assert_eq!(ctx.config().toolchain.cxx, Some(PathBuf::from("clang++")));
    }
}
