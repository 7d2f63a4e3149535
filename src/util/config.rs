//! Configuration file support for Threadworks.
//!
//! Two configuration file locations are read:
//! - Global: `~/.threadworks/config.toml` - User-wide defaults
//! - Project: `.threadworks/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both. With no files at all, every setting has the
//! behavior the commands have always had.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::{FailurePolicy, RemovalBackend};

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".threadworks";

/// Threadworks configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Clean settings
    pub clean: CleanConfig,

    /// Toolchain overrides
    pub toolchain: ToolchainSettings,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Run the compiler invocations concurrently
    pub parallel: Option<bool>,

    /// What to do with failed compiler invocations
    pub failure_policy: Option<FailurePolicy>,
}

/// Clean-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CleanConfig {
    /// What to do with failed removal requests
    pub failure_policy: Option<FailurePolicy>,

    /// How removal requests are carried out
    pub removal: Option<RemovalBackend>,
}

/// Toolchain program overrides.
///
/// Only the program is configurable; the arguments each toolchain passes are
/// fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// C++ compiler driver used on Linux (default `g++`)
    pub cxx: Option<PathBuf>,

    /// MSVC compiler used on Windows (default `cl`)
    pub cl: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.parallel.is_some() {
            self.build.parallel = other.build.parallel;
        }
        if other.build.failure_policy.is_some() {
            self.build.failure_policy = other.build.failure_policy;
        }

        if other.clean.failure_policy.is_some() {
            self.clean.failure_policy = other.clean.failure_policy;
        }
        if other.clean.removal.is_some() {
            self.clean.removal = other.clean.removal;
        }

        if other.toolchain.cxx.is_some() {
            self.toolchain.cxx = other.toolchain.cxx;
        }
        if other.toolchain.cl.is_some() {
            self.toolchain.cl = other.toolchain.cl;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.threadworks/config.toml)
/// 2. Global config (~/.threadworks/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.threadworks).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.threadworks/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.threadworks/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
