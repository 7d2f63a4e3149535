//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use crate::util::errors::Error;

/// Matching rules shared with the shells the removal utilities run under:
/// `*` never matches a leading dot, and names compare case-insensitively
/// only on Windows.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: !cfg!(windows),
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Find regular files directly in `base` whose name matches a glob pattern.
///
/// Only file names are matched, so glob syntax in `base` itself (such as
/// `proj[1]`) is taken literally. Unreadable entries are logged and skipped.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let entries = fs::read_dir(base)
        .with_context(|| format!("failed to read directory: {}", base.display()))?;

    let mut results = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", base.display(), e);
                continue;
            }
        };

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if matcher.matches_with(name, MATCH_OPTIONS) && entry.path().is_file() {
            results.push(entry.path());
        }
    }

    results.sort();
    Ok(results)
}

/// Delete every regular file in `base` matching `pattern`.
///
/// Matching nothing is not an error. Returns the number of files removed;
/// fails on the first file that cannot be deleted.
pub fn remove_matching(base: &Path, pattern: &str) -> Result<usize> {
    let files = glob_files(base, pattern)?;
    for file in &files {
        fs::remove_file(file)
            .with_context(|| format!("failed to remove file: {}", file.display()))?;
        tracing::debug!("removed {}", file.display());
    }
    Ok(files.len())
}
