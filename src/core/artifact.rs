//! Artifact patterns removed by `clean`.
//!
//! Patterns are filename globs relative to the working directory. The lists
//! are kept exactly as the tool has always shipped them, including the Linux
//! `thread_test` entry that matches none of the executables `build` produces.
//! [`uncovered_executables`] reports that gap instead of papering over it.

use std::fmt;

use serde::Serialize;

use crate::core::target::TARGETS;
use crate::platform::Platform;

/// A filename glob identifying files to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArtifactPattern(&'static str);

impl ArtifactPattern {
    /// Create a pattern from a static glob.
    pub const fn new(glob: &'static str) -> Self {
        ArtifactPattern(glob)
    }

    /// Get the glob text.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Check whether a bare file name matches this pattern.
    ///
    /// Returns `false` if the glob itself is malformed.
    pub fn matches(&self, file_name: &str) -> bool {
        glob::Pattern::new(self.0)
            .map(|p| p.matches(file_name))
            .unwrap_or(false)
    }
}

impl fmt::Display for ArtifactPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Executables, objects, incremental-link, program-database, user-options
/// and solution files.
const WINDOWS_PATTERNS: [ArtifactPattern; 6] = [
    ArtifactPattern::new("*.exe"),
    ArtifactPattern::new("*.obj"),
    ArtifactPattern::new("*.ilk"),
    ArtifactPattern::new("*.pdb"),
    ArtifactPattern::new("*.suo"),
    ArtifactPattern::new("*.sln"),
];

const LINUX_PATTERNS: [ArtifactPattern; 2] = [
    ArtifactPattern::new("*.o"),
    ArtifactPattern::new("thread_test"),
];

/// Ordered cleanup patterns for a platform.
pub fn cleanup_patterns(platform: Platform) -> &'static [ArtifactPattern] {
    match platform {
        Platform::Windows => &WINDOWS_PATTERNS,
        Platform::Linux => &LINUX_PATTERNS,
        Platform::Unrecognized => &[],
    }
}

/// Executables built on `platform` that no cleanup pattern would remove.
pub fn uncovered_executables(platform: Platform) -> Vec<String> {
    if !platform.is_supported() {
        return Vec::new();
    }

    let patterns = cleanup_patterns(platform);
    TARGETS
        .iter()
        .map(|t| t.executable_name(platform))
        .filter(|exe| !patterns.iter().any(|p| p.matches(exe)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_patterns_in_order() {
        let globs: Vec<_> = cleanup_patterns(Platform::Windows)
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(globs, ["*.exe", "*.obj", "*.ilk", "*.pdb", "*.suo", "*.sln"]);
    }

    #[test]
    fn test_linux_patterns_in_order() {
        let globs: Vec<_> = cleanup_patterns(Platform::Linux)
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(globs, ["*.o", "thread_test"]);
    }

    #[test]
    fn test_unrecognized_has_no_patterns() {
        assert!(cleanup_patterns(Platform::Unrecognized).is_empty());
    }

    #[test]
    fn test_pattern_matches() {
        let obj = ArtifactPattern::new("*.o");
        assert!(obj.matches("os_linux.o"));
        assert!(!obj.matches("os_linux.cpp"));

        let literal = ArtifactPattern::new("thread_test");
        assert!(literal.matches("thread_test"));
        assert!(!literal.matches("test_threads"));
    }

    #[test]
    fn test_linux_leaves_every_executable_uncovered() {
        assert_eq!(
            uncovered_executables(Platform::Linux),
            ["static_threads", "object_threads", "test_threads"]
        );
    }

    #[test]
    fn test_windows_covers_every_executable() {
        assert!(uncovered_executables(Platform::Windows).is_empty());
    }

    #[test]
    fn test_unrecognized_has_nothing_uncovered() {
        assert!(uncovered_executables(Platform::Unrecognized).is_empty());
    }
}
