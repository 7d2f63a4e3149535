//! Core data for the threads demo build.
//!
//! Everything here is static: the table of target executables and the
//! per-platform artifact patterns removed by `clean`.

pub mod artifact;
pub mod target;

pub use artifact::{cleanup_patterns, uncovered_executables, ArtifactPattern};
pub use target::{os_abstraction_source, TargetSpec, TARGETS};
