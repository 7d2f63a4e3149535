//! Threadworks - build and clean commands for the threads demo programs
//!
//! The library detects the host platform, turns the fixed target table into
//! structured compiler invocations, and removes the artifacts those
//! invocations leave behind. The `threadworks` binary's `build` and `clean`
//! subcommands are thin wrappers around [`ops::build`] and [`ops::clean`].

pub mod builder;
pub mod core;
pub mod ops;
pub mod platform;
pub mod util;

/// Recording runners and removers for unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::artifact::ArtifactPattern;
pub use core::target::TargetSpec;
pub use platform::Platform;
pub use util::context::GlobalContext;
