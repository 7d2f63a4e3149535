//! Target definitions - what gets built.
//!
//! Each target is one executable compiled from its own primary source file
//! plus the platform's OS-abstraction source file.

use serde::Serialize;

use crate::platform::Platform;

/// A target executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TargetSpec {
    /// Executable name (without extension)
    pub name: &'static str,
    /// Target-specific source file
    pub primary_source: &'static str,
}

impl TargetSpec {
    /// Executable file name on the given platform.
    pub fn executable_name(&self, platform: Platform) -> String {
        match platform {
            Platform::Windows => format!("{}.exe", self.name),
            _ => self.name.to_string(),
        }
    }

    /// Ordered source files for this target, or `None` if the platform has
    /// no OS-abstraction layer.
    pub fn sources(&self, platform: Platform) -> Option<[&'static str; 2]> {
        os_abstraction_source(platform).map(|os| [self.primary_source, os])
    }
}

/// All targets, in build order.
pub const TARGETS: [TargetSpec; 3] = [
    TargetSpec {
        name: "static_threads",
        primary_source: "static_threads.cpp",
    },
    TargetSpec {
        name: "object_threads",
        primary_source: "object_threads.cpp",
    },
    TargetSpec {
        name: "test_threads",
        primary_source: "test_threads.cpp",
    },
];

/// The OS-abstraction source file shared by all targets on a platform.
pub fn os_abstraction_source(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Windows => Some("os_windows.cpp"),
        Platform::Linux => Some("os_linux.cpp"),
        Platform::Unrecognized => None,
    }
}
