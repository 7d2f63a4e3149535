//! Host platform detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::errors::Error;

/// Operating system category the commands know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows with the MSVC toolchain
    Windows,
    /// Linux with the GNU toolchain
    Linux,
    /// Anything else; both commands do nothing here
    Unrecognized,
}

impl Platform {
    /// Detect the platform of the running host.
    ///
    /// Reads the compile-time OS name once. An unknown OS is a normal result,
    /// not an error.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name (as reported by `std::env::consts::OS`) to a platform.
    pub fn from_os_name(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Unrecognized,
        }
    }

    /// Get the platform name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Unrecognized => "unrecognized",
        }
    }

    /// Whether the commands have a code path for this platform.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unrecognized)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "unrecognized" => Ok(Platform::Unrecognized),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os_name() {
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("Windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("macos"), Platform::Unrecognized);
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Unrecognized);
        assert_eq!(Platform::from_os_name(""), Platform::Unrecognized);
    }

    #[test]
    fn test_detect_matches_host() {
        let expected = if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unrecognized
        };
        assert_eq!(Platform::detect(), expected);
    }

    #[test]
    fn test_parse() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("WINDOWS".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!(
            "unrecognized".parse::<Platform>().unwrap(),
            Platform::Unrecognized
        );
        assert!("darwin".parse::<Platform>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for p in [Platform::Windows, Platform::Linux, Platform::Unrecognized] {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn test_is_supported() {
        assert!(Platform::Windows.is_supported());
        assert!(Platform::Linux.is_supported());
        assert!(!Platform::Unrecognized.is_supported());
    }
}
