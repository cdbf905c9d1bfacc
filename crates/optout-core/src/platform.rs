use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::OptOutError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Operating system class used to gate OS-specific opt-out actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Linux,
    Macos,
    Unknown,
}

impl Platform {
    /// The platforms an action can be gated on. `Unknown` is never a gate.
    pub fn known() -> &'static [Platform] {
        &[Platform::Windows, Platform::Linux, Platform::Macos]
    }

    /// Classify an OS identifier as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Platform {
        os.parse().unwrap_or(Platform::Unknown)
    }

    /// Detect the host platform. The result is computed once per process.
    pub fn detect() -> Platform {
        static DETECTED: OnceLock<Platform> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let platform = Platform::from_os(std::env::consts::OS);
            tracing::debug!(os = std::env::consts::OS, %platform, "detected platform");
            platform
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Macos => "macos",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = OptOutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::Macos),
            _ => Err(OptOutError::PlatformUnknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_os_names() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("macos"), Platform::Macos);
    }

    #[test]
    fn unrecognized_os_is_unknown() {
        assert_eq!(Platform::from_os("freebsd"), Platform::Unknown);
        assert_eq!(Platform::from_os(""), Platform::Unknown);
        assert!(matches!(
            "haiku".parse::<Platform>(),
            Err(OptOutError::PlatformUnknown)
        ));
    }

    #[test]
    fn detect_is_stable_across_calls() {
        assert_eq!(Platform::detect(), Platform::detect());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn detects_linux_host() {
        assert_eq!(Platform::detect(), Platform::Linux);
    }

    #[test]
    fn names_are_stable() {
        let names: Vec<&str> = Platform::known().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["windows", "linux", "macos"]);
        assert_eq!(Platform::Unknown.to_string(), "unknown");
    }
}
