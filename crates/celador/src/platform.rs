//! Platform identification for skip conditions.
//!
//! Skip conditions may restrict themselves to a set of platforms; the
//! execution context carries the platform a run is (or pretends to be)
//! executing on. Detection reads the compile-time target, and a context can
//! override it to simulate another platform for a single assertion.

use serde::{Deserialize, Serialize};

/// Operating system families a test run can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Microsoft Windows
    Windows,
    /// Apple macOS
    Mac,
    /// Linux distributions
    Linux,
    /// Android
    Android,
}

impl Platform {
    /// Detect the platform of the running host
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Linux
        }
    }

    /// Get the canonical name for this platform
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
            Self::Android => "android",
        }
    }

    /// Parse a platform name (case-insensitive, common aliases accepted)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "windows" | "win" => Some(Self::Windows),
            "mac" | "macos" | "darwin" => Some(Self::Mac),
            "linux" => Some(Self::Linux),
            "android" => Some(Self::Android),
            _ => None,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
