//! Declarative skip conditions.
//!
//! A [`SkipCondition`] states under which driver/platform/flag combination a
//! test must not run. Conditions are pure data: attaching several to one test
//! unions them (any match skips), and evaluation against the live context
//! happens in the [`skip`](crate::skip) module.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};

// =============================================================================
// DRIVER IDENTITY
// =============================================================================

/// Identity of a session driver, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(String);

impl DriverId {
    /// Create a driver identity from a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_ascii_lowercase())
    }

    /// Get the normalized name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DriverId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A driver a condition targets: one named driver, or every driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverTarget {
    /// Matches whatever driver is active
    All,
    /// Matches one named driver
    Id(DriverId),
}

impl DriverTarget {
    /// Target a named driver
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::Id(DriverId::new(name))
    }
}

// =============================================================================
// FEATURE FLAG STATE
// =============================================================================

/// Native-events flag state carried by the execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlagState {
    /// The flag is enabled
    Enabled,
    /// The flag is disabled
    #[default]
    Disabled,
    /// Sentinel covering both states; satisfies every exact-match constraint
    All,
}

impl FlagState {
    /// Get the canonical name for this state
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::All => "all",
        }
    }

    /// Parse a flag state (case-insensitive, common aliases accepted)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "enabled" | "on" | "true" => Some(Self::Enabled),
            "disabled" | "off" | "false" => Some(Self::Disabled),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlagState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flag requirement a condition places on the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlagConstraint {
    /// Satisfied by any flag state
    #[default]
    Any,
    /// Satisfied only when the flag is enabled (or the `All` sentinel)
    RequireEnabled,
    /// Satisfied only when the flag is disabled (or the `All` sentinel)
    RequireDisabled,
}

impl FlagConstraint {
    /// Check whether a context flag state satisfies this constraint.
    ///
    /// The context sentinel [`FlagState::All`] satisfies both exact-match
    /// constraints.
    #[must_use]
    pub const fn is_satisfied_by(&self, state: FlagState) -> bool {
        match self {
            Self::Any => true,
            Self::RequireEnabled => matches!(state, FlagState::Enabled | FlagState::All),
            Self::RequireDisabled => matches!(state, FlagState::Disabled | FlagState::All),
        }
    }
}

// =============================================================================
// SKIP CONDITION
// =============================================================================

/// A declarative rule stating when a test must not run.
///
/// A freshly created condition has an empty driver target set, which means
/// "skip unconditionally": narrowing only happens once drivers, platforms, or
/// a flag constraint are added.
///
/// # Example
///
/// ```
/// use jugar_celador::{FlagConstraint, Platform, SkipCondition};
///
/// let condition = SkipCondition::new()
///     .with_driver("chromium")
///     .with_platform(Platform::Windows)
///     .with_flags(FlagConstraint::RequireEnabled)
///     .with_reason("hangs the renderer on Windows");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCondition {
    /// Drivers this condition targets; empty targets every run unconditionally
    pub drivers: Vec<DriverTarget>,
    /// Platforms this condition applies to; empty applies on all platforms
    pub platforms: Vec<Platform>,
    /// Flag requirement placed on the context
    pub flags: FlagConstraint,
    /// Human-readable reason surfaced in skip reporting
    pub reason: Option<String>,
}

impl SkipCondition {
    /// Create an unconditional skip (no drivers targeted yet)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a named driver
    #[must_use]
    pub fn with_driver(mut self, name: impl Into<String>) -> Self {
        self.drivers.push(DriverTarget::id(name));
        self
    }

    /// Target every driver
    #[must_use]
    pub fn with_all_drivers(mut self) -> Self {
        self.drivers.push(DriverTarget::All);
        self
    }

    /// Restrict the condition to a platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.push(platform);
        self
    }

    /// Require a flag state for the condition to apply
    #[must_use]
    pub const fn with_flags(mut self, constraint: FlagConstraint) -> Self {
        self.flags = constraint;
        self
    }

    /// Attach a reason for skip reporting
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this condition skips regardless of context
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.drivers.is_empty()
    }
}
