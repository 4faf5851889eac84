//! Execution context for skip evaluation.
//!
//! One [`ExecutionContext`] is built per run (or per suite) and passed
//! explicitly into the skip evaluator; there is no process-wide mutable
//! state. Mutation happens only through the named setters, so a context can
//! simulate another platform for a single assertion and then be reset.

use crate::condition::{DriverId, FlagState};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// The active driver, platform, and flag state of a test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    driver: DriverId,
    platform: Platform,
    flags: FlagState,
}

impl ExecutionContext {
    /// Create a context for the named driver on the detected host platform,
    /// with the feature flag disabled
    #[must_use]
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: DriverId::new(driver),
            platform: Platform::current(),
            flags: FlagState::default(),
        }
    }

    /// Override the platform
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override the flag state
    #[must_use]
    pub const fn with_flags(mut self, flags: FlagState) -> Self {
        self.flags = flags;
        self
    }

    /// Get the active driver identity
    #[must_use]
    pub fn driver(&self) -> &DriverId {
        &self.driver
    }

    /// Get the active platform
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Get the active flag state
    #[must_use]
    pub const fn flags(&self) -> FlagState {
        self.flags
    }

    /// Switch the active driver
    pub fn set_driver(&mut self, driver: impl Into<String>) {
        self.driver = DriverId::new(driver);
    }

    /// Simulate another platform
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    /// Return to the detected host platform
    pub fn reset_platform(&mut self) {
        self.platform = Platform::current();
    }

    /// Change the flag state
    pub fn set_flags(&mut self, flags: FlagState) {
        self.flags = flags;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_defaults() {
        let ctx = ExecutionContext::new("chromium");
        assert_eq!(ctx.driver().as_str(), "chromium");
        assert_eq!(ctx.platform(), Platform::current());
        assert_eq!(ctx.flags(), FlagState::Disabled);
    }

    #[test]
    fn test_builder_overrides() {
        let ctx = ExecutionContext::new("firefox")
            .with_platform(Platform::Windows)
            .with_flags(FlagState::All);
        assert_eq!(ctx.platform(), Platform::Windows);
        assert_eq!(ctx.flags(), FlagState::All);
    }

    #[test]
    fn test_set_driver_normalizes() {
        let mut ctx = ExecutionContext::new("chromium");
        ctx.set_driver("Firefox");
        assert_eq!(ctx.driver().as_str(), "firefox");
    }

    #[test]
    fn test_platform_simulation_and_reset() {
        let mut ctx = ExecutionContext::new("chromium");
        ctx.set_platform(Platform::Android);
        assert_eq!(ctx.platform(), Platform::Android);
        ctx.reset_platform();
        assert_eq!(ctx.platform(), Platform::current());
    }

    #[test]
    fn test_set_flags() {
        let mut ctx = ExecutionContext::new("chromium");
        ctx.set_flags(FlagState::Enabled);
        assert_eq!(ctx.flags(), FlagState::Enabled);
    }
}
