//! Harness configuration.
//!
//! Selects the driver key and seeds the execution context, either
//! programmatically or from `CELADOR_*` environment variables.

use crate::condition::FlagState;
use crate::context::ExecutionContext;
use crate::platform::Platform;
use crate::result::{CeladorError, CeladorResult};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the driver registry key
pub const DRIVER_ENV: &str = "CELADOR_DRIVER";

/// Environment variable overriding the detected platform
pub const PLATFORM_ENV: &str = "CELADOR_PLATFORM";

/// Environment variable setting the native-events flag state
pub const NATIVE_EVENTS_ENV: &str = "CELADOR_NATIVE_EVENTS";

/// Driver key used when `CELADOR_DRIVER` is unset
pub const DEFAULT_DRIVER: &str = "chromium";

/// Configuration for a harness run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Driver registry key
    pub driver: String,
    /// Platform override; `None` uses the detected host platform
    pub platform: Option<Platform>,
    /// Native-events flag state for the run
    pub flags: FlagState,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            platform: None,
            flags: FlagState::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver key
    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Override the platform
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the flag state
    #[must_use]
    pub const fn with_flags(mut self, flags: FlagState) -> Self {
        self.flags = flags;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// Unset variables fall back to defaults; a set variable that fails to
    /// parse is [`CeladorError::InvalidEnv`].
    pub fn from_env() -> CeladorResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an injected lookup
    pub fn from_lookup<F>(lookup: F) -> CeladorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(driver) = lookup(DRIVER_ENV) {
            config.driver = driver.to_ascii_lowercase();
        }
        if let Some(value) = lookup(PLATFORM_ENV) {
            let platform = Platform::parse(&value).ok_or_else(|| CeladorError::InvalidEnv {
                name: PLATFORM_ENV.to_string(),
                value: value.clone(),
            })?;
            config.platform = Some(platform);
        }
        if let Some(value) = lookup(NATIVE_EVENTS_ENV) {
            let flags = FlagState::parse(&value).ok_or_else(|| CeladorError::InvalidEnv {
                name: NATIVE_EVENTS_ENV.to_string(),
                value: value.clone(),
            })?;
            config.flags = flags;
        }
        Ok(config)
    }

    /// Build the execution context this configuration describes
    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        let context = ExecutionContext::new(self.driver.as_str()).with_flags(self.flags);
        match self.platform {
            Some(platform) => context.with_platform(platform),
            None => context,
        }
    }
}
