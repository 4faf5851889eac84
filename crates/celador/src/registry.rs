//! Driver registry and remote construction settings.
//!
//! Session implementations register a factory under a configuration key at
//! startup; the harness resolves the key once and hands the resulting
//! supplier to the [`SessionManager`](crate::session::SessionManager).
//! Resolution failures surface immediately as
//! [`CeladorError::UnknownDriver`], not at some later test boundary.
//!
//! Remote factories read their endpoint and credentials from the
//! environment via [`RemoteConfig`]; a missing variable is a fatal
//! construction error, never a skip.

use crate::condition::DriverId;
use crate::result::{CeladorError, CeladorResult};
use crate::session::{Session, SessionSupplier};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared zero-argument session factory stored in the registry
pub type SessionFactory = Arc<dyn Fn() -> CeladorResult<Box<dyn Session>>>;

/// Startup-time mapping from configuration keys to session factories
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<DriverId, SessionFactory>,
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl DriverRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a key, replacing any previous registration
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn() -> CeladorResult<Box<dyn Session>> + 'static,
    {
        let key = DriverId::new(key);
        tracing::debug!(key = key.as_str(), "driver registered");
        self.factories.insert(key, Arc::new(factory));
    }

    /// Whether a factory is registered under the key
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(&DriverId::new(key))
    }

    /// Registered keys, sorted for stable reporting
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .factories
            .keys()
            .map(|key| key.as_str().to_string())
            .collect();
        keys.sort();
        keys
    }

    /// Number of registered factories
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolve a key into a supplier for the lifecycle manager.
    ///
    /// # Errors
    ///
    /// Returns [`CeladorError::UnknownDriver`] when nothing is registered
    /// under the key.
    pub fn supplier(&self, key: &str) -> CeladorResult<SessionSupplier> {
        let id = DriverId::new(key);
        let factory = self
            .factories
            .get(&id)
            .cloned()
            .ok_or_else(|| CeladorError::UnknownDriver {
                key: id.as_str().to_string(),
            })?;
        Ok(Box::new(move || factory()))
    }
}

// =============================================================================
// REMOTE CONSTRUCTION SETTINGS
// =============================================================================

/// Environment variable naming the remote session endpoint
pub const REMOTE_URL_ENV: &str = "CELADOR_REMOTE_URL";

/// Environment variable naming the remote account username
pub const REMOTE_USERNAME_ENV: &str = "CELADOR_REMOTE_USERNAME";

/// Environment variable naming the remote account access key
pub const REMOTE_ACCESS_KEY_ENV: &str = "CELADOR_REMOTE_ACCESS_KEY";

/// Endpoint and credentials for remotely hosted session construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Endpoint URL of the remote session host
    pub url: String,
    /// Account username
    pub username: String,
    /// Account access key
    pub access_key: String,
}

impl RemoteConfig {
    /// Read the remote settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CeladorError::MissingEnv`] naming the first absent variable.
    pub fn from_env() -> CeladorResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the remote settings through an injected lookup
    pub fn from_lookup<F>(lookup: F) -> CeladorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| CeladorError::MissingEnv {
                name: name.to_string(),
            })
        };
        Ok(Self {
            url: required(REMOTE_URL_ENV)?,
            username: required(REMOTE_USERNAME_ENV)?,
            access_key: required(REMOTE_ACCESS_KEY_ENV)?,
        })
    }
}
