//! Shared session lifecycle management.
//!
//! A test run owns at most one live automation session at a time. The
//! [`SessionManager`] decides when to create, reuse, refresh, or discard the
//! shared handle, and guarantees teardown at the end of the run even when
//! individual tests failed. Construction failures propagate to the affected
//! test; disposal failures are logged and swallowed so teardown can never
//! mask the original test failure.
//!
//! Each parallel worker must own its own manager: the state here is a single
//! critical resource with no internal locking, matching the sequential test
//! execution model.

use crate::result::CeladorResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live automation resource created, reused, and disposed by the manager.
///
/// Implementations wrap whatever the harness drives (a local browser
/// process, a remote grid session). `close` is best-effort: the manager
/// treats a failure as non-fatal because the resource may already be gone,
/// e.g. when the test itself closed it.
pub trait Session {
    /// Stable identifier of this handle, used in logs and reuse checks
    fn id(&self) -> &str;

    /// Release the underlying resource
    fn close(&mut self) -> CeladorResult<()>;
}

/// Generate a unique session identifier
#[must_use]
pub fn fresh_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Zero-argument factory the manager calls to obtain a new session
pub type SessionSupplier = Box<dyn FnMut() -> CeladorResult<Box<dyn Session>>>;

/// Lifecycle state of the shared session slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No live session
    Absent,
    /// A session is live and reusable
    Live,
}

/// Per-test flags controlling the shared session across a test boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Retain the session after the test instead of disposing it
    pub keep: bool,
    /// Dispose any pre-existing session before the test starts
    pub fresh: bool,
    /// Force disposal after the test; wins over `keep`
    pub restart: bool,
}

impl LifecyclePolicy {
    /// Create the default policy (dispose after each test)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the session is retained after the test
    #[must_use]
    pub const fn with_keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    /// Set whether the test starts against a freshly created session
    #[must_use]
    pub const fn with_fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Set whether the session is disposed after the test regardless of `keep`
    #[must_use]
    pub const fn with_restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    /// Whether the session must be disposed once the test has finished
    #[must_use]
    pub const fn requires_disposal_after(&self) -> bool {
        self.restart || !self.keep
    }
}

/// Owner of the single shared session slot.
///
/// # Example
///
/// ```ignore
/// let mut manager = SessionManager::new(|| Ok(Box::new(GridSession::connect()?)));
/// let session = manager.ensure(LifecyclePolicy::new())?;
/// // ... drive the session ...
/// manager.after_test(LifecyclePolicy::new().with_keep(true));
/// manager.shutdown();
/// ```
pub struct SessionManager {
    supplier: SessionSupplier,
    current: Option<Box<dyn Session>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager around an injected session supplier
    #[must_use]
    pub fn new<F>(supplier: F) -> Self
    where
        F: FnMut() -> CeladorResult<Box<dyn Session>> + 'static,
    {
        Self {
            supplier: Box::new(supplier),
            current: None,
        }
    }

    /// Get the current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Live
        } else {
            SessionState::Absent
        }
    }

    /// Whether a session is currently live
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self.state(), SessionState::Live)
    }

    /// Get the session for the next test, honoring `policy.fresh`.
    ///
    /// A live session is reused unless the policy demands a fresh one, in
    /// which case the old handle is disposed first. When the slot is empty
    /// the supplier runs; its failure propagates untouched and the slot
    /// stays absent. The returned reference is non-owning.
    pub fn ensure(&mut self, policy: LifecyclePolicy) -> CeladorResult<&mut dyn Session> {
        if policy.fresh {
            self.dispose_current();
        }
        if self.current.is_none() {
            let session = (self.supplier)()?;
            tracing::debug!(id = session.id(), "session created");
            self.current = Some(session);
        }
        Ok(self
            .current
            .as_mut()
            .expect("session slot filled above")
            .as_mut())
    }

    /// Apply the post-test policy: dispose unless kept, always on restart
    pub fn after_test(&mut self, policy: LifecyclePolicy) {
        if policy.requires_disposal_after() {
            self.dispose_current();
        }
    }

    /// End-of-run teardown; a no-op when no session is live
    pub fn shutdown(&mut self) {
        self.dispose_current();
    }

    /// Dispose the current session, clearing the slot before closing so a
    /// failed close cannot leave a stale handle observable
    fn dispose_current(&mut self) {
        if let Some(mut session) = self.current.take() {
            if let Err(error) = session.close() {
                tracing::warn!(id = session.id(), %error, "ignoring session close failure");
            }
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.dispose_current();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::CeladorError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Session double that counts close calls and can fail them
    struct CountingSession {
        id: String,
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl Session for CountingSession {
        fn id(&self) -> &str {
            &self.id
        }

        fn close(&mut self) -> CeladorResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(CeladorError::SessionClose {
                    message: "already gone".to_string(),
                });
            }
            Ok(())
        }
    }

    fn counting_manager(closes: Arc<AtomicUsize>) -> (SessionManager, Arc<AtomicUsize>) {
        let constructions = Arc::new(AtomicUsize::new(0));
        let constructed = constructions.clone();
        let manager = SessionManager::new(move || {
            constructed.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingSession {
                id: fresh_session_id(),
                closes: closes.clone(),
                fail_close: false,
            }) as Box<dyn Session>)
        });
        (manager, constructions)
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_default_policy_disposes_after_test() {
            let policy = LifecyclePolicy::new();
            assert!(!policy.keep);
            assert!(!policy.fresh);
            assert!(!policy.restart);
            assert!(policy.requires_disposal_after());
        }

        #[test]
        fn test_keep_retains() {
            assert!(!LifecyclePolicy::new()
                .with_keep(true)
                .requires_disposal_after());
        }

        #[test]
        fn test_restart_wins_over_keep() {
            let policy = LifecyclePolicy::new().with_keep(true).with_restart(true);
            assert!(policy.requires_disposal_after());
        }
    }

    mod manager_tests {
        use super::*;

        #[test]
        fn test_starts_absent() {
            let (manager, _) = counting_manager(Arc::new(AtomicUsize::new(0)));
            assert_eq!(manager.state(), SessionState::Absent);
            assert!(!manager.is_live());
        }

        #[test]
        fn test_ensure_creates_lazily_then_reuses() {
            let (mut manager, constructions) = counting_manager(Arc::new(AtomicUsize::new(0)));
            let first = manager.ensure(LifecyclePolicy::new()).unwrap().id().to_string();
            assert_eq!(manager.state(), SessionState::Live);
            let second = manager.ensure(LifecyclePolicy::new()).unwrap().id().to_string();
            assert_eq!(first, second);
            assert_eq!(constructions.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_fresh_disposes_old_handle_exactly_once() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, constructions) = counting_manager(closes.clone());
            let first = manager.ensure(LifecyclePolicy::new()).unwrap().id().to_string();
            let second = manager
                .ensure(LifecyclePolicy::new().with_fresh(true))
                .unwrap()
                .id()
                .to_string();
            assert_ne!(first, second);
            assert_eq!(closes.load(Ordering::SeqCst), 1);
            assert_eq!(constructions.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn test_fresh_on_absent_slot_creates_without_disposal() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, _) = counting_manager(closes.clone());
            manager.ensure(LifecyclePolicy::new().with_fresh(true)).unwrap();
            assert_eq!(closes.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn test_after_test_default_disposes() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, _) = counting_manager(closes.clone());
            manager.ensure(LifecyclePolicy::new()).unwrap();
            manager.after_test(LifecyclePolicy::new());
            assert_eq!(manager.state(), SessionState::Absent);
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_after_test_keep_retains_handle() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, constructions) = counting_manager(closes.clone());
            let first = manager.ensure(LifecyclePolicy::new()).unwrap().id().to_string();
            manager.after_test(LifecyclePolicy::new().with_keep(true));
            assert_eq!(manager.state(), SessionState::Live);
            let second = manager.ensure(LifecyclePolicy::new()).unwrap().id().to_string();
            assert_eq!(first, second);
            assert_eq!(constructions.load(Ordering::SeqCst), 1);
            assert_eq!(closes.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn test_after_test_restart_wins_over_keep() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, _) = counting_manager(closes.clone());
            manager.ensure(LifecyclePolicy::new()).unwrap();
            manager.after_test(LifecyclePolicy::new().with_keep(true).with_restart(true));
            assert_eq!(manager.state(), SessionState::Absent);
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_shutdown_disposes_live_session() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, _) = counting_manager(closes.clone());
            manager.ensure(LifecyclePolicy::new()).unwrap();
            manager.shutdown();
            assert_eq!(manager.state(), SessionState::Absent);
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_shutdown_on_absent_performs_no_disposal() {
            let closes = Arc::new(AtomicUsize::new(0));
            let (mut manager, _) = counting_manager(closes.clone());
            manager.shutdown();
            manager.shutdown();
            assert_eq!(closes.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn test_close_failure_is_swallowed_and_slot_cleared() {
            let closes = Arc::new(AtomicUsize::new(0));
            let closes_clone = closes.clone();
            let mut manager = SessionManager::new(move || {
                Ok(Box::new(CountingSession {
                    id: fresh_session_id(),
                    closes: closes_clone.clone(),
                    fail_close: true,
                }) as Box<dyn Session>)
            });
            manager.ensure(LifecyclePolicy::new()).unwrap();
            manager.after_test(LifecyclePolicy::new());
            assert_eq!(manager.state(), SessionState::Absent);
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_construction_failure_propagates_and_slot_stays_absent() {
            let mut healthy = false;
            let mut calls = 0;
            let closes = Arc::new(AtomicUsize::new(0));
            let closes_clone = closes.clone();
            let mut manager = SessionManager::new(move || {
                calls += 1;
                // first construction attempt fails, later ones succeed
                if !healthy {
                    healthy = true;
                    return Err(CeladorError::SessionConstruction {
                        message: "no executor available".to_string(),
                    });
                }
                Ok(Box::new(CountingSession {
                    id: format!("session-{calls}"),
                    closes: closes_clone.clone(),
                    fail_close: false,
                }) as Box<dyn Session>)
            });

            let result = manager.ensure(LifecyclePolicy::new());
            assert!(matches!(
                result,
                Err(CeladorError::SessionConstruction { .. })
            ));
            assert_eq!(manager.state(), SessionState::Absent);

            // the next test can still obtain a session
            let session = manager.ensure(LifecyclePolicy::new()).unwrap();
            assert_eq!(session.id(), "session-2");
        }

        #[test]
        fn test_drop_disposes_live_session() {
            let closes = Arc::new(AtomicUsize::new(0));
            {
                let (mut manager, _) = counting_manager(closes.clone());
                manager.ensure(LifecyclePolicy::new()).unwrap();
            }
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_drop_after_shutdown_does_not_double_dispose() {
            let closes = Arc::new(AtomicUsize::new(0));
            {
                let (mut manager, _) = counting_manager(closes.clone());
                manager.ensure(LifecyclePolicy::new()).unwrap();
                manager.shutdown();
            }
            assert_eq!(closes.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_fresh_session_ids_are_unique() {
            assert_ne!(fresh_session_id(), fresh_session_id());
        }
    }
}
