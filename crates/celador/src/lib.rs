//! Celador: test selection and shared-session lifecycle control.
//!
//! Celador (Spanish: "warden") is the controller a browser test harness puts
//! between its test framework and its automation sessions. It decides per
//! test whether the test runs at all given the active driver, platform, and
//! feature-flag state, and it owns the single shared session those tests run
//! against: lazy creation, reuse, forced refresh, and guaranteed teardown at
//! the end of the run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CELADOR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌──────────────────┐     │
//! │   │ Test       │    │ Skip        │    │ Session          │     │
//! │   │ Framework  │───►│ Evaluator   │    │ Lifecycle        │     │
//! │   │ Hooks      │    │ (pure)      │    │ Manager          │     │
//! │   └────────────┘    └─────────────┘    └──────────────────┘     │
//! │         │                                      │                │
//! │         └───────────► Bounded Poller ◄─────────┘                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session itself is opaque: celador never speaks an automation
//! protocol, it only controls whether tests run and how long the shared
//! resource lives.

#![warn(missing_docs)]

/// Declarative skip conditions (drivers, platforms, flag constraints)
pub mod condition;

/// Harness configuration from code or `CELADOR_*` environment variables
pub mod config;

/// Execution context the skip evaluator reads
pub mod context;

/// Platform identification and host detection
pub mod platform;

/// Driver registry and remote construction settings
pub mod registry;

/// Result and error types
pub mod result;

/// Test execution hooks and run reporting
pub mod runner;

/// Shared session lifecycle management
pub mod session;

/// Skip evaluation
pub mod skip;

/// Bounded polling for asynchronous state
pub mod wait;

pub use condition::{DriverId, DriverTarget, FlagConstraint, FlagState, SkipCondition};
pub use config::HarnessConfig;
pub use context::ExecutionContext;
pub use platform::Platform;
pub use registry::{DriverRegistry, RemoteConfig, SessionFactory};
pub use result::{CeladorError, CeladorResult};
pub use runner::{
    init_tracing, Harness, RunSummary, TestCase, TestOutcome, TestStatus, TestSuite,
};
pub use session::{
    fresh_session_id, LifecyclePolicy, Session, SessionManager, SessionState, SessionSupplier,
};
pub use skip::{condition_matches, matching_condition, should_skip, skip_reason};
pub use wait::{wait_until, Poller, WaitOptions};

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::condition::{FlagConstraint, FlagState, SkipCondition};
    pub use crate::context::ExecutionContext;
    pub use crate::platform::Platform;
    pub use crate::result::{CeladorError, CeladorResult};
    pub use crate::runner::{Harness, TestCase, TestStatus, TestSuite};
    pub use crate::session::{LifecyclePolicy, Session, SessionManager};
    pub use crate::skip::should_skip;
    pub use crate::wait::Poller;
}
