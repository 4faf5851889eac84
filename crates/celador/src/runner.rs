//! Test execution hooks and run reporting.
//!
//! The harness here plays the role of the surrounding test framework: before
//! each test it obtains the shared session and consults the skip evaluator,
//! after each test it applies the lifecycle policy, and after the whole
//! suite it shuts the session down exactly once, however many tests failed.
//! Skipped tests are reported as their own status, distinguishable from both
//! pass and fail.

use crate::condition::SkipCondition;
use crate::context::ExecutionContext;
use crate::result::CeladorResult;
use crate::session::{fresh_session_id, LifecyclePolicy, Session, SessionManager};
use crate::skip;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Install a default tracing subscriber for harness output.
///
/// Filtering follows `RUST_LOG`. Safe to call repeatedly; only the first
/// call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =============================================================================
// TEST MODEL
// =============================================================================

/// Body of a test, driven against the shared session
pub type TestBody = Box<dyn FnMut(&mut dyn Session) -> CeladorResult<()>>;

/// A single test: a body plus its skip conditions and lifecycle policy
pub struct TestCase {
    /// Test name
    pub name: String,
    /// Declared skip conditions, unioned at evaluation time
    pub conditions: Vec<SkipCondition>,
    /// Lifecycle policy applied around this test
    pub policy: LifecyclePolicy,
    body: TestBody,
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("conditions", &self.conditions)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// Create a test case from a name and body
    #[must_use]
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut dyn Session) -> CeladorResult<()> + 'static,
    {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            policy: LifecyclePolicy::default(),
            body: Box::new(body),
        }
    }

    /// Attach a skip condition
    #[must_use]
    pub fn with_condition(mut self, condition: SkipCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the lifecycle policy
    #[must_use]
    pub fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A test suite containing multiple tests
#[derive(Debug)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Terminal status of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test body ran and succeeded
    Passed,
    /// Test body or session construction failed
    Failed,
    /// Test body was deliberately not executed
    Skipped,
}

impl TestStatus {
    /// Get the status name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running (or deliberately not running) a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test name
    pub name: String,
    /// Terminal status
    pub status: TestStatus,
    /// Failure message when the status is `Failed`
    pub error: Option<String>,
    /// Declared reason when the status is `Skipped`
    pub skip_reason: Option<String>,
    /// Wall-clock duration of the before/body/after sequence
    pub duration: Duration,
}

impl TestOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            error: None,
            skip_reason: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            error: Some(error.into()),
            skip_reason: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skip(name: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            error: None,
            skip_reason: reason,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results of a whole suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier of this run
    pub run_id: String,
    /// Suite name
    pub suite_name: String,
    /// Per-test outcomes, in execution order
    pub outcomes: Vec<TestOutcome>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Total wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    /// Count of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Count of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Count of skipped tests
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Total number of recorded outcomes
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every executed test passed (skips do not fail a run)
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// The failing outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&TestOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == TestStatus::Failed)
            .collect()
    }

    /// Serialize the summary to JSON for report sinks
    pub fn to_json(&self) -> CeladorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, status: TestStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == status)
            .count()
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Suite runner wiring the skip evaluator and session lifecycle together
pub struct Harness {
    context: ExecutionContext,
    manager: SessionManager,
    fail_fast: bool,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("context", &self.context)
            .field("manager", &self.manager)
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

impl Harness {
    /// Create a harness from a context and a session manager
    #[must_use]
    pub fn new(context: ExecutionContext, manager: SessionManager) -> Self {
        Self {
            context,
            manager,
            fail_fast: false,
        }
    }

    /// Stop the run at the first failing test
    #[must_use]
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Get the execution context
    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Mutate the execution context between tests
    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.context
    }

    /// Run a suite to completion and tear the shared session down.
    ///
    /// Teardown runs exactly once per call, regardless of failures or an
    /// early `fail_fast` stop.
    pub fn run(&mut self, suite: &mut TestSuite) -> RunSummary {
        let run_id = fresh_session_id();
        let started_at = Utc::now();
        let started = Instant::now();
        tracing::debug!(run_id = %run_id, suite = %suite.name, tests = suite.test_count(), "run started");

        let mut outcomes = Vec::with_capacity(suite.tests.len());
        for test in &mut suite.tests {
            let outcome = Self::execute(&self.context, &mut self.manager, test);
            let failed = outcome.status == TestStatus::Failed;
            outcomes.push(outcome);
            if failed && self.fail_fast {
                break;
            }
        }

        self.manager.shutdown();

        RunSummary {
            run_id,
            suite_name: suite.name.clone(),
            outcomes,
            started_at,
            finished_at: Utc::now(),
            duration: started.elapsed(),
        }
    }

    /// Before-each, body, after-each for one test
    fn execute(
        context: &ExecutionContext,
        manager: &mut SessionManager,
        test: &mut TestCase,
    ) -> TestOutcome {
        let started = Instant::now();
        let outcome = match manager.ensure(test.policy) {
            Err(error) => {
                tracing::warn!(test = %test.name, %error, "session construction failed");
                TestOutcome::fail(test.name.as_str(), error.to_string())
            }
            Ok(session) => {
                if skip::should_skip(&test.conditions, context) {
                    let reason =
                        skip::skip_reason(&test.conditions, context).map(str::to_string);
                    tracing::debug!(test = %test.name, reason = reason.as_deref(), "skipped");
                    TestOutcome::skip(test.name.as_str(), reason)
                } else {
                    match (test.body)(session) {
                        Ok(()) => TestOutcome::pass(test.name.as_str()),
                        Err(error) => {
                            tracing::warn!(test = %test.name, %error, "test failed");
                            TestOutcome::fail(test.name.as_str(), error.to_string())
                        }
                    }
                }
            }
        };
        manager.after_test(test.policy);
        outcome.with_duration(started.elapsed())
    }
}
