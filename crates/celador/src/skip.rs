//! Skip evaluation.
//!
//! Decides whether a test runs given its declared [`SkipCondition`]s and the
//! live [`ExecutionContext`]. Evaluation is a pure function of its inputs:
//! nothing is cached, so re-evaluating after a context mutation reflects the
//! new context immediately.
//!
//! A condition matches when all three of its dimensions accept the context:
//!
//! - driver: the active driver is targeted, or the `All` sentinel is present;
//!   an empty target set matches unconditionally
//! - platform: the platform set is empty or contains the active platform
//! - flags: the constraint accepts the context flag state
//!
//! Conditions attached to one test are unioned: any single match skips.

use crate::condition::{DriverTarget, SkipCondition};
use crate::context::ExecutionContext;

/// Check whether a single condition matches the context
#[must_use]
pub fn condition_matches(condition: &SkipCondition, context: &ExecutionContext) -> bool {
    if condition.drivers.is_empty() {
        return true;
    }
    let driver_matches = condition.drivers.iter().any(|target| match target {
        DriverTarget::All => true,
        DriverTarget::Id(id) => id == context.driver(),
    });
    let platform_matches =
        condition.platforms.is_empty() || condition.platforms.contains(&context.platform());
    driver_matches && platform_matches && condition.flags.is_satisfied_by(context.flags())
}

/// Find the first condition matching the context, if any
#[must_use]
pub fn matching_condition<'a>(
    conditions: &'a [SkipCondition],
    context: &ExecutionContext,
) -> Option<&'a SkipCondition> {
    conditions
        .iter()
        .find(|condition| condition_matches(condition, context))
}

/// Decide whether a test must be skipped.
///
/// An empty condition list never skips.
#[must_use]
pub fn should_skip(conditions: &[SkipCondition], context: &ExecutionContext) -> bool {
    matching_condition(conditions, context).is_some()
}

/// Get the declared reason of the first matching condition, for reporting
#[must_use]
pub fn skip_reason<'a>(
    conditions: &'a [SkipCondition],
    context: &ExecutionContext,
) -> Option<&'a str> {
    matching_condition(conditions, context).and_then(|condition| condition.reason.as_deref())
}
