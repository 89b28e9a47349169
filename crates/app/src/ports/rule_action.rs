//! Rule action port: what actually happens when a rule executes.

use std::future::Future;

use crmflow_domain::automation_rule::AutomationRule;
use crmflow_domain::error::ExecutionError;

/// Carries out a rule's action.
///
/// The engine counts a failure here against the rule's `error_count`.
pub trait RuleAction {
    fn run(&self, rule: &AutomationRule)
    -> impl Future<Output = Result<(), ExecutionError>> + Send;
}

impl<T: RuleAction + Send + Sync> RuleAction for std::sync::Arc<T> {
    fn run(
        &self,
        rule: &AutomationRule,
    ) -> impl Future<Output = Result<(), ExecutionError>> + Send {
        (**self).run(rule)
    }
}
