//! Automation engine: executes a single rule on demand.
//!
//! Execution is always driven from outside (a direct call or an HTTP
//! request); there is no scheduler. An execution is recorded in two steps:
//! the attempt is counted and stamped *before* the [`RuleAction`] runs, and
//! its success or failure is counted *after*. Both steps are in-place
//! increments in storage, so `execution_count == success_count + error_count`
//! holds once every attempt has completed.

use serde_json::Value;

use crmflow_domain::automation_rule::{AutomationRule, ENTITY_NAME, ExecutionResult};
use crmflow_domain::error::{CrmError, ExecutionError, NotFoundError, ValidationError};
use crmflow_domain::id::{RuleId, TenantId};
use crmflow_domain::outcome::{Outcome, Validation};
use crmflow_domain::time::now;

use crate::ports::{AutomationRuleRepository, RuleAction};
use crate::services::report_done;

/// Executes automation rules against a [`RuleAction`].
pub struct AutomationEngine<R, A> {
    repo: R,
    action: A,
}

impl<R, A> AutomationEngine<R, A> {
    /// Check the shape of a conditions payload: only a JSON object is valid.
    #[must_use]
    pub fn validate_conditions(conditions: &Value) -> Validation {
        if conditions.is_object() {
            Validation::valid("conditions are valid")
        } else {
            Validation::invalid(ValidationError::ConditionsNotAnObject.to_string())
        }
    }
}

impl<R, A> AutomationEngine<R, A>
where
    R: AutomationRuleRepository,
    A: RuleAction,
{
    /// Create a new engine.
    pub fn new(repo: R, action: A) -> Self {
        Self { repo, action }
    }

    /// Execute the rule `rule_id` owned by `tenant_id`.
    ///
    /// Missing and inactive rules are rejected without touching any counter.
    #[tracing::instrument(skip(self))]
    pub async fn execute_rule(&self, rule_id: RuleId, tenant_id: &TenantId) -> Outcome<()> {
        report_done(self.try_execute(rule_id, tenant_id).await, "rule executed")
    }

    async fn try_execute(&self, rule_id: RuleId, tenant_id: &TenantId) -> Result<(), CrmError> {
        let rule = self
            .repo
            .get_by_id(rule_id, tenant_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: ENTITY_NAME,
                id: rule_id.to_string(),
            })?;
        rule.ensure_active()?;

        self.repo
            .record_execution_start(rule_id, tenant_id, now())
            .await?;

        match self.action.run(&rule).await {
            Ok(()) => {
                self.repo
                    .record_execution_result(rule_id, tenant_id, ExecutionResult::Succeeded)
                    .await?;
                tracing::info!(rule_id = %rule_id, "rule executed");
                Ok(())
            }
            Err(err) => {
                self.repo
                    .record_execution_result(rule_id, tenant_id, ExecutionResult::Failed)
                    .await?;
                Err(err.into())
            }
        }
    }
}

/// Default action: log the rule and succeed.
///
/// Stands in for the real rule-matching / messaging logic, which lives
/// outside this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRuleAction;

impl RuleAction for LoggingRuleAction {
    async fn run(&self, rule: &AutomationRule) -> Result<(), ExecutionError> {
        tracing::info!(
            rule_id = %rule.id,
            tenant_id = %rule.tenant_id,
            trigger_type = %rule.trigger_type,
            "executing automation rule"
        );
        Ok(())
    }
}
