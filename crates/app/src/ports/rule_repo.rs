//! Automation rule repository port: tenant-scoped persistence for rules.

use std::future::Future;

use crmflow_domain::automation_rule::{AutomationRule, ExecutionResult};
use crmflow_domain::error::CrmError;
use crmflow_domain::id::{RuleId, TenantId};
use crmflow_domain::time::Timestamp;

/// Repository for persisting and querying [`AutomationRule`]s.
///
/// Every lookup is keyed by `(id, tenant_id)`: a rule owned by another
/// tenant behaves exactly like a missing one. Each method is atomic;
/// implementations commit on success and roll back on any error.
pub trait AutomationRuleRepository {
    /// Insert a new rule.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, CrmError>> + Send;

    /// Get a rule by id within a tenant.
    fn get_by_id(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, CrmError>> + Send;

    /// Get every rule owned by a tenant, ordered by name.
    fn get_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, CrmError>> + Send;

    /// Read a rule, let `change` mutate it, and write it back in one transaction.
    ///
    /// Returns `Ok(None)` when no rule matches. If `change` fails nothing is
    /// written and its error is returned.
    fn modify<F>(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        change: F,
    ) -> impl Future<Output = Result<Option<AutomationRule>, CrmError>> + Send
    where
        F: FnOnce(&mut AutomationRule) -> Result<(), CrmError> + Send;

    /// Delete a rule. Returns `false` when no rule matched.
    fn delete(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<bool, CrmError>> + Send;

    /// Count an execution attempt and stamp `last_executed_at`.
    ///
    /// Must be an in-place increment so concurrent executions never lose counts.
    fn record_execution_start(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CrmError>> + Send;

    /// Count how an execution attempt ended (success or error counter).
    fn record_execution_result(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        result: ExecutionResult,
    ) -> impl Future<Output = Result<(), CrmError>> + Send;
}

impl<T: AutomationRuleRepository + Send + Sync> AutomationRuleRepository for std::sync::Arc<T> {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, CrmError>> + Send {
        (**self).create(rule)
    }

    fn get_by_id(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, CrmError>> + Send {
        (**self).get_by_id(id, tenant_id)
    }

    fn get_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, CrmError>> + Send {
        (**self).get_by_tenant(tenant_id)
    }

    fn modify<F>(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        change: F,
    ) -> impl Future<Output = Result<Option<AutomationRule>, CrmError>> + Send
    where
        F: FnOnce(&mut AutomationRule) -> Result<(), CrmError> + Send,
    {
        (**self).modify(id, tenant_id, change)
    }

    fn delete(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<bool, CrmError>> + Send {
        (**self).delete(id, tenant_id)
    }

    fn record_execution_start(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CrmError>> + Send {
        (**self).record_execution_start(id, tenant_id, at)
    }

    fn record_execution_result(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        result: ExecutionResult,
    ) -> impl Future<Output = Result<(), CrmError>> + Send {
        (**self).record_execution_result(id, tenant_id, result)
    }
}
