//! Automation service: use-cases for managing automation rules.

use crmflow_domain::automation_rule::{
    AutomationRule, AutomationRuleUpdate, ENTITY_NAME, NewAutomationRule,
};
use crmflow_domain::error::{CrmError, NotFoundError};
use crmflow_domain::id::{RuleId, TenantId, UserId};
use crmflow_domain::outcome::Outcome;
use crmflow_domain::time::now;

use crate::ports::AutomationRuleRepository;
use crate::services::{report, report_done};

/// Application service for tenant-scoped rule CRUD.
pub struct AutomationService<R> {
    repo: R,
}

impl<R: AutomationRuleRepository> AutomationService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a rule with a fresh id, active, and zeroed counters.
    #[tracing::instrument(skip(self, data), fields(rule_name = %data.name))]
    pub async fn create_automation_rule(
        &self,
        data: NewAutomationRule,
        tenant_id: &TenantId,
        user_id: &UserId,
    ) -> Outcome<AutomationRule> {
        let result = async {
            let rule = AutomationRule::from_new(data, tenant_id.clone(), user_id.clone())?;
            self.repo.create(rule).await
        }
        .await;
        report(result, "rule created")
    }

    /// List every rule owned by the tenant.
    #[tracing::instrument(skip(self))]
    pub async fn get_automation_rules(&self, tenant_id: &TenantId) -> Outcome<Vec<AutomationRule>> {
        report(self.repo.get_by_tenant(tenant_id).await, "rules fetched")
    }

    /// Fetch a single rule.
    #[tracing::instrument(skip(self))]
    pub async fn get_automation_rule(
        &self,
        rule_id: RuleId,
        tenant_id: &TenantId,
    ) -> Outcome<AutomationRule> {
        let result = async {
            self.repo
                .get_by_id(rule_id, tenant_id)
                .await?
                .ok_or_else(|| not_found(rule_id))
        }
        .await;
        report(result, "rule fetched")
    }

    /// Overwrite the fields present in `patch`; `updated_at` is refreshed.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_automation_rule(
        &self,
        rule_id: RuleId,
        tenant_id: &TenantId,
        patch: AutomationRuleUpdate,
    ) -> Outcome<AutomationRule> {
        let result = async {
            self.repo
                .modify(rule_id, tenant_id, move |rule| rule.apply(patch, now()))
                .await?
                .ok_or_else(|| not_found(rule_id))
        }
        .await;
        report(result, "rule updated")
    }

    /// Remove a rule.
    #[tracing::instrument(skip(self))]
    pub async fn delete_automation_rule(
        &self,
        rule_id: RuleId,
        tenant_id: &TenantId,
    ) -> Outcome<()> {
        let result = async {
            if self.repo.delete(rule_id, tenant_id).await? {
                Ok(())
            } else {
                Err(not_found(rule_id))
            }
        }
        .await;
        report_done(result, "rule deleted")
    }
}

fn not_found(rule_id: RuleId) -> CrmError {
    NotFoundError {
        entity: ENTITY_NAME,
        id: rule_id.to_string(),
    }
    .into()
}
