//! In-memory port fakes shared by the service and engine tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crmflow_domain::automation_rule::{AutomationRule, ENTITY_NAME, ExecutionResult};
use crmflow_domain::campaign::EmailCampaign;
use crmflow_domain::error::{CrmError, ExecutionError, NotFoundError};
use crmflow_domain::id::{CampaignId, RuleId, TenantId};
use crmflow_domain::time::Timestamp;

use crate::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};

#[derive(Debug)]
struct Offline;

impl std::fmt::Display for Offline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("database is offline")
    }
}

impl std::error::Error for Offline {}

fn offline() -> CrmError {
    CrmError::Storage(Box::new(Offline))
}

fn vanished(id: RuleId) -> CrmError {
    NotFoundError {
        entity: ENTITY_NAME,
        id: id.to_string(),
    }
    .into()
}

#[derive(Default)]
pub struct InMemoryRuleRepo {
    store: Mutex<HashMap<RuleId, AutomationRule>>,
    offline: AtomicBool,
}

impl InMemoryRuleRepo {
    pub fn with(rules: Vec<AutomationRule>) -> Self {
        let map = rules.into_iter().map(|r| (r.id, r)).collect();
        Self {
            store: Mutex::new(map),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every following call fail with a storage error.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self, id: RuleId) -> Option<AutomationRule> {
        self.store.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Drop a rule behind the services' back.
    pub fn remove(&self, id: RuleId) {
        self.store.lock().unwrap().remove(&id);
    }

    fn check(&self) -> Result<(), CrmError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(offline())
        } else {
            Ok(())
        }
    }

    fn with_rule<T>(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        f: impl FnOnce(&mut AutomationRule) -> T,
    ) -> Option<T> {
        let mut store = self.store.lock().unwrap();
        store
            .get_mut(&id)
            .filter(|rule| rule.tenant_id == *tenant_id)
            .map(f)
    }
}

impl AutomationRuleRepository for InMemoryRuleRepo {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, CrmError> {
        self.check()?;
        self.store.lock().unwrap().insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn get_by_id(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> Result<Option<AutomationRule>, CrmError> {
        self.check()?;
        Ok(self.with_rule(id, tenant_id, |rule| rule.clone()))
    }

    async fn get_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<AutomationRule>, CrmError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut rules: Vec<AutomationRule> = store
            .values()
            .filter(|rule| rule.tenant_id == *tenant_id)
            .cloned()
            .collect();
        rules.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rules)
    }

    async fn modify<F>(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        change: F,
    ) -> Result<Option<AutomationRule>, CrmError>
    where
        F: FnOnce(&mut AutomationRule) -> Result<(), CrmError> + Send,
    {
        self.check()?;
        self.with_rule(id, tenant_id, |stored| {
            let mut next = stored.clone();
            change(&mut next)?;
            *stored = next.clone();
            Ok(next)
        })
        .transpose()
    }

    async fn delete(&self, id: RuleId, tenant_id: &TenantId) -> Result<bool, CrmError> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        let owned = store
            .get(&id)
            .is_some_and(|rule| rule.tenant_id == *tenant_id);
        if owned {
            store.remove(&id);
        }
        Ok(owned)
    }

    async fn record_execution_start(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> Result<(), CrmError> {
        self.check()?;
        self.with_rule(id, tenant_id, |rule| {
            rule.execution_count += 1;
            rule.last_executed_at = Some(at);
        })
        .ok_or_else(|| vanished(id))
    }

    async fn record_execution_result(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        result: ExecutionResult,
    ) -> Result<(), CrmError> {
        self.check()?;
        self.with_rule(id, tenant_id, |rule| match result {
            ExecutionResult::Succeeded => rule.success_count += 1,
            ExecutionResult::Failed => rule.error_count += 1,
        })
        .ok_or_else(|| vanished(id))
    }
}

#[derive(Default)]
pub struct InMemoryCampaignRepo {
    store: Mutex<HashMap<CampaignId, EmailCampaign>>,
    offline: AtomicBool,
}

impl InMemoryCampaignRepo {
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self, id: CampaignId) -> Option<EmailCampaign> {
        self.store.lock().unwrap().get(&id).cloned()
    }

    pub fn set_active(&self, id: CampaignId, active: bool) {
        if let Some(campaign) = self.store.lock().unwrap().get_mut(&id) {
            campaign.is_active = active;
        }
    }

    fn check(&self) -> Result<(), CrmError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(offline())
        } else {
            Ok(())
        }
    }
}

impl CampaignRepository for InMemoryCampaignRepo {
    async fn create(&self, campaign: EmailCampaign) -> Result<EmailCampaign, CrmError> {
        self.check()?;
        self.store
            .lock()
            .unwrap()
            .insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    async fn get_by_id(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
    ) -> Result<Option<EmailCampaign>, CrmError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .get(&id)
            .filter(|c| c.tenant_id == *tenant_id)
            .cloned())
    }

    async fn get_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<EmailCampaign>, CrmError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut campaigns: Vec<EmailCampaign> = store
            .values()
            .filter(|c| c.tenant_id == *tenant_id)
            .cloned()
            .collect();
        campaigns.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(campaigns)
    }

    async fn record_send(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> Result<bool, CrmError> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        match store.get_mut(&id).filter(|c| c.tenant_id == *tenant_id) {
            Some(campaign) => {
                campaign.sent_count += 1;
                campaign.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Action that always fails with the given reason.
pub struct FailingAction(pub &'static str);

impl RuleAction for FailingAction {
    async fn run(&self, _rule: &AutomationRule) -> Result<(), ExecutionError> {
        Err(ExecutionError::new(self.0))
    }
}
