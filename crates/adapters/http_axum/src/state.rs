//! Shared application state for axum handlers.

use std::sync::Arc;

use crmflow_app::automation_engine::AutomationEngine;
use crmflow_app::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};
use crmflow_app::services::automation_service::AutomationService;
use crmflow_app::services::cadence_service::CadenceService;

/// Application state shared across all axum handlers.
///
/// Generic over the rule repository, the campaign repository and the rule
/// action to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`.
pub struct AppState<RR, CR, A> {
    /// Rule CRUD service.
    pub automation_service: Arc<AutomationService<RR>>,
    /// Rule execution.
    pub automation_engine: Arc<AutomationEngine<RR, A>>,
    /// Cadence service.
    pub cadence_service: Arc<CadenceService<CR>>,
}

impl<RR, CR, A> Clone for AppState<RR, CR, A> {
    fn clone(&self) -> Self {
        Self {
            automation_service: Arc::clone(&self.automation_service),
            automation_engine: Arc::clone(&self.automation_engine),
            cadence_service: Arc::clone(&self.cadence_service),
        }
    }
}

impl<RR, CR, A> AppState<RR, CR, A>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        automation_service: AutomationService<RR>,
        automation_engine: AutomationEngine<RR, A>,
        cadence_service: CadenceService<CR>,
    ) -> Self {
        Self {
            automation_service: Arc::new(automation_service),
            automation_engine: Arc::new(automation_engine),
            cadence_service: Arc::new(cadence_service),
        }
    }
}
