//! Cadence service: use-cases for email campaigns.

use crmflow_domain::campaign::{ENTITY_NAME, EmailCampaign, NewEmailCampaign};
use crmflow_domain::error::{CrmError, NotFoundError};
use crmflow_domain::id::{CampaignId, TenantId, UserId};
use crmflow_domain::outcome::Outcome;
use crmflow_domain::time::now;

use crate::ports::CampaignRepository;
use crate::services::{report, report_done};

/// Application service for email cadences.
pub struct CadenceService<R> {
    repo: R,
}

impl<R: CampaignRepository> CadenceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a cadence with a fresh id, active, and nothing sent yet.
    #[tracing::instrument(skip(self, data), fields(cadence_name = %data.name))]
    pub async fn create_cadence(
        &self,
        data: NewEmailCampaign,
        tenant_id: &TenantId,
        user_id: &UserId,
    ) -> Outcome<EmailCampaign> {
        let result = async {
            let campaign = EmailCampaign::from_new(data, tenant_id.clone(), user_id.clone())?;
            self.repo.create(campaign).await
        }
        .await;
        report(result, "cadence created")
    }

    /// List every cadence owned by the tenant.
    #[tracing::instrument(skip(self))]
    pub async fn get_cadences(&self, tenant_id: &TenantId) -> Outcome<Vec<EmailCampaign>> {
        report(self.repo.get_by_tenant(tenant_id).await, "cadences fetched")
    }

    /// Fetch a single cadence.
    #[tracing::instrument(skip(self))]
    pub async fn get_cadence(
        &self,
        cadence_id: CampaignId,
        tenant_id: &TenantId,
    ) -> Outcome<EmailCampaign> {
        let result = async {
            self.repo
                .get_by_id(cadence_id, tenant_id)
                .await?
                .ok_or_else(|| not_found(cadence_id))
        }
        .await;
        report(result, "cadence fetched")
    }

    /// "Send" the cadence once: only the `sent_count` statistic moves.
    #[tracing::instrument(skip(self))]
    pub async fn execute_cadence(
        &self,
        cadence_id: CampaignId,
        tenant_id: &TenantId,
    ) -> Outcome<()> {
        let result = async {
            let campaign = self
                .repo
                .get_by_id(cadence_id, tenant_id)
                .await?
                .ok_or_else(|| not_found(cadence_id))?;
            campaign.ensure_active()?;

            tracing::info!(
                cadence_id = %cadence_id,
                subject = %campaign.subject,
                "executing cadence"
            );
            if self.repo.record_send(cadence_id, tenant_id, now()).await? {
                Ok(())
            } else {
                Err(not_found(cadence_id))
            }
        }
        .await;
        report_done(result, "cadence executed")
    }
}

fn not_found(cadence_id: CampaignId) -> CrmError {
    NotFoundError {
        entity: ENTITY_NAME,
        id: cadence_id.to_string(),
    }
    .into()
}
