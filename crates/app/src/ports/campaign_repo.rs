//! Campaign repository port: tenant-scoped persistence for email cadences.

use std::future::Future;

use crmflow_domain::campaign::EmailCampaign;
use crmflow_domain::error::CrmError;
use crmflow_domain::id::{CampaignId, TenantId};
use crmflow_domain::time::Timestamp;

/// Repository for persisting and querying [`EmailCampaign`]s.
pub trait CampaignRepository {
    /// Insert a new campaign.
    fn create(
        &self,
        campaign: EmailCampaign,
    ) -> impl Future<Output = Result<EmailCampaign, CrmError>> + Send;

    /// Get a campaign by id within a tenant.
    fn get_by_id(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Option<EmailCampaign>, CrmError>> + Send;

    /// Get every campaign owned by a tenant, ordered by name.
    fn get_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Vec<EmailCampaign>, CrmError>> + Send;

    /// Increment `sent_count` in place. Returns `false` when no campaign matched.
    fn record_send(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, CrmError>> + Send;
}

impl<T: CampaignRepository + Send + Sync> CampaignRepository for std::sync::Arc<T> {
    fn create(
        &self,
        campaign: EmailCampaign,
    ) -> impl Future<Output = Result<EmailCampaign, CrmError>> + Send {
        (**self).create(campaign)
    }

    fn get_by_id(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Option<EmailCampaign>, CrmError>> + Send {
        (**self).get_by_id(id, tenant_id)
    }

    fn get_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> impl Future<Output = Result<Vec<EmailCampaign>, CrmError>> + Send {
        (**self).get_by_tenant(tenant_id)
    }

    fn record_send(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, CrmError>> + Send {
        (**self).record_send(id, tenant_id, at)
    }
}
