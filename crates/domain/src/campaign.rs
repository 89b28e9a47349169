//! Email campaign (cadence): a tenant-owned sending configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CrmError, InactiveError, ValidationError};
use crate::id::{CampaignId, TenantId, UserId};
use crate::time::{Timestamp, now};

/// Name used in not-found / inactive messages.
pub const ENTITY_NAME: &str = "cadence";

/// A tenant-owned email campaign with send statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub id: CampaignId,
    pub tenant_id: TenantId,
    pub created_by: UserId,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub content: String,
    pub sender_name: String,
    pub sender_email: String,
    pub reply_to: String,
    pub track_opens: bool,
    pub track_clicks: bool,
    pub is_active: bool,
    pub sent_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmailCampaign {
    /// Build a fresh campaign from caller data: new id, active, nothing sent.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] if `name` is empty.
    pub fn from_new(
        data: NewEmailCampaign,
        tenant_id: TenantId,
        created_by: UserId,
    ) -> Result<Self, CrmError> {
        let created_at = now();
        let campaign = Self {
            id: CampaignId::new(),
            tenant_id,
            created_by,
            name: data.name,
            description: data.description,
            subject: data.subject,
            content: data.content,
            sender_name: data.sender_name,
            sender_email: data.sender_email,
            reply_to: data.reply_to,
            track_opens: data.track_opens,
            track_clicks: data.track_clicks,
            is_active: true,
            sent_count: 0,
            created_at,
            updated_at: created_at,
        };
        campaign.validate()?;
        Ok(campaign)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), CrmError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Gate for execution: an inactive cadence must not send.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Inactive`] when `is_active` is false.
    pub fn ensure_active(&self) -> Result<(), CrmError> {
        if self.is_active {
            Ok(())
        } else {
            Err(InactiveError {
                entity: ENTITY_NAME,
                id: self.id.to_string(),
            }
            .into())
        }
    }
}

/// Caller-supplied data for a new campaign.
///
/// Text fields default to the empty string, tracking flags to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewEmailCampaign {
    pub name: String,
    pub description: String,
    pub subject: String,
    pub content: String,
    pub sender_name: String,
    pub sender_email: String,
    pub reply_to: String,
    pub track_opens: bool,
    pub track_clicks: bool,
}

impl Default for NewEmailCampaign {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            subject: String::new(),
            content: String::new(),
            sender_name: String::new(),
            sender_email: String::new(),
            reply_to: String::new(),
            track_opens: true,
            track_clicks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_campaign(name: &str) -> NewEmailCampaign {
        NewEmailCampaign {
            name: name.to_string(),
            ..NewEmailCampaign::default()
        }
    }

    #[test]
    fn should_default_optional_fields_when_missing_from_json() {
        let data: NewEmailCampaign =
            serde_json::from_value(serde_json::json!({"name": "Onboarding"})).unwrap();
        let campaign =
            EmailCampaign::from_new(data, TenantId::new("acme"), UserId::new("u")).unwrap();
        assert_eq!(campaign.subject, "");
        assert_eq!(campaign.reply_to, "");
        assert!(campaign.track_opens);
        assert!(campaign.track_clicks);
        assert!(campaign.is_active);
        assert_eq!(campaign.sent_count, 0);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = EmailCampaign::from_new(new_campaign(""), "t".into(), "u".into());
        assert!(matches!(
            result,
            Err(CrmError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_report_inactive_when_campaign_is_disabled() {
        let mut campaign =
            EmailCampaign::from_new(new_campaign("Paused"), "t".into(), "u".into()).unwrap();
        campaign.is_active = false;
        assert_eq!(
            campaign.ensure_active().unwrap_err().to_string(),
            "cadence is inactive"
        );
    }
}
