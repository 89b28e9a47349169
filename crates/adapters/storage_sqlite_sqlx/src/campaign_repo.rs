//! `SQLite` implementation of [`CampaignRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crmflow_app::ports::CampaignRepository;
use crmflow_domain::campaign::EmailCampaign;
use crmflow_domain::error::CrmError;
use crmflow_domain::id::{CampaignId, TenantId, UserId};
use crmflow_domain::time::Timestamp;

use crate::error::{StorageError, decode};
use crate::rule_repo::parse_timestamp;

struct Wrapper(EmailCampaign);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(EmailCampaign {
            id: CampaignId::from_str(&id).map_err(decode)?,
            tenant_id: TenantId::new(row.try_get::<String, _>("tenant_id")?),
            created_by: UserId::new(row.try_get::<String, _>("created_by")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            subject: row.try_get("subject")?,
            content: row.try_get("content")?,
            sender_name: row.try_get("sender_name")?,
            sender_email: row.try_get("sender_email")?,
            reply_to: row.try_get("reply_to")?,
            track_opens: row.try_get("track_opens")?,
            track_clicks: row.try_get("track_clicks")?,
            is_active: row.try_get("is_active")?,
            sent_count: row.try_get("sent_count")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO email_campaigns (id, tenant_id, created_by, name, description, subject, content, sender_name, sender_email, reply_to, track_opens, track_clicks, is_active, sent_count, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM email_campaigns WHERE id = ? AND tenant_id = ?";
const SELECT_BY_TENANT: &str = "SELECT * FROM email_campaigns WHERE tenant_id = ? ORDER BY name";
const RECORD_SEND: &str = "UPDATE email_campaigns SET sent_count = sent_count + 1, updated_at = ? WHERE id = ? AND tenant_id = ?";

/// `SQLite`-backed email campaign repository.
#[derive(Clone)]
pub struct SqliteCampaignRepository {
    pool: SqlitePool,
}

impl SqliteCampaignRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CampaignRepository for SqliteCampaignRepository {
    async fn create(&self, campaign: EmailCampaign) -> Result<EmailCampaign, CrmError> {
        sqlx::query(INSERT)
            .bind(campaign.id.to_string())
            .bind(campaign.tenant_id.as_str())
            .bind(campaign.created_by.as_str())
            .bind(&campaign.name)
            .bind(&campaign.description)
            .bind(&campaign.subject)
            .bind(&campaign.content)
            .bind(&campaign.sender_name)
            .bind(&campaign.sender_email)
            .bind(&campaign.reply_to)
            .bind(campaign.track_opens)
            .bind(campaign.track_clicks)
            .bind(campaign.is_active)
            .bind(campaign.sent_count)
            .bind(campaign.created_at.to_rfc3339())
            .bind(campaign.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(campaign)
    }

    async fn get_by_id(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
    ) -> Result<Option<EmailCampaign>, CrmError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn get_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<EmailCampaign>, CrmError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TENANT)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn record_send(
        &self,
        id: CampaignId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> Result<bool, CrmError> {
        let result = sqlx::query(RECORD_SEND)
            .bind(at.to_rfc3339())
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
