//! `SQLite` implementation of [`AutomationRuleRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crmflow_app::ports::AutomationRuleRepository;
use crmflow_domain::automation_rule::{AutomationRule, ENTITY_NAME, ExecutionResult, JsonObject};
use crmflow_domain::error::{CrmError, NotFoundError};
use crmflow_domain::id::{RuleId, TenantId, UserId};
use crmflow_domain::time::Timestamp;

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain [`AutomationRule`].
struct Wrapper(AutomationRule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationRule> {
        value.map(|w| w.0)
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(decode)
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let conditions_json: String = row.try_get("trigger_conditions")?;
        let filters_json: String = row.try_get("filters")?;
        let last_executed_at: Option<String> = row.try_get("last_executed_at")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let trigger_conditions: JsonObject =
            serde_json::from_str(&conditions_json).map_err(decode)?;
        let filters: JsonObject = serde_json::from_str(&filters_json).map_err(decode)?;

        Ok(Self(AutomationRule {
            id: RuleId::from_str(&id).map_err(decode)?,
            tenant_id: TenantId::new(row.try_get::<String, _>("tenant_id")?),
            created_by: UserId::new(row.try_get::<String, _>("created_by")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            trigger_type: row.try_get("trigger_type")?,
            trigger_conditions,
            filters,
            delay_minutes: row.try_get("delay_minutes")?,
            priority: row.try_get("priority")?,
            is_active: row.try_get("is_active")?,
            execution_count: row.try_get("execution_count")?,
            success_count: row.try_get("success_count")?,
            error_count: row.try_get("error_count")?,
            last_executed_at: last_executed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO automation_rules (id, tenant_id, created_by, name, description, trigger_type, trigger_conditions, filters, delay_minutes, priority, is_active, execution_count, success_count, error_count, last_executed_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM automation_rules WHERE id = ? AND tenant_id = ?";
const SELECT_BY_TENANT: &str = "SELECT * FROM automation_rules WHERE tenant_id = ? ORDER BY name";
// Counters are never written from here; they only move through the increments below.
const UPDATE: &str = "UPDATE automation_rules SET name = ?, description = ?, trigger_type = ?, trigger_conditions = ?, filters = ?, delay_minutes = ?, priority = ?, is_active = ?, updated_at = ? WHERE id = ? AND tenant_id = ?";
const DELETE: &str = "DELETE FROM automation_rules WHERE id = ? AND tenant_id = ?";
const START_EXECUTION: &str = "UPDATE automation_rules SET execution_count = execution_count + 1, last_executed_at = ? WHERE id = ? AND tenant_id = ?";
const COUNT_SUCCESS: &str =
    "UPDATE automation_rules SET success_count = success_count + 1 WHERE id = ? AND tenant_id = ?";
const COUNT_ERROR: &str =
    "UPDATE automation_rules SET error_count = error_count + 1 WHERE id = ? AND tenant_id = ?";

/// `SQLite`-backed automation rule repository.
#[derive(Clone)]
pub struct SqliteAutomationRuleRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRuleRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn vanished(id: RuleId) -> CrmError {
    NotFoundError {
        entity: ENTITY_NAME,
        id: id.to_string(),
    }
    .into()
}

impl AutomationRuleRepository for SqliteAutomationRuleRepository {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, CrmError> {
        let conditions_json =
            serde_json::to_string(&rule.trigger_conditions).map_err(StorageError::from)?;
        let filters_json = serde_json::to_string(&rule.filters).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(rule.id.to_string())
            .bind(rule.tenant_id.as_str())
            .bind(rule.created_by.as_str())
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(&rule.trigger_type)
            .bind(&conditions_json)
            .bind(&filters_json)
            .bind(rule.delay_minutes)
            .bind(rule.priority)
            .bind(rule.is_active)
            .bind(rule.execution_count)
            .bind(rule.success_count)
            .bind(rule.error_count)
            .bind(rule.last_executed_at.map(|ts| ts.to_rfc3339()))
            .bind(rule.created_at.to_rfc3339())
            .bind(rule.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn get_by_id(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
    ) -> Result<Option<AutomationRule>, CrmError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<AutomationRule>, CrmError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TENANT)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
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
        // Dropping `tx` on any early return rolls it back.
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let Some(Wrapper(mut rule)) = row else {
            return Ok(None);
        };

        change(&mut rule)?;

        let conditions_json =
            serde_json::to_string(&rule.trigger_conditions).map_err(StorageError::from)?;
        let filters_json = serde_json::to_string(&rule.filters).map_err(StorageError::from)?;
        sqlx::query(UPDATE)
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(&rule.trigger_type)
            .bind(&conditions_json)
            .bind(&filters_json)
            .bind(rule.delay_minutes)
            .bind(rule.priority)
            .bind(rule.is_active)
            .bind(rule.updated_at.to_rfc3339())
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(Some(rule))
    }

    async fn delete(&self, id: RuleId, tenant_id: &TenantId) -> Result<bool, CrmError> {
        let result = sqlx::query(DELETE)
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_execution_start(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        at: Timestamp,
    ) -> Result<(), CrmError> {
        let result = sqlx::query(START_EXECUTION)
            .bind(at.to_rfc3339())
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(vanished(id));
        }
        Ok(())
    }

    async fn record_execution_result(
        &self,
        id: RuleId,
        tenant_id: &TenantId,
        result: ExecutionResult,
    ) -> Result<(), CrmError> {
        let query = match result {
            ExecutionResult::Succeeded => COUNT_SUCCESS,
            ExecutionResult::Failed => COUNT_ERROR,
        };
        let result = sqlx::query(query)
            .bind(id.to_string())
            .bind(tenant_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(vanished(id));
        }
        Ok(())
    }
}
