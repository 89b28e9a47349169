//! Automation rule: a tenant-owned trigger description with execution statistics.
//!
//! Rules are created through [`AutomationRule::builder`] (or from a
//! caller-supplied [`NewAutomationRule`]), partially updated with an
//! [`AutomationRuleUpdate`], and executed by the application engine. The
//! execution counters are only ever moved by storage, as in-place increments.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CrmError, InactiveError, ValidationError};
use crate::id::{RuleId, TenantId, UserId};
use crate::time::{Timestamp, now};

/// Name used in not-found / inactive messages.
pub const ENTITY_NAME: &str = "rule";

/// A JSON object, used for trigger conditions and filters.
pub type JsonObject = Map<String, Value>;

/// A tenant-owned automation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub tenant_id: TenantId,
    pub created_by: UserId,
    pub name: String,
    pub description: String,
    pub trigger_type: String,
    pub trigger_conditions: JsonObject,
    pub filters: JsonObject,
    pub delay_minutes: u32,
    pub priority: i32,
    pub is_active: bool,
    pub execution_count: u32,
    pub success_count: u32,
    pub error_count: u32,
    pub last_executed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// How a single execution attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    Succeeded,
    Failed,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Build a fresh rule from caller data: new id, active, zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] if `name` or `trigger_type` is empty.
    pub fn from_new(
        data: NewAutomationRule,
        tenant_id: TenantId,
        created_by: UserId,
    ) -> Result<Self, CrmError> {
        Self::builder()
            .tenant_id(tenant_id)
            .created_by(created_by)
            .name(data.name)
            .description(data.description)
            .trigger_type(data.trigger_type)
            .trigger_conditions(data.trigger_conditions)
            .filters(data.filters)
            .delay_minutes(data.delay_minutes)
            .priority(data.priority)
            .build()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `trigger_type` is empty ([`ValidationError::EmptyTriggerType`])
    pub fn validate(&self) -> Result<(), CrmError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.trigger_type.trim().is_empty() {
            return Err(ValidationError::EmptyTriggerType.into());
        }
        Ok(())
    }

    /// Gate for execution: an inactive rule must not run.
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

    /// Overwrite the fields present in `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] if the patched rule breaks an invariant.
    /// The rule is left untouched in that case.
    pub fn apply(&mut self, patch: AutomationRuleUpdate, at: Timestamp) -> Result<(), CrmError> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        if let Some(trigger_conditions) = patch.trigger_conditions {
            next.trigger_conditions = trigger_conditions;
        }
        if let Some(filters) = patch.filters {
            next.filters = filters;
        }
        if let Some(delay_minutes) = patch.delay_minutes {
            next.delay_minutes = delay_minutes;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        next.validate()?;
        next.updated_at = at;
        *self = next;
        Ok(())
    }
}

/// Caller-supplied data for a new rule. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewAutomationRule {
    pub name: String,
    pub description: String,
    pub trigger_type: String,
    pub trigger_conditions: JsonObject,
    pub filters: JsonObject,
    pub delay_minutes: u32,
    pub priority: i32,
}

impl Default for NewAutomationRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            trigger_type: String::new(),
            trigger_conditions: JsonObject::new(),
            filters: JsonObject::new(),
            delay_minutes: 0,
            priority: 1,
        }
    }
}

/// Partial update. `None` means "leave as is"; unknown keys are ignored on
/// deserialization, which restricts updates to these fields.
///
/// A key that is present must carry a value: `null` is rejected rather than
/// being read as "absent".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AutomationRuleUpdate {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub trigger_conditions: Option<JsonObject>,
    #[serde(default, deserialize_with = "present")]
    pub filters: Option<JsonObject>,
    #[serde(default, deserialize_with = "present")]
    pub delay_minutes: Option<u32>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<i32>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    tenant_id: Option<TenantId>,
    created_by: Option<UserId>,
    name: Option<String>,
    description: Option<String>,
    trigger_type: Option<String>,
    trigger_conditions: Option<JsonObject>,
    filters: Option<JsonObject>,
    delay_minutes: Option<u32>,
    priority: Option<i32>,
    is_active: Option<bool>,
    created_at: Option<Timestamp>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn created_by(mut self, created_by: UserId) -> Self {
        self.created_by = Some(created_by);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn trigger_type(mut self, trigger_type: impl Into<String>) -> Self {
        self.trigger_type = Some(trigger_type.into());
        self
    }

    #[must_use]
    pub fn trigger_conditions(mut self, conditions: JsonObject) -> Self {
        self.trigger_conditions = Some(conditions);
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: JsonObject) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn delay_minutes(mut self, delay_minutes: u32) -> Self {
        self.delay_minutes = Some(delay_minutes);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<AutomationRule, CrmError> {
        let created_at = self.created_at.unwrap_or_else(now);
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            tenant_id: self.tenant_id.unwrap_or_else(|| TenantId::new("")),
            created_by: self.created_by.unwrap_or_else(|| UserId::new("")),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            trigger_type: self.trigger_type.unwrap_or_default(),
            trigger_conditions: self.trigger_conditions.unwrap_or_default(),
            filters: self.filters.unwrap_or_default(),
            delay_minutes: self.delay_minutes.unwrap_or(0),
            priority: self.priority.unwrap_or(1),
            is_active: self.is_active.unwrap_or(true),
            execution_count: 0,
            success_count: 0,
            error_count: 0,
            last_executed_at: None,
            created_at,
            updated_at: created_at,
        };
        rule.validate()?;
        Ok(rule)
    }
}
