//! JSON handlers for automation rules.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use serde_json::Value;

use crmflow_app::automation_engine::AutomationEngine;
use crmflow_app::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};
use crmflow_domain::automation_rule::{
    AutomationRule, AutomationRuleUpdate, ENTITY_NAME, NewAutomationRule,
};
use crmflow_domain::id::RuleId;
use crmflow_domain::outcome::Validation;

use crate::body::JsonBody;
use crate::error::OutcomeResponse;
use crate::state::AppState;
use crate::tenant::{MissingHeader, TenantContext};

/// `GET /api/rules`: list the tenant's rules.
pub async fn list<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
) -> OutcomeResponse<Vec<AutomationRule>>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    OutcomeResponse::ok(
        state
            .automation_service
            .get_automation_rules(&ctx.tenant_id)
            .await,
    )
}

/// `POST /api/rules`: create a rule owned by the calling tenant and user.
pub async fn create<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    JsonBody(data): JsonBody<NewAutomationRule>,
) -> Result<OutcomeResponse<AutomationRule>, MissingHeader>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let user_id = ctx.user()?;
    let outcome = state
        .automation_service
        .create_automation_rule(data, &ctx.tenant_id, user_id)
        .await;
    Ok(OutcomeResponse::created(outcome))
}

/// `GET /api/rules/{id}`: fetch one rule.
pub async fn get<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> OutcomeResponse<AutomationRule>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let Ok(rule_id) = RuleId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .automation_service
            .get_automation_rule(rule_id, &ctx.tenant_id)
            .await,
    )
}

/// `PATCH /api/rules/{id}`: partially update a rule.
pub async fn update<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<AutomationRuleUpdate>,
) -> OutcomeResponse<AutomationRule>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let Ok(rule_id) = RuleId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .automation_service
            .update_automation_rule(rule_id, &ctx.tenant_id, patch)
            .await,
    )
}

/// `DELETE /api/rules/{id}`: remove a rule.
pub async fn delete<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> OutcomeResponse<()>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let Ok(rule_id) = RuleId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .automation_service
            .delete_automation_rule(rule_id, &ctx.tenant_id)
            .await,
    )
}

/// `POST /api/rules/{id}/execute`: run a rule once.
pub async fn execute<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> OutcomeResponse<()>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let Ok(rule_id) = RuleId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .automation_engine
            .execute_rule(rule_id, &ctx.tenant_id)
            .await,
    )
}

/// `POST /api/rules/validate`: check the shape of a conditions payload.
///
/// Stateless, so no tenant header is needed. Always answers `200`: a body
/// that is not JSON at all is simply invalid conditions.
pub async fn validate<RR, CR, A>(body: Result<Bytes, BytesRejection>) -> Json<Validation>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let conditions = body
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .unwrap_or(Value::Null);
    Json(AutomationEngine::<RR, A>::validate_conditions(&conditions))
}
