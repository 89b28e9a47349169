//! JSON handlers for email cadences.

use std::str::FromStr;

use axum::extract::{Path, State};

use crmflow_app::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};
use crmflow_domain::campaign::{ENTITY_NAME, EmailCampaign, NewEmailCampaign};
use crmflow_domain::id::CampaignId;

use crate::body::JsonBody;
use crate::error::OutcomeResponse;
use crate::state::AppState;
use crate::tenant::{MissingHeader, TenantContext};

/// `GET /api/cadences`: list the tenant's cadences.
pub async fn list<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
) -> OutcomeResponse<Vec<EmailCampaign>>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    OutcomeResponse::ok(state.cadence_service.get_cadences(&ctx.tenant_id).await)
}

/// `POST /api/cadences`: create a cadence.
pub async fn create<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    JsonBody(data): JsonBody<NewEmailCampaign>,
) -> Result<OutcomeResponse<EmailCampaign>, MissingHeader>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let user_id = ctx.user()?;
    let outcome = state
        .cadence_service
        .create_cadence(data, &ctx.tenant_id, user_id)
        .await;
    Ok(OutcomeResponse::created(outcome))
}

/// `GET /api/cadences/{id}`: fetch one cadence.
pub async fn get<RR, CR, A>(
    State(state): State<AppState<RR, CR, A>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> OutcomeResponse<EmailCampaign>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    let Ok(cadence_id) = CampaignId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .cadence_service
            .get_cadence(cadence_id, &ctx.tenant_id)
            .await,
    )
}

/// `POST /api/cadences/{id}/execute`: send a cadence once.
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
    let Ok(cadence_id) = CampaignId::from_str(&id) else {
        return OutcomeResponse::unknown_id(ENTITY_NAME, id);
    };
    OutcomeResponse::ok(
        state
            .cadence_service
            .execute_cadence(cadence_id, &ctx.tenant_id)
            .await,
    )
}
