//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod cadences;
#[allow(clippy::missing_errors_doc)]
pub mod rules;

use axum::Router;
use axum::routing::{get, post};

use crmflow_app::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<RR, CR, A>() -> Router<AppState<RR, CR, A>>
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    Router::new()
        // Rules
        .route(
            "/rules",
            get(rules::list::<RR, CR, A>).post(rules::create::<RR, CR, A>),
        )
        .route("/rules/validate", post(rules::validate::<RR, CR, A>))
        .route(
            "/rules/{id}",
            get(rules::get::<RR, CR, A>)
                .patch(rules::update::<RR, CR, A>)
                .delete(rules::delete::<RR, CR, A>),
        )
        .route("/rules/{id}/execute", post(rules::execute::<RR, CR, A>))
        // Cadences
        .route(
            "/cadences",
            get(cadences::list::<RR, CR, A>).post(cadences::create::<RR, CR, A>),
        )
        .route("/cadences/{id}", get(cadences::get::<RR, CR, A>))
        .route(
            "/cadences/{id}/execute",
            post(cadences::execute::<RR, CR, A>),
        )
}
