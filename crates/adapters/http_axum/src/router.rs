//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crmflow_app::ports::{AutomationRuleRepository, CampaignRepository, RuleAction};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` next to a `/health` check, and includes a
/// [`TraceLayer`] that logs each HTTP request/response at the `DEBUG` level.
pub fn build<RR, CR, A>(state: AppState<RR, CR, A>) -> Router
where
    RR: AutomationRuleRepository + Send + Sync + 'static,
    CR: CampaignRepository + Send + Sync + 'static,
    A: RuleAction + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
