//! End-to-end tests for the full crmflowd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`; no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use crmflow_adapter_http_axum::router;
use crmflow_adapter_http_axum::state::AppState;
use crmflow_adapter_storage_sqlite_sqlx::{
    Config, SqliteAutomationRuleRepository, SqliteCampaignRepository,
};
use crmflow_app::automation_engine::{AutomationEngine, LoggingRuleAction};
use crmflow_app::ports::RuleAction;
use crmflow_app::services::automation_service::AutomationService;
use crmflow_app::services::cadence_service::CadenceService;
use crmflow_domain::automation_rule::AutomationRule;
use crmflow_domain::error::ExecutionError;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct RejectingAction;

impl RuleAction for RejectingAction {
    async fn run(&self, _rule: &AutomationRule) -> Result<(), ExecutionError> {
        Err(ExecutionError::new("mail relay refused"))
    }
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app_with<A: RuleAction + Send + Sync + 'static>(action: A) -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    let rule_repo = Arc::new(SqliteAutomationRuleRepository::new(pool.clone()));
    let state = AppState::new(
        AutomationService::new(Arc::clone(&rule_repo)),
        AutomationEngine::new(rule_repo, action),
        CadenceService::new(SqliteCampaignRepository::new(pool)),
    );

    router::build(state)
}

async fn app() -> axum::Router {
    app_with(LoggingRuleAction).await
}

fn call(method: &str, uri: &str, tenant: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Tenant-Id", tenant)
        .header("X-User-Id", "user-1");
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create_rule(app: &axum::Router, tenant: &str, name: &str) -> Value {
    let payload = json!({
        "name": name,
        "description": "Send welcome sequence",
        "trigger_type": "lead_created",
        "trigger_conditions": {"source": "web"},
        "delay_minutes": 15,
    });
    let (status, body) = send(app, call("POST", "/api/rules", tenant, Some(payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

async fn rule_stats(app: &axum::Router, tenant: &str, id: &str) -> (u64, u64, u64) {
    let (_, body) = send(app, call("GET", &format!("/api/rules/{id}"), tenant, None)).await;
    let data = &body["data"];
    (
        data["execution_count"].as_u64().unwrap(),
        data["success_count"].as_u64().unwrap(),
        data["error_count"].as_u64().unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_rule_then_list_it() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;

    assert_eq!(rule["is_active"], true);
    assert_eq!(rule["priority"], 1);
    assert_eq!(rule["execution_count"], 0);
    assert_eq!(rule["created_by"], "user-1");
    assert!(rule["last_executed_at"].is_null());

    let (status, body) = send(&app, call("GET", "/api/rules", "acme", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "rules fetched");
    assert_eq!(body["data"], json!([rule]));
}

#[tokio::test]
async fn should_execute_active_rule_and_count_success() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let id = rule["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        call("POST", &format!("/api/rules/{id}/execute"), "acme", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "rule executed"}));
    assert_eq!(rule_stats(&app, "acme", id).await, (1, 1, 0));
}

#[tokio::test]
async fn should_count_error_when_action_fails() {
    let app = app_with(RejectingAction).await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let id = rule["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        call("POST", &format!("/api/rules/{id}/execute"), "acme", None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "execution");
    assert_eq!(rule_stats(&app, "acme", id).await, (1, 0, 1));
}

#[tokio::test]
async fn should_refuse_inactive_rule_without_counting() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let id = rule["id"].as_str().unwrap();
    let uri = format!("/api/rules/{id}");

    let (status, _) = send(
        &app,
        call("PATCH", &uri, "acme", Some(json!({"is_active": false}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, call("POST", &format!("{uri}/execute"), "acme", None)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "rule is inactive");
    assert_eq!(rule_stats(&app, "acme", id).await, (0, 0, 0));
}

#[tokio::test]
async fn should_update_only_given_fields() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let id = rule["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        call(
            "PATCH",
            &format!("/api/rules/{id}"),
            "acme",
            Some(json!({"name": "Welcome v2", "execution_count": 99})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "rule updated");
    let updated = &body["data"];
    assert_eq!(updated["name"], "Welcome v2");
    assert_eq!(updated["execution_count"], 0);
    assert_eq!(updated["description"], rule["description"]);
    assert_eq!(updated["trigger_conditions"], rule["trigger_conditions"]);
    assert_eq!(updated["created_at"], rule["created_at"]);
}

#[tokio::test]
async fn should_reject_create_body_of_the_wrong_shape() {
    let app = app().await;
    let payload = json!({"name": "X", "trigger_type": "t", "delay_minutes": -1});

    let (status, body) = send(&app, call("POST", "/api/rules", "acme", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "validation");
    let (_, body) = send(&app, call("GET", "/api/rules", "acme", None)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn should_reject_patch_with_wrong_shape_or_null() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let uri = format!("/api/rules/{}", rule["id"].as_str().unwrap());

    for patch in [
        json!({"trigger_conditions": []}),
        json!({"description": null}),
        json!({"is_active": null}),
    ] {
        let (status, body) = send(&app, call("PATCH", &uri, "acme", Some(patch))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    let (_, body) = send(&app, call("GET", &uri, "acme", None)).await;
    assert_eq!(body["data"], rule);
}

#[tokio::test]
async fn should_reject_body_that_is_not_json() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/cadences")
        .header("X-Tenant-Id", "acme")
        .header("X-User-Id", "user-1")
        .header("content-type", "application/json")
        .body(Body::from("name=Intro"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn should_answer_validate_for_any_body() {
    let app = app().await;

    for (raw, valid) in [
        ("[]", false),
        ("not json", false),
        ("", false),
        (r#"{"a": 1}"#, true),
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/rules/validate")
            .body(Body::from(raw))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], valid);
    }
}

#[tokio::test]
async fn should_delete_rule_once() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let uri = format!("/api/rules/{}", rule["id"].as_str().unwrap());

    let (status, body) = send(&app, call("DELETE", &uri, "acme", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "rule deleted");

    let (status, body) = send(&app, call("DELETE", &uri, "acme", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "rule not found");
}

#[tokio::test]
async fn should_isolate_rules_between_tenants() {
    let app = app().await;
    let rule = create_rule(&app, "acme", "Welcome").await;
    let id = rule["id"].as_str().unwrap();

    let (_, body) = send(&app, call("GET", "/api/rules", "globex", None)).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(
        &app,
        call("POST", &format!("/api/rules/{id}/execute"), "globex", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        call("DELETE", &format!("/api/rules/{id}"), "globex", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(rule_stats(&app, "acme", id).await, (0, 0, 0));
}

// ---------------------------------------------------------------------------
// Cadences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_and_execute_cadence() {
    let app = app().await;
    let payload = json!({"name": "Intro", "subject": "Hello", "sender_email": "sales@acme.test"});

    let (status, body) = send(&app, call("POST", "/api/cadences", "acme", Some(payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["sent_count"], 0);
    assert_eq!(body["data"]["track_opens"], true);
    let uri = format!("/api/cadences/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, call("POST", &format!("{uri}/execute"), "acme", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "cadence executed");

    let (_, body) = send(&app, call("GET", &uri, "acme", None)).await;
    assert_eq!(body["data"]["sent_count"], 1);
    assert_eq!(body["data"]["is_active"], true);

    let (status, _) = send(&app, call("GET", &uri, "globex", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
