//! Caller identity extracted from request headers.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crmflow_domain::id::{TenantId, UserId};
use crmflow_domain::outcome::{Outcome, OutcomeKind};

/// Header carrying the tenant every request is scoped to.
pub const TENANT_HEADER: &str = "x-tenant-id";
/// Header carrying the acting user, required when creating records.
pub const USER_HEADER: &str = "x-user-id";

/// The tenant (and optionally the user) a request acts on behalf of.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub user_id: Option<UserId>,
}

impl TenantContext {
    /// The acting user.
    ///
    /// # Errors
    ///
    /// Returns [`MissingHeader`] when the request carried no `X-User-Id`.
    pub fn user(&self) -> Result<&UserId, MissingHeader> {
        self.user_id.as_ref().ok_or(MissingHeader(USER_HEADER))
    }
}

/// Rejection for a missing or blank identity header.
#[derive(Debug)]
pub struct MissingHeader(&'static str);

impl IntoResponse for MissingHeader {
    fn into_response(self) -> Response {
        let outcome = Outcome::<()>::Failure {
            kind: OutcomeKind::Validation,
            message: format!("missing {} header", self.0),
        };
        (StatusCode::BAD_REQUEST, Json(outcome)).into_response()
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S: Send + Sync> FromRequestParts<S> for TenantContext {
    type Rejection = MissingHeader;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = header(parts, TENANT_HEADER)
            .map(TenantId::new)
            .ok_or(MissingHeader(TENANT_HEADER))?;
        let user_id = header(parts, USER_HEADER).map(UserId::new);
        Ok(Self { tenant_id, user_id })
    }
}
