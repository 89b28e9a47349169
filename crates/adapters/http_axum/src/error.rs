//! HTTP response mapping for use-case outcomes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crmflow_domain::error::{CrmError, NotFoundError};
use crmflow_domain::outcome::{Outcome, OutcomeKind};

/// Maps an [`OutcomeKind`] to the HTTP status reported for it.
#[must_use]
pub fn status_for(kind: OutcomeKind) -> StatusCode {
    match kind {
        OutcomeKind::Validation => StatusCode::BAD_REQUEST,
        OutcomeKind::NotFound => StatusCode::NOT_FOUND,
        OutcomeKind::Inactive => StatusCode::CONFLICT,
        OutcomeKind::Execution | OutcomeKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An [`Outcome`] rendered as JSON, with the status derived from its kind.
pub struct OutcomeResponse<T> {
    outcome: Outcome<T>,
    success_status: StatusCode,
}

impl<T> OutcomeResponse<T> {
    /// `200 OK` on success.
    pub fn ok(outcome: Outcome<T>) -> Self {
        Self {
            outcome,
            success_status: StatusCode::OK,
        }
    }

    /// `201 Created` on success.
    pub fn created(outcome: Outcome<T>) -> Self {
        Self {
            outcome,
            success_status: StatusCode::CREATED,
        }
    }

    /// A path id that does not parse names nothing, so it is reported as missing.
    pub fn unknown_id(entity: &'static str, id: String) -> Self {
        Self::ok(Outcome::failure(&CrmError::from(NotFoundError { entity, id })))
    }
}

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        let status = self
            .outcome
            .kind()
            .map_or(self.success_status, status_for);
        if status.is_server_error() {
            tracing::error!(%status, reason = self.outcome.message(), "request failed");
        }
        (status, Json(self.outcome)).into_response()
    }
}
