//! JSON request bodies answered with an outcome when they cannot be read.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crmflow_domain::outcome::{Outcome, OutcomeKind};

/// A JSON body of type `T`.
///
/// Where axum's [`Json`] answers a bad body with a plain-text `415` or `422`,
/// this reports a missing content type, malformed JSON or a payload of the
/// wrong shape as a `400` validation outcome.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

/// Rejection for a body that is not the expected JSON.
#[derive(Debug)]
pub struct InvalidBody(String);

impl IntoResponse for InvalidBody {
    fn into_response(self) -> Response {
        let outcome = Outcome::<()>::Failure {
            kind: OutcomeKind::Validation,
            message: self.0,
        };
        (StatusCode::BAD_REQUEST, Json(outcome)).into_response()
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = InvalidBody;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "rejected request body");
                Err(InvalidBody(rejection.body_text()))
            }
        }
    }
}
