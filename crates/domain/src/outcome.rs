//! Outcome: the uniform result record returned by every use-case.
//!
//! Use-cases never hand an error to their caller. Expected failures
//! (not found, inactive) and unexpected ones (storage) are all folded into
//! [`Outcome::Failure`], tagged with an [`OutcomeKind`] so callers do not
//! have to inspect the message text.
//!
//! Serialized shape:
//!
//! ```json
//! {"success": true,  "message": "rule created", "data": {...}}
//! {"success": false, "kind": "not_found", "message": "rule not found"}
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CrmError;

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NotFound,
    Inactive,
    Validation,
    Execution,
    Storage,
}

impl From<&CrmError> for OutcomeKind {
    fn from(err: &CrmError) -> Self {
        match err {
            CrmError::Validation(_) => Self::Validation,
            CrmError::NotFound(_) => Self::NotFound,
            CrmError::Inactive(_) => Self::Inactive,
            CrmError::Execution(_) => Self::Execution,
            CrmError::Storage(_) => Self::Storage,
        }
    }
}

/// Result of a use-case: success with an optional payload, or a tagged failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success { message: String, data: Option<T> },
    Failure { kind: OutcomeKind, message: String },
}

impl<T> Outcome<T> {
    /// Success carrying a payload.
    #[must_use]
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::Success {
            message: message.into(),
            data: Some(data),
        }
    }

    /// Success without a payload.
    #[must_use]
    pub fn done(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            data: None,
        }
    }

    /// Fold an error into a failure; the message is the error's display text.
    #[must_use]
    pub fn failure(err: &CrmError) -> Self {
        Self::Failure {
            kind: err.into(),
            message: err.to_string(),
        }
    }

    /// Convert a use-case result, attaching `message` on the success path.
    #[must_use]
    pub fn from_result(result: Result<T, CrmError>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::success(message, data),
            Err(err) => Self::failure(&err),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    /// Failure category, `None` on success.
    #[must_use]
    pub fn kind(&self) -> Option<OutcomeKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => data,
            Self::Failure { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct Body<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<OutcomeKind>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Body {
            success: self.is_success(),
            kind: self.kind(),
            message: self.message(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}

/// Answer to a conditions-shape check. Never a failure, only `valid: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
}

impl Validation {
    #[must_use]
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}
