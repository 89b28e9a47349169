//! Error taxonomy shared across the workspace.
//!
//! Each failure category is its own typed error and converts into
//! [`CrmError`] through `#[from]`. Adapters box their own errors into
//! [`CrmError::Storage`].

/// Top-level error carried between the layers.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Inactive(#[from] InactiveError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("storage failure: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated by caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("trigger type must not be empty")]
    EmptyTriggerType,

    #[error("conditions must be an object")]
    ConditionsNotAnObject,
}

/// No row matches the `(id, tenant)` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The row exists but `is_active` is false.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} is inactive")]
pub struct InactiveError {
    pub entity: &'static str,
    pub id: String,
}

/// The execution action itself failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("execution failed: {reason}")]
pub struct ExecutionError {
    pub reason: String,
}

impl ExecutionError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
