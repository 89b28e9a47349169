//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Services work with `Result<_, CrmError>` internally and convert to an
//! [`Outcome`] at the outermost scope of every public method.

pub mod automation_service;
pub mod cadence_service;

use crmflow_domain::error::CrmError;
use crmflow_domain::outcome::Outcome;

/// Convert a use-case result into an [`Outcome`], logging failures.
pub(crate) fn report<T>(result: Result<T, CrmError>, message: &str) -> Outcome<T> {
    if let Err(err) = &result {
        log_failure(err);
    }
    Outcome::from_result(result, message)
}

/// Like [`report`] for use-cases with nothing to hand back.
pub(crate) fn report_done(result: Result<(), CrmError>, message: &str) -> Outcome<()> {
    match result {
        Ok(()) => Outcome::done(message),
        Err(err) => {
            log_failure(&err);
            Outcome::failure(&err)
        }
    }
}

fn log_failure(err: &CrmError) {
    match err {
        CrmError::Storage(_) => tracing::error!(error = %err, "storage failure"),
        CrmError::Execution(_) => tracing::warn!(error = %err, "execution failed"),
        _ => tracing::debug!(error = %err, "request rejected"),
    }
}
