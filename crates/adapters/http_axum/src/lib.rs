//! # crmflow-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the automation and cadence use-cases
//!   (`/api/rules`, `/api/cadences`, …)
//! - Resolve the calling tenant and user from the `X-Tenant-Id` and
//!   `X-User-Id` request headers
//! - Map use-case [`Outcome`](crmflow_domain::outcome::Outcome)s into HTTP
//!   responses, deriving the status code from the failure kind
//!
//! ## Dependency rule
//! Depends on `crmflow-app` (for port traits and services) and `crmflow-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod body;
pub mod error;
pub mod router;
pub mod state;
pub mod tenant;
