//! # crmflow-domain
//!
//! Pure domain model for the crmflow CRM automation layer.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, tenant/user keys, error conventions, timestamps
//! - Define **Automation rules** (tenant-owned trigger descriptions with execution statistics)
//! - Define **Email campaigns** (cadences, tenant-owned sending configuration with send statistics)
//! - Define the **Outcome** record every use-case returns to its caller
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation_rule;
pub mod campaign;
pub mod outcome;
