//! # crmflow-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationRuleRepository`: tenant-scoped persistence for rules
//!   - `CampaignRepository`: tenant-scoped persistence for email cadences
//!   - `RuleAction`: the action carried out when a rule executes
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AutomationEngine`: execute a rule, validate a conditions payload
//!   - `AutomationService`: create, list, get, update, delete rules
//!   - `CadenceService`: create, list, get, execute cadences
//! - Fold every failure into an [`Outcome`](crmflow_domain::outcome::Outcome)
//!   so no error escapes a use-case
//!
//! ## Dependency rule
//! Depends on `crmflow-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod automation_engine;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
