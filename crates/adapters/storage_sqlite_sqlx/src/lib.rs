//! # crmflow-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `crmflow-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Keep counter updates as in-place increments and wrap read-modify-write
//!   sequences in a transaction
//!
//! ## Dependency rule
//! Depends on `crmflow-app` (for port traits) and `crmflow-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod campaign_repo;
mod error;
mod pool;
mod rule_repo;

pub use campaign_repo::SqliteCampaignRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use rule_repo::SqliteAutomationRuleRepository;
