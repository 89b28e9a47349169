//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod campaign_repo;
pub mod rule_action;
pub mod rule_repo;

pub use campaign_repo::CampaignRepository;
pub use rule_action::RuleAction;
pub use rule_repo::AutomationRuleRepository;
