mod pending_bans;
mod rules;
mod service;

pub use pending_bans::BanDecision;
pub use rules::ModAction;
pub use service::ModerationService;
