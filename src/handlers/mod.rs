pub mod dashboard;
pub mod intake_handlers;
pub mod profile_handlers;
pub mod proposal_handlers;
pub mod settings_handlers;
