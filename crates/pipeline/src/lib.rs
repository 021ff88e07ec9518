//! Incident-intake pipeline: classification, automation dispatch,
//! orchestration, idempotent resolution and activity reconstruction.
//!
//! All remote access goes through the [`store::TicketStore`] port so every
//! service here is testable against in-memory doubles.

pub mod activity;
pub mod automation;
pub mod classify;
pub mod contact;
pub mod notify;
pub mod orchestrator;
pub mod resolution;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use activity::ActivityService;
pub use automation::{Automation, AutomationRegistry, ProvisioningAutomation};
pub use classify::classify;
pub use contact::resolve_contact;
pub use notify::{Mailer, StubMailer};
pub use orchestrator::{IncidentService, StatsSummary};
pub use resolution::ResolutionService;
pub use store::{RemoteTicketStore, TicketStore, TICKET_FIELDS};
