//! Database entities.

pub mod report;
pub mod support_ticket;

pub use report::Entity as Report;
pub use support_ticket::Entity as SupportTicket;
