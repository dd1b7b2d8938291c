//! Database repositories.

pub mod report;
pub mod ticket;

pub use report::ReportRepository;
pub use ticket::TicketRepository;
