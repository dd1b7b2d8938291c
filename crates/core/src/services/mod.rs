//! Business logic services.

#![allow(missing_docs)]

pub mod report;
pub mod stats;
pub mod ticket;

pub use report::{CreateReportInput, ReportService, UpdateReportStatusInput};
pub use stats::{ReportStats, StatsService, TicketStats};
pub use ticket::{CreateTicketInput, EscalateTicketInput, TicketService};
