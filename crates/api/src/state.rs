//! Application state shared across handlers.

#![allow(missing_docs)]

use backdesk_core::{ReportService, StatsService, TicketService};

/// Application state.
///
/// Authorization is the caller's concern: the admin frontend sits
/// behind its own access control and passes acting-staff identity in
/// request bodies. The engine performs no role checks.
#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
    pub ticket_service: TicketService,
    pub stats_service: StatsService,
    /// Hours before a non-resolved ticket counts as overdue, from the
    /// workflow configuration.
    pub overdue_hours: i64,
}
