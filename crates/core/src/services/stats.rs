//! Aggregate workflow statistics.
//!
//! Statistics are computed by a full scan of the current collection
//! snapshot on every call; the engine keeps no persistent aggregate
//! state.

use backdesk_common::AppResult;
use backdesk_db::{
    entities::{
        report::{self, ReportStatus},
        support_ticket::{self, TicketStatus},
    },
    repositories::{ReportRepository, TicketRepository},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Aggregate ticket statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: u64,
    pub pending: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub escalated: u64,
    pub resolved: u64,
    pub closed: u64,
    /// Tickets with an assignee.
    pub assigned_count: u64,
    /// Tickets without an assignee.
    pub unassigned_count: u64,
    /// Non-resolved tickets older than the overdue window.
    pub overdue_count: u64,
    /// Mean hours to first response over tickets with one; 0 if none.
    pub avg_response_time_hours: f64,
    /// Mean hours to resolution over tickets with one; 0 if none.
    pub avg_resolution_time_hours: f64,
}

impl TicketStats {
    /// Compute statistics over a snapshot of tickets. `overdue_hours` is
    /// the configured window for the overdue count.
    #[must_use]
    pub fn compute(
        tickets: &[support_ticket::Model],
        overdue_hours: i64,
        now: DateTimeWithTimeZone,
    ) -> Self {
        let mut stats = Self {
            total: tickets.len() as u64,
            ..Self::default()
        };

        let mut response_times = Vec::new();
        let mut resolution_times = Vec::new();

        for ticket in tickets {
            match ticket.status {
                TicketStatus::Pending => stats.pending += 1,
                TicketStatus::Assigned => stats.assigned += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::Escalated => stats.escalated += 1,
                TicketStatus::Resolved => stats.resolved += 1,
                TicketStatus::Closed => stats.closed += 1,
            }

            if ticket.is_assigned() {
                stats.assigned_count += 1;
            } else {
                stats.unassigned_count += 1;
            }

            if ticket.overdue_after(overdue_hours, now) {
                stats.overdue_count += 1;
            }

            if let Some(hours) = ticket.response_time_hours() {
                response_times.push(hours);
            }
            if let Some(hours) = ticket.resolution_time_hours() {
                resolution_times.push(hours);
            }
        }

        stats.avg_response_time_hours = mean(&response_times);
        stats.avg_resolution_time_hours = mean(&resolution_times);
        stats
    }
}

/// Aggregate report statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Reports with an assignee.
    pub assigned_count: u64,
    /// Reports without an assignee.
    pub unassigned_count: u64,
}

impl ReportStats {
    /// Compute statistics over a snapshot of reports.
    #[must_use]
    pub fn compute(reports: &[report::Model]) -> Self {
        let mut stats = Self {
            total: reports.len() as u64,
            ..Self::default()
        };

        for report in reports {
            match report.status {
                ReportStatus::Pending => stats.pending += 1,
                ReportStatus::Approved => stats.approved += 1,
                ReportStatus::Rejected => stats.rejected += 1,
            }

            if report.assigned_to.is_some() {
                stats.assigned_count += 1;
            } else {
                stats.unassigned_count += 1;
            }
        }

        stats
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Statistics service over the store-backed snapshots.
#[derive(Clone)]
pub struct StatsService {
    ticket_repo: TicketRepository,
    report_repo: ReportRepository,
    overdue_hours: i64,
}

impl StatsService {
    /// Create a new statistics service. `overdue_hours` comes from the
    /// workflow configuration.
    #[must_use]
    pub const fn new(
        ticket_repo: TicketRepository,
        report_repo: ReportRepository,
        overdue_hours: i64,
    ) -> Self {
        Self {
            ticket_repo,
            report_repo,
            overdue_hours,
        }
    }

    /// Compute ticket statistics over the current snapshot.
    pub async fn ticket_stats(&self) -> AppResult<TicketStats> {
        let tickets = self.ticket_repo.snapshot().await?;
        Ok(TicketStats::compute(
            &tickets,
            self.overdue_hours,
            chrono::Utc::now().into(),
        ))
    }

    /// Compute report statistics over the current snapshot.
    pub async fn report_stats(&self) -> AppResult<ReportStats> {
        let reports = self.report_repo.snapshot().await?;
        Ok(ReportStats::compute(&reports))
    }
}
