//! Support ticket entity.
//!
//! A ticket flows submission → assignment → possible escalation →
//! resolution. Transitions are pure: each consumes the current model and
//! returns the next one, and the repository persists the full next state.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hours after creation before a non-resolved ticket counts as overdue.
pub const OVERDUE_HOURS: i64 = 24;

/// Workflow status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum TicketStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "escalated")]
    Escalated,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl TicketStatus {
    /// Canonical string value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Escalated => "Escalated",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Normalize a raw string to a ticket status. Total: unknown or
    /// missing input maps to [`Self::Pending`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("assigned") => Self::Assigned,
            Some("in_progress") => Self::InProgress,
            Some("escalated") => Self::Escalated,
            Some("resolved") => Self::Resolved,
            Some("closed") => Self::Closed,
            _ => Self::Pending,
        }
    }

    /// Whether the status is terminal. Transitions out of a terminal
    /// status are not blocked by the model; the service logs them.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// Priority of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum TicketPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "normal")]
    #[default]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

impl TicketPriority {
    /// Canonical string value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Normalize a raw string to a priority. Total: unknown or missing
    /// input maps to [`Self::Normal`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            Some("urgent") => Self::Urgent,
            _ => Self::Normal,
        }
    }

    /// Default priority for an issue-type category. Unknown categories
    /// get [`Self::Normal`].
    #[must_use]
    pub fn for_issue_type(issue_type: &str) -> Self {
        match issue_type.trim() {
            "Payment Issue" => Self::Urgent,
            "Account Access" | "Order Problem" | "App Crash" => Self::High,
            "Feature Request" | "General Question" => Self::Low,
            _ => Self::Normal,
        }
    }
}

/// A single internal note on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNote {
    /// Staff id of the author.
    pub author: String,
    /// Display name of the author.
    pub author_name: String,
    /// Note text.
    pub note: String,
    /// When the note was written.
    pub timestamp: DateTimeWithTimeZone,
}

/// Ordered, append-only log of internal notes, stored as a JSON column.
/// There is deliberately no API for editing or removing entries.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct InternalNotes(Vec<InternalNote>);

impl InternalNotes {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the log holds no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the notes, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, InternalNote> {
        self.0.iter()
    }

    fn push(&mut self, note: InternalNote) {
        self.0.push(note);
    }
}

impl<'a> IntoIterator for &'a InternalNotes {
    type Item = &'a InternalNote;
    type IntoIter = std::slice::Iter<'a, InternalNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON-backed list of attachment URLs.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct Attachments(pub Vec<String>);

/// The party currently responsible for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    /// Whether the handler is support staff or a developer.
    pub kind: HandlerKind,
    /// Staff or developer id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Kind of current handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Support staff assignee.
    Support,
    /// Developer the ticket was escalated to.
    Developer,
}

/// Support ticket model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "support_ticket")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Reporter contact name.
    pub full_name: String,
    /// Reporter contact email.
    pub email: String,
    /// Account type the reporter holds (e.g. customer, seller).
    pub account_type: String,
    /// Device the issue occurred on.
    pub device_type: String,
    #[sea_orm(nullable)]
    pub app_version: Option<String>,
    /// Issue category from the fixed set; drives the default priority.
    pub issue_type: String,
    /// Free-text description of the issue.
    pub description: String,
    /// When the issue occurred, as entered on the contact form. Older
    /// records stored this as a plain string, so it is kept verbatim.
    #[sea_orm(nullable)]
    pub date_time: Option<String>,
    /// Attachment URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: Attachments,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Support staff assignee.
    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,
    #[sea_orm(nullable)]
    pub assigned_to_name: Option<String>,
    #[sea_orm(nullable)]
    pub assigned_at: Option<DateTimeWithTimeZone>,
    /// Developer the ticket was escalated to.
    #[sea_orm(nullable)]
    pub escalated_to: Option<String>,
    #[sea_orm(nullable)]
    pub escalated_to_name: Option<String>,
    #[sea_orm(nullable)]
    pub escalated_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(nullable)]
    pub escalation_reason: Option<String>,
    /// Append-only log of internal staff notes.
    #[sea_orm(column_type = "JsonBinary")]
    pub internal_notes: InternalNotes,
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(nullable)]
    pub closed_at: Option<DateTimeWithTimeZone>,
    /// Set once, on the first recorded response.
    #[sea_orm(nullable)]
    pub first_response_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(nullable)]
    pub last_response_at: Option<DateTimeWithTimeZone>,
    /// Monotonically increasing count of recorded responses.
    pub response_count: i32,
}

impl Model {
    // ===== Lifecycle transitions =====

    /// Assign the ticket to a support staff member. Forces status to
    /// Assigned; escalation fields are left untouched. Re-assigning
    /// overwrites the previous assignee.
    #[must_use]
    pub fn assign_to(
        mut self,
        staff_id: &str,
        staff_name: &str,
        now: DateTimeWithTimeZone,
    ) -> Self {
        self.assigned_to = Some(staff_id.to_string());
        self.assigned_to_name = Some(staff_name.to_string());
        self.assigned_at = Some(now);
        self.status = TicketStatus::Assigned;
        self.updated_at = Some(now);
        self
    }

    /// Clear the assignment and reset status to Pending. The status of a
    /// ticket literally encodes "assigned", so unassigning returns it to
    /// the intake queue (reports behave differently).
    #[must_use]
    pub fn unassign(mut self, now: DateTimeWithTimeZone) -> Self {
        self.assigned_to = None;
        self.assigned_to_name = None;
        self.assigned_at = None;
        self.status = TicketStatus::Pending;
        self.updated_at = Some(now);
        self
    }

    /// Escalate the ticket to a developer with a reason. Forces status
    /// to Escalated. The support assignment is retained as history even
    /// though the current handler becomes the developer.
    #[must_use]
    pub fn escalate_to(
        mut self,
        dev_id: &str,
        dev_name: &str,
        reason: &str,
        now: DateTimeWithTimeZone,
    ) -> Self {
        self.escalated_to = Some(dev_id.to_string());
        self.escalated_to_name = Some(dev_name.to_string());
        self.escalated_at = Some(now);
        self.escalation_reason = Some(reason.to_string());
        self.status = TicketStatus::Escalated;
        self.updated_at = Some(now);
        self
    }

    /// Append an internal note. Prior entries are never mutated.
    #[must_use]
    pub fn add_internal_note(
        mut self,
        author_id: &str,
        author_name: &str,
        text: &str,
        now: DateTimeWithTimeZone,
    ) -> Self {
        self.internal_notes.push(InternalNote {
            author: author_id.to_string(),
            author_name: author_name.to_string(),
            note: text.to_string(),
            timestamp: now,
        });
        self.updated_at = Some(now);
        self
    }

    /// Set the status. The transition is unconstrained: any status may
    /// follow any status. Resolved stamps `resolved_at` if unset, Closed
    /// stamps `closed_at` if unset; no other status carries a side-stamp.
    #[must_use]
    pub fn with_status(mut self, status: TicketStatus, now: DateTimeWithTimeZone) -> Self {
        self.status = status;
        match status {
            TicketStatus::Resolved => {
                if self.resolved_at.is_none() {
                    self.resolved_at = Some(now);
                }
            }
            TicketStatus::Closed => {
                if self.closed_at.is_none() {
                    self.closed_at = Some(now);
                }
            }
            _ => {}
        }
        self.updated_at = Some(now);
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TicketPriority, now: DateTimeWithTimeZone) -> Self {
        self.priority = priority;
        self.updated_at = Some(now);
        self
    }

    /// Record a staff response. `first_response_at` is set at most once;
    /// `last_response_at` always moves; the count increments by one.
    #[must_use]
    pub fn record_response(mut self, now: DateTimeWithTimeZone) -> Self {
        if self.first_response_at.is_none() {
            self.first_response_at = Some(now);
        }
        self.last_response_at = Some(now);
        self.response_count += 1;
        self.updated_at = Some(now);
        self
    }

    // ===== Derived properties =====

    /// Whether a support staff member is assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    /// Whether the ticket is escalated: an escalation target is present
    /// or the status says so.
    #[must_use]
    pub fn is_escalated(&self) -> bool {
        self.escalated_to.is_some() || self.status == TicketStatus::Escalated
    }

    /// Whether the ticket has reached a terminal status.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the ticket is overdue: not resolved and older than
    /// [`OVERDUE_HOURS`]. Resolved or closed tickets are never overdue.
    #[must_use]
    pub fn is_overdue(&self, now: DateTimeWithTimeZone) -> bool {
        self.overdue_after(OVERDUE_HOURS, now)
    }

    /// Overdue check with a configurable window.
    #[must_use]
    pub fn overdue_after(&self, hours: i64, now: DateTimeWithTimeZone) -> bool {
        !self.is_resolved()
            && now.signed_duration_since(self.created_at) > chrono::Duration::hours(hours)
    }

    /// Hours between creation and the first response, if recorded.
    #[must_use]
    pub fn response_time_hours(&self) -> Option<f64> {
        self.first_response_at.map(|first| {
            first
                .signed_duration_since(self.created_at)
                .num_seconds() as f64
                / 3600.0
        })
    }

    /// Hours between creation and resolution, if recorded.
    #[must_use]
    pub fn resolution_time_hours(&self) -> Option<f64> {
        self.resolved_at.map(|resolved| {
            resolved
                .signed_duration_since(self.created_at)
                .num_seconds() as f64
                / 3600.0
        })
    }

    /// The party currently responsible for the ticket: the escalation
    /// target when present, else the assignee, else none.
    #[must_use]
    pub fn current_handler(&self) -> Option<Handler> {
        if let Some(dev_id) = &self.escalated_to {
            return Some(Handler {
                kind: HandlerKind::Developer,
                id: dev_id.clone(),
                name: self.escalated_to_name.clone().unwrap_or_default(),
            });
        }
        self.assigned_to.as_ref().map(|staff_id| Handler {
            kind: HandlerKind::Support,
            id: staff_id.clone(),
            name: self.assigned_to_name.clone().unwrap_or_default(),
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn fresh_ticket() -> Model {
        Model {
            id: "ticket1".to_string(),
            full_name: "Ada Customer".to_string(),
            email: "ada@example.com".to_string(),
            account_type: "customer".to_string(),
            device_type: "android".to_string(),
            app_version: Some("2.4.1".to_string()),
            issue_type: "Payment Issue".to_string(),
            description: "Charged twice for one order".to_string(),
            date_time: None,
            attachments: Attachments(vec![]),
            status: TicketStatus::Pending,
            priority: TicketPriority::for_issue_type("Payment Issue"),
            assigned_to: None,
            assigned_to_name: None,
            assigned_at: None,
            escalated_to: None,
            escalated_to_name: None,
            escalated_at: None,
            escalation_reason: None,
            internal_notes: InternalNotes::new(),
            created_at: Utc::now().into(),
            updated_at: None,
            resolved_at: None,
            closed_at: None,
            first_response_at: None,
            last_response_at: None,
            response_count: 0,
        }
    }

    #[test]
    fn test_status_normalize_is_total() {
        assert_eq!(TicketStatus::normalize(None), TicketStatus::Pending);
        assert_eq!(TicketStatus::normalize(Some("bogus")), TicketStatus::Pending);
        assert_eq!(
            TicketStatus::normalize(Some("in_progress")),
            TicketStatus::InProgress
        );
        assert_eq!(TicketStatus::normalize(Some("closed")), TicketStatus::Closed);
    }

    #[test]
    fn test_priority_for_issue_type() {
        assert_eq!(
            TicketPriority::for_issue_type("Payment Issue"),
            TicketPriority::Urgent
        );
        assert_eq!(
            TicketPriority::for_issue_type("Account Access"),
            TicketPriority::High
        );
        assert_eq!(
            TicketPriority::for_issue_type("Feature Request"),
            TicketPriority::Low
        );
        assert_eq!(
            TicketPriority::for_issue_type("Something Else"),
            TicketPriority::Normal
        );
    }

    #[test]
    fn test_assign_forces_assigned_status() {
        let now = Utc::now().into();
        let ticket = fresh_ticket().assign_to("staff1", "Staff One", now);
        assert_eq!(ticket.status, TicketStatus::Assigned);
        assert!(ticket.is_assigned());
        assert_eq!(ticket.assigned_to.as_deref(), Some("staff1"));

        // Re-assigning overwrites.
        let ticket = ticket.assign_to("staff2", "Staff Two", now);
        assert_eq!(ticket.assigned_to.as_deref(), Some("staff2"));
    }

    #[test]
    fn test_unassign_resets_status_to_pending() {
        let now = Utc::now().into();
        let ticket = fresh_ticket().assign_to("staff1", "Staff One", now).unassign(now);
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(!ticket.is_assigned());
        assert!(ticket.assigned_at.is_none());
    }

    #[test]
    fn test_escalation_retains_assignment() {
        let now = Utc::now().into();
        let ticket = fresh_ticket()
            .assign_to("staff1", "Staff One", now)
            .escalate_to("dev1", "Dev One", "payment fraud suspected", now);

        assert_eq!(ticket.status, TicketStatus::Escalated);
        assert!(ticket.is_escalated());
        // Assignment is history, not cleared.
        assert_eq!(ticket.assigned_to.as_deref(), Some("staff1"));
        assert_eq!(
            ticket.escalation_reason.as_deref(),
            Some("payment fraud suspected")
        );

        let handler = ticket.current_handler().expect("handler");
        assert_eq!(handler.kind, HandlerKind::Developer);
        assert_eq!(handler.id, "dev1");
    }

    #[test]
    fn test_current_handler_prefers_escalation_target() {
        let now = Utc::now().into();
        let assigned = fresh_ticket().assign_to("staff1", "Staff One", now);
        let handler = assigned.current_handler().expect("handler");
        assert_eq!(handler.kind, HandlerKind::Support);

        let escalated = assigned.escalate_to("dev1", "Dev One", "needs a code fix", now);
        let handler = escalated.current_handler().expect("handler");
        assert_eq!(handler.kind, HandlerKind::Developer);
        assert_eq!(handler.name, "Dev One");

        assert!(fresh_ticket().current_handler().is_none());
    }

    #[test]
    fn test_resolved_stamps_once() {
        let first: DateTimeWithTimeZone = Utc::now().into();
        let later: DateTimeWithTimeZone = (Utc::now() + Duration::hours(1)).into();

        let ticket = fresh_ticket().with_status(TicketStatus::Resolved, first);
        assert_eq!(ticket.resolved_at, Some(first));

        // Re-resolving does not move the stamp.
        let ticket = ticket
            .with_status(TicketStatus::InProgress, later)
            .with_status(TicketStatus::Resolved, later);
        assert_eq!(ticket.resolved_at, Some(first));
    }

    #[test]
    fn test_closed_stamps_once_and_only_terminal_statuses_stamp() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let ticket = fresh_ticket().with_status(TicketStatus::InProgress, now);
        assert!(ticket.resolved_at.is_none());
        assert!(ticket.closed_at.is_none());

        let ticket = ticket.with_status(TicketStatus::Closed, now);
        assert_eq!(ticket.closed_at, Some(now));
    }

    #[test]
    fn test_record_response_twice() {
        let first: DateTimeWithTimeZone = Utc::now().into();
        let second: DateTimeWithTimeZone = (Utc::now() + Duration::minutes(30)).into();

        let ticket = fresh_ticket().record_response(first).record_response(second);
        assert_eq!(ticket.first_response_at, Some(first));
        assert_eq!(ticket.last_response_at, Some(second));
        assert_eq!(ticket.response_count, 2);
    }

    #[test]
    fn test_overdue_boundary() {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let old = Model {
            created_at: (Utc::now() - Duration::hours(25)).into(),
            ..fresh_ticket()
        };
        assert!(old.is_overdue(now));

        let recent = Model {
            created_at: (Utc::now() - Duration::hours(23)).into(),
            ..fresh_ticket()
        };
        assert!(!recent.is_overdue(now));
    }

    #[test]
    fn test_resolved_tickets_never_overdue() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let ancient = Model {
            created_at: (Utc::now() - Duration::days(30)).into(),
            ..fresh_ticket()
        }
        .with_status(TicketStatus::Resolved, now);
        assert!(!ancient.is_overdue(now));

        let closed = Model {
            created_at: (Utc::now() - Duration::days(30)).into(),
            ..fresh_ticket()
        }
        .with_status(TicketStatus::Closed, now);
        assert!(!closed.is_overdue(now));
    }

    #[test]
    fn test_response_and_resolution_hours() {
        let created = Utc::now();
        let ticket = Model {
            created_at: created.into(),
            first_response_at: Some((created + Duration::hours(2)).into()),
            resolved_at: Some((created + Duration::hours(6)).into()),
            ..fresh_ticket()
        };
        assert_eq!(ticket.response_time_hours(), Some(2.0));
        assert_eq!(ticket.resolution_time_hours(), Some(6.0));

        assert!(fresh_ticket().response_time_hours().is_none());
        assert!(fresh_ticket().resolution_time_hours().is_none());
    }

    #[test]
    fn test_internal_notes_append_only() {
        let now = Utc::now().into();
        let ticket = fresh_ticket()
            .add_internal_note("staff1", "Staff One", "first look", now)
            .add_internal_note("staff2", "Staff Two", "needs dev input", now);

        assert_eq!(ticket.internal_notes.len(), 2);
        let notes: Vec<&InternalNote> = ticket.internal_notes.iter().collect();
        assert_eq!(notes[0].note, "first look");
        assert_eq!(notes[0].author_name, "Staff One");
        assert_eq!(notes[1].note, "needs dev input");
    }

    #[test]
    fn test_escalated_via_status_only() {
        let now = Utc::now().into();
        // A ticket whose status says escalated counts as escalated even
        // without a recorded target.
        let ticket = fresh_ticket().with_status(TicketStatus::Escalated, now);
        assert!(ticket.is_escalated());
        assert!(ticket.current_handler().is_none());
    }
}
