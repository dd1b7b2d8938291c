//! Support ticket service: intake, assignment, escalation and
//! response tracking.

use backdesk_common::{AppError, AppResult, IdGenerator};
use backdesk_db::{
    entities::support_ticket::{
        self, Attachments, InternalNotes, TicketPriority, TicketStatus,
    },
    repositories::TicketRepository,
};
use sea_orm::{ActiveModelTrait, Set};

/// Input for creating a ticket from the contact form.
pub struct CreateTicketInput {
    pub full_name: String,
    pub email: String,
    pub account_type: String,
    pub device_type: String,
    pub app_version: Option<String>,
    pub issue_type: String,
    pub description: String,
    pub date_time: Option<String>,
    pub attachments: Vec<String>,
}

/// Input for escalating a ticket to a developer.
pub struct EscalateTicketInput {
    pub ticket_id: String,
    pub dev_id: String,
    pub dev_name: String,
    pub reason: String,
}

/// Support ticket service.
#[derive(Clone)]
pub struct TicketService {
    repo: TicketRepository,
    id_gen: IdGenerator,
}

impl TicketService {
    /// Create a new ticket service.
    #[must_use]
    pub const fn new(repo: TicketRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new ticket. The priority defaults from the issue-type
    /// category table; status starts at Pending with every assignment
    /// and escalation field empty.
    pub async fn create_ticket(
        &self,
        input: CreateTicketInput,
    ) -> AppResult<support_ticket::Model> {
        let full_name = input.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::BadRequest("Contact name is required".to_string()));
        }
        let email = input.email.trim();
        if email.is_empty() {
            return Err(AppError::BadRequest("Contact email is required".to_string()));
        }
        let issue_type = input.issue_type.trim();
        if issue_type.is_empty() {
            return Err(AppError::BadRequest("Issue type is required".to_string()));
        }
        let description = input.description.trim();
        if description.is_empty() {
            return Err(AppError::BadRequest("Description is required".to_string()));
        }

        let model = support_ticket::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(full_name.to_string()),
            email: Set(email.to_string()),
            account_type: Set(input.account_type.trim().to_string()),
            device_type: Set(input.device_type.trim().to_string()),
            app_version: Set(input.app_version),
            issue_type: Set(issue_type.to_string()),
            description: Set(description.to_string()),
            date_time: Set(input.date_time),
            attachments: Set(Attachments(input.attachments)),
            status: Set(TicketStatus::Pending),
            priority: Set(TicketPriority::for_issue_type(issue_type)),
            assigned_to: Set(None),
            assigned_to_name: Set(None),
            assigned_at: Set(None),
            escalated_to: Set(None),
            escalated_to_name: Set(None),
            escalated_at: Set(None),
            escalation_reason: Set(None),
            internal_notes: Set(InternalNotes::new()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
            resolved_at: Set(None),
            closed_at: Set(None),
            first_response_at: Set(None),
            last_response_at: Set(None),
            response_count: Set(0),
        };

        self.repo.create(model).await
    }

    /// Get a ticket by ID.
    pub async fn get_ticket(&self, id: &str) -> AppResult<support_ticket::Model> {
        self.repo.get(id).await
    }

    /// Get tickets, newest first, optionally filtered by status.
    pub async fn get_tickets(
        &self,
        status: Option<TicketStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<support_ticket::Model>> {
        self.repo.list(status, limit, offset).await
    }

    /// Get tickets assigned to a specific staff member.
    pub async fn get_tickets_for_assignee(
        &self,
        staff_id: &str,
        limit: u64,
    ) -> AppResult<Vec<support_ticket::Model>> {
        self.repo.list_for_assignee(staff_id, limit).await
    }

    /// Count tickets awaiting intake.
    pub async fn count_pending_tickets(&self) -> AppResult<u64> {
        self.repo.count_pending().await
    }

    /// Assign a ticket to a support staff member. Forces status to
    /// Assigned; an existing escalation is left in place.
    pub async fn assign_ticket(
        &self,
        ticket_id: &str,
        staff_id: &str,
        staff_name: &str,
    ) -> AppResult<support_ticket::Model> {
        if staff_id.trim().is_empty() {
            return Err(AppError::BadRequest("Staff id is required".to_string()));
        }

        let ticket = self.repo.get(ticket_id).await?;
        let next = ticket.assign_to(staff_id, staff_name, chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Clear a ticket's assignment and return it to the intake queue
    /// (status resets to Pending, unlike reports).
    pub async fn unassign_ticket(&self, ticket_id: &str) -> AppResult<support_ticket::Model> {
        let ticket = self.repo.get(ticket_id).await?;
        let next = ticket.unassign(chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Escalate a ticket to a developer. A reason is required; the
    /// support assignment is kept as history.
    pub async fn escalate_ticket(
        &self,
        input: EscalateTicketInput,
    ) -> AppResult<support_ticket::Model> {
        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(AppError::BadRequest(
                "Escalation reason is required".to_string(),
            ));
        }
        if input.dev_id.trim().is_empty() {
            return Err(AppError::BadRequest("Developer id is required".to_string()));
        }

        let ticket = self.repo.get(&input.ticket_id).await?;
        let next = ticket.escalate_to(
            &input.dev_id,
            &input.dev_name,
            reason,
            chrono::Utc::now().into(),
        );

        self.persist(next).await
    }

    /// Set a ticket's status. Transitions are unconstrained; leaving a
    /// terminal status is surfaced as a warning rather than blocked.
    pub async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> AppResult<support_ticket::Model> {
        let ticket = self.repo.get(ticket_id).await?;

        if ticket.status.is_terminal() && status != ticket.status {
            tracing::warn!(
                ticket_id = %ticket_id,
                from = ticket.status.value(),
                to = status.value(),
                "Ticket left a terminal status"
            );
        }

        let next = ticket.with_status(status, chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Set a ticket's priority.
    pub async fn update_ticket_priority(
        &self,
        ticket_id: &str,
        priority: TicketPriority,
    ) -> AppResult<support_ticket::Model> {
        let ticket = self.repo.get(ticket_id).await?;
        let next = ticket.with_priority(priority, chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Append an internal note to a ticket.
    pub async fn add_internal_note(
        &self,
        ticket_id: &str,
        author_id: &str,
        author_name: &str,
        text: &str,
    ) -> AppResult<support_ticket::Model> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Note text is required".to_string()));
        }

        let ticket = self.repo.get(ticket_id).await?;
        let next = ticket.add_internal_note(author_id, author_name, text, chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Record a staff response on a ticket.
    pub async fn record_response(&self, ticket_id: &str) -> AppResult<support_ticket::Model> {
        let ticket = self.repo.get(ticket_id).await?;
        let next = ticket.record_response(chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Persist the full next state (read-modify-write, last writer wins).
    async fn persist(&self, next: support_ticket::Model) -> AppResult<support_ticket::Model> {
        let model = support_ticket::ActiveModel::from(next).reset_all();
        self.repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service() -> TicketService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<support_ticket::Model>::new()])
                .into_connection(),
        );
        TicketService::new(TicketRepository::new(db))
    }

    fn valid_input() -> CreateTicketInput {
        CreateTicketInput {
            full_name: "Ada Customer".to_string(),
            email: "ada@example.com".to_string(),
            account_type: "customer".to_string(),
            device_type: "android".to_string(),
            app_version: Some("2.4.1".to_string()),
            issue_type: "Payment Issue".to_string(),
            description: "Charged twice".to_string(),
            date_time: None,
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_ticket_requires_contact_name() {
        let input = CreateTicketInput {
            full_name: "  ".to_string(),
            ..valid_input()
        };
        let err = service().create_ticket(input).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_create_ticket_requires_description() {
        let input = CreateTicketInput {
            description: String::new(),
            ..valid_input()
        };
        let err = service().create_ticket(input).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_escalate_requires_reason() {
        let err = service()
            .escalate_ticket(EscalateTicketInput {
                ticket_id: "ticket1".to_string(),
                dev_id: "dev1".to_string(),
                dev_name: "Dev One".to_string(),
                reason: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_ticket_is_not_found() {
        let err = service().get_ticket("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_note_requires_text() {
        let err = service()
            .add_internal_note("ticket1", "staff1", "Staff One", "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
