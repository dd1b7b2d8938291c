//! Support ticket repository.

use std::sync::Arc;

use crate::entities::{
    SupportTicket,
    support_ticket::{self, TicketStatus},
};
use backdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Support ticket repository for database operations.
#[derive(Clone)]
pub struct TicketRepository {
    db: Arc<DatabaseConnection>,
}

impl TicketRepository {
    /// Create a new ticket repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new ticket.
    pub async fn create(
        &self,
        model: support_ticket::ActiveModel,
    ) -> AppResult<support_ticket::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a ticket by ID.
    pub async fn get(&self, id: &str) -> AppResult<support_ticket::Model> {
        SupportTicket::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {id} not found")))
    }

    /// Get tickets, newest first, with an optional status filter.
    pub async fn list(
        &self,
        status: Option<TicketStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<support_ticket::Model>> {
        let mut query = SupportTicket::find().order_by_desc(support_ticket::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(support_ticket::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get tickets assigned to a specific staff member, newest first.
    pub async fn list_for_assignee(
        &self,
        staff_id: &str,
        limit: u64,
    ) -> AppResult<Vec<support_ticket::Model>> {
        SupportTicket::find()
            .filter(support_ticket::Column::AssignedTo.eq(staff_id))
            .order_by_desc(support_ticket::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a ticket (full next state, last writer wins).
    pub async fn update(
        &self,
        model: support_ticket::ActiveModel,
    ) -> AppResult<support_ticket::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count tickets awaiting intake.
    pub async fn count_pending(&self) -> AppResult<u64> {
        SupportTicket::find()
            .filter(support_ticket::Column::Status.eq(TicketStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the full current collection, newest first, for aggregate
    /// statistics. Stats are computed over this snapshot per call.
    pub async fn snapshot(&self) -> AppResult<Vec<support_ticket::Model>> {
        SupportTicket::find()
            .order_by_desc(support_ticket::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::support_ticket::{Attachments, InternalNotes, TicketPriority};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_ticket(id: &str, email: &str) -> support_ticket::Model {
        support_ticket::Model {
            id: id.to_string(),
            full_name: "Test Reporter".to_string(),
            email: email.to_string(),
            account_type: "customer".to_string(),
            device_type: "ios".to_string(),
            app_version: None,
            issue_type: "Order Problem".to_string(),
            description: "Order never arrived".to_string(),
            date_time: None,
            attachments: Attachments(vec![]),
            status: TicketStatus::Pending,
            priority: TicketPriority::High,
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

    #[tokio::test]
    async fn test_list_tickets() {
        let ticket1 = create_test_ticket("ticket1", "a@example.com");
        let ticket2 = create_test_ticket("ticket2", "b@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[ticket1.clone(), ticket2.clone()]])
                .into_connection(),
        );

        let repo = TicketRepository::new(db);
        let result = repo.list(None, 10, 0).await.unwrap();

        // Every observable field must survive the row conversion.
        assert_eq!(result, vec![ticket1, ticket2]);
    }

    #[tokio::test]
    async fn test_get_ticket_preserves_json_columns() {
        let mut ticket = create_test_ticket("ticket1", "a@example.com");
        ticket.attachments = Attachments(vec!["https://cdn.example/receipt.png".to_string()]);
        let ticket =
            ticket.add_internal_note("staff1", "Staff One", "Checked the order log", Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[ticket.clone()]])
                .into_connection(),
        );

        let repo = TicketRepository::new(db);
        let result = repo.get("ticket1").await.unwrap();

        assert_eq!(result, ticket);
    }

    #[tokio::test]
    async fn test_get_missing_ticket_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<support_ticket::Model>::new()])
                .into_connection(),
        );

        let repo = TicketRepository::new(db);
        let err = repo.get("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_for_assignee() {
        let mut ticket = create_test_ticket("ticket1", "a@example.com");
        ticket.assigned_to = Some("staff1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[ticket]])
                .into_connection(),
        );

        let repo = TicketRepository::new(db);
        let result = repo.list_for_assignee("staff1", 10).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].assigned_to.as_deref(), Some("staff1"));
    }
}
