//! Support ticket endpoints.

use axum::{Json, Router, extract::State, routing::post};
use backdesk_common::AppResult;
use backdesk_core::{CreateTicketInput, EscalateTicketInput, TicketStats};
use backdesk_db::entities::support_ticket::{
    self, HandlerKind, TicketPriority, TicketStatus,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{response::ApiResponse, state::AppState};

/// The party currently responsible for a ticket, as exposed over the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub name: String,
}

impl From<support_ticket::Handler> for HandlerResponse {
    fn from(handler: support_ticket::Handler) -> Self {
        Self {
            kind: match handler.kind {
                HandlerKind::Support => "support".to_string(),
                HandlerKind::Developer => "developer".to_string(),
            },
            id: handler.id,
            name: handler.name,
        }
    }
}

/// Internal note response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalNoteResponse {
    pub author: String,
    pub author_name: String,
    pub note: String,
    pub timestamp: String,
}

impl From<&support_ticket::InternalNote> for InternalNoteResponse {
    fn from(note: &support_ticket::InternalNote) -> Self {
        Self {
            author: note.author.clone(),
            author_name: note.author_name.clone(),
            note: note.note.clone(),
            timestamp: note.timestamp.to_rfc3339(),
        }
    }
}

/// Support ticket response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub account_type: String,
    pub device_type: String,
    pub app_version: Option<String>,
    pub issue_type: String,
    pub description: String,
    pub date_time: Option<String>,
    pub attachments: Vec<String>,
    pub status: String,
    pub status_label: String,
    pub priority: String,
    pub priority_label: String,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub assigned_at: Option<String>,
    pub escalated_to: Option<String>,
    pub escalated_to_name: Option<String>,
    pub escalated_at: Option<String>,
    pub escalation_reason: Option<String>,
    pub internal_notes: Vec<InternalNoteResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
    pub first_response_at: Option<String>,
    pub last_response_at: Option<String>,
    pub response_count: i32,
    pub current_handler: Option<HandlerResponse>,
    pub is_escalated: bool,
    pub is_overdue: bool,
}

impl TicketResponse {
    /// Build the response view of a ticket. `overdue_hours` is the
    /// configured overdue window.
    #[must_use]
    pub fn new(ticket: support_ticket::Model, overdue_hours: i64) -> Self {
        let now = chrono::Utc::now().into();
        let current_handler = ticket.current_handler().map(HandlerResponse::from);
        let is_escalated = ticket.is_escalated();
        let is_overdue = ticket.overdue_after(overdue_hours, now);

        Self {
            id: ticket.id,
            full_name: ticket.full_name,
            email: ticket.email,
            account_type: ticket.account_type,
            device_type: ticket.device_type,
            app_version: ticket.app_version,
            issue_type: ticket.issue_type,
            description: ticket.description,
            date_time: ticket.date_time,
            attachments: ticket.attachments.0,
            status: ticket.status.value().to_string(),
            status_label: ticket.status.label().to_string(),
            priority: ticket.priority.value().to_string(),
            priority_label: ticket.priority.label().to_string(),
            assigned_to: ticket.assigned_to,
            assigned_to_name: ticket.assigned_to_name,
            assigned_at: ticket.assigned_at.map(|t| t.to_rfc3339()),
            escalated_to: ticket.escalated_to,
            escalated_to_name: ticket.escalated_to_name,
            escalated_at: ticket.escalated_at.map(|t| t.to_rfc3339()),
            escalation_reason: ticket.escalation_reason,
            internal_notes: ticket
                .internal_notes
                .iter()
                .map(InternalNoteResponse::from)
                .collect(),
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.map(|t| t.to_rfc3339()),
            resolved_at: ticket.resolved_at.map(|t| t.to_rfc3339()),
            closed_at: ticket.closed_at.map(|t| t.to_rfc3339()),
            first_response_at: ticket.first_response_at.map(|t| t.to_rfc3339()),
            last_response_at: ticket.last_response_at.map(|t| t.to_rfc3339()),
            response_count: ticket.response_count,
            current_handler,
            is_escalated,
            is_overdue,
        }
    }
}

/// Create ticket request (contact form submission).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub full_name: String,
    #[validate(email(message = "Contact email is not valid"))]
    pub email: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub app_version: Option<String>,
    pub issue_type: String,
    pub description: String,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// List tickets request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Show ticket request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowTicketRequest {
    pub ticket_id: String,
}

/// Tickets-for-assignee request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsForAssigneeRequest {
    pub staff_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Assign ticket request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    pub ticket_id: String,
    pub staff_id: String,
    pub staff_name: String,
}

/// Unassign ticket request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignTicketRequest {
    pub ticket_id: String,
}

/// Escalate ticket request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateTicketRequest {
    pub ticket_id: String,
    pub dev_id: String,
    pub dev_name: String,
    pub reason: String,
}

/// Update ticket status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketStatusRequest {
    pub ticket_id: String,
    pub status: String,
}

/// Update ticket priority request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketPriorityRequest {
    pub ticket_id: String,
    pub priority: String,
}

/// Add internal note request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInternalNoteRequest {
    pub ticket_id: String,
    pub author_id: String,
    pub author_name: String,
    pub note: String,
}

/// Record response request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponseRequest {
    pub ticket_id: String,
}

// ========== Handlers ==========

/// Create a ticket from a contact form submission.
async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<CreateTicketRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    req.validate()?;

    let ticket = state
        .ticket_service
        .create_ticket(CreateTicketInput {
            full_name: req.full_name,
            email: req.email,
            account_type: req.account_type,
            device_type: req.device_type,
            app_version: req.app_version,
            issue_type: req.issue_type,
            description: req.description,
            date_time: req.date_time,
            attachments: req.attachments,
        })
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// List tickets, newest first, optionally filtered by status.
async fn list_tickets(
    State(state): State<AppState>,
    Json(req): Json<ListTicketsRequest>,
) -> AppResult<ApiResponse<Vec<TicketResponse>>> {
    let status = req
        .status
        .as_deref()
        .map(|s| TicketStatus::normalize(Some(s)));

    let tickets = state
        .ticket_service
        .get_tickets(status, req.limit.min(100), req.offset)
        .await?;

    let responses: Vec<TicketResponse> = tickets
        .into_iter()
        .map(|t| TicketResponse::new(t, state.overdue_hours))
        .collect();

    Ok(ApiResponse::ok(responses))
}

/// Get a specific ticket.
async fn show_ticket(
    State(state): State<AppState>,
    Json(req): Json<ShowTicketRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state.ticket_service.get_ticket(&req.ticket_id).await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// List tickets assigned to a staff member.
async fn tickets_for_assignee(
    State(state): State<AppState>,
    Json(req): Json<TicketsForAssigneeRequest>,
) -> AppResult<ApiResponse<Vec<TicketResponse>>> {
    let tickets = state
        .ticket_service
        .get_tickets_for_assignee(&req.staff_id, req.limit.min(100))
        .await?;

    let responses: Vec<TicketResponse> = tickets
        .into_iter()
        .map(|t| TicketResponse::new(t, state.overdue_hours))
        .collect();

    Ok(ApiResponse::ok(responses))
}

/// Assign a ticket to support staff.
async fn assign_ticket(
    State(state): State<AppState>,
    Json(req): Json<AssignTicketRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state
        .ticket_service
        .assign_ticket(&req.ticket_id, &req.staff_id, &req.staff_name)
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Clear a ticket's assignment and return it to the intake queue.
async fn unassign_ticket(
    State(state): State<AppState>,
    Json(req): Json<UnassignTicketRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state.ticket_service.unassign_ticket(&req.ticket_id).await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Escalate a ticket to a developer.
async fn escalate_ticket(
    State(state): State<AppState>,
    Json(req): Json<EscalateTicketRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state
        .ticket_service
        .escalate_ticket(EscalateTicketInput {
            ticket_id: req.ticket_id,
            dev_id: req.dev_id,
            dev_name: req.dev_name,
            reason: req.reason,
        })
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Update a ticket's status.
async fn update_ticket_status(
    State(state): State<AppState>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let status = TicketStatus::normalize(Some(&req.status));
    let ticket = state
        .ticket_service
        .update_ticket_status(&req.ticket_id, status)
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Update a ticket's priority.
async fn update_ticket_priority(
    State(state): State<AppState>,
    Json(req): Json<UpdateTicketPriorityRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let priority = TicketPriority::normalize(Some(&req.priority));
    let ticket = state
        .ticket_service
        .update_ticket_priority(&req.ticket_id, priority)
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Append an internal note to a ticket.
async fn add_internal_note(
    State(state): State<AppState>,
    Json(req): Json<AddInternalNoteRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state
        .ticket_service
        .add_internal_note(&req.ticket_id, &req.author_id, &req.author_name, &req.note)
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Record a staff response on a ticket.
async fn record_response(
    State(state): State<AppState>,
    Json(req): Json<RecordResponseRequest>,
) -> AppResult<ApiResponse<TicketResponse>> {
    let ticket = state
        .ticket_service
        .record_response(&req.ticket_id)
        .await?;

    Ok(ApiResponse::ok(TicketResponse::new(
        ticket,
        state.overdue_hours,
    )))
}

/// Aggregate ticket statistics.
async fn ticket_stats(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<TicketStats>> {
    let stats = state.stats_service.ticket_stats().await?;

    Ok(ApiResponse::ok(stats))
}

/// Support ticket routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_ticket))
        .route("/list", post(list_tickets))
        .route("/show", post(show_ticket))
        .route("/for-assignee", post(tickets_for_assignee))
        .route("/assign", post(assign_ticket))
        .route("/unassign", post(unassign_ticket))
        .route("/escalate", post(escalate_ticket))
        .route("/update-status", post(update_ticket_status))
        .route("/update-priority", post(update_ticket_priority))
        .route("/add-note", post(add_internal_note))
        .route("/record-response", post(record_response))
        .route("/stats", post(ticket_stats))
}
