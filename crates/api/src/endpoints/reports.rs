//! Report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use backdesk_common::AppResult;
use backdesk_core::{CreateReportInput, ReportStats, UpdateReportStatusInput};
use backdesk_db::entities::report::{self, ReportStatus};
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, state::AppState};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub reason: String,
    pub description: Option<String>,
    pub issue_report: Option<String>,
    pub additional_details: Option<String>,
    pub evidence_files: Vec<String>,
    pub evidence_photos: Vec<String>,
    pub status: String,
    pub status_label: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub admin_notes: Option<String>,
    pub resolution_details: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub assigned_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            report_type: report.report_type.value().to_string(),
            reason: report.reason,
            description: report.description,
            issue_report: report.issue_report,
            additional_details: report.additional_details,
            evidence_files: report.evidence_files.0,
            evidence_photos: report.evidence_photos.0,
            status: report.status.value().to_string(),
            status_label: report.status.label().to_string(),
            created_at: report.created_at.to_rfc3339(),
            updated_at: report.updated_at.map(|t| t.to_rfc3339()),
            admin_notes: report.admin_notes,
            resolution_details: report.resolution_details,
            assigned_to: report.assigned_to,
            assigned_to_name: report.assigned_to_name,
            assigned_at: report.assigned_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub issue_report: Option<String>,
    #[serde(default)]
    pub additional_details: Option<String>,
    #[serde(default)]
    pub evidence_files: Vec<String>,
    #[serde(default)]
    pub evidence_photos: Vec<String>,
}

/// List reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsRequest {
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

/// Show report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReportRequest {
    pub report_id: String,
}

/// Reports-for-user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsForUserRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Reports-for-assignee request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsForAssigneeRequest {
    pub staff_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Assign report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignReportRequest {
    pub report_id: String,
    pub staff_id: String,
    pub staff_name: String,
}

/// Unassign report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignReportRequest {
    pub report_id: String,
}

/// Update report status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusRequest {
    pub report_id: String,
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub resolution_details: Option<String>,
}

// ========== Handlers ==========

/// Create a report.
async fn create_report(
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .create_report(CreateReportInput {
            user_id: req.user_id,
            report_type: req.report_type,
            reason: req.reason,
            description: req.description,
            issue_report: req.issue_report,
            additional_details: req.additional_details,
            evidence_files: req.evidence_files,
            evidence_photos: req.evidence_photos,
        })
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// List reports, newest first, optionally filtered by status.
async fn list_reports(
    State(state): State<AppState>,
    Json(req): Json<ListReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let status = req
        .status
        .as_deref()
        .map(|s| ReportStatus::normalize(Some(s)));

    let reports = state
        .report_service
        .get_reports(status, req.limit.min(100), req.offset)
        .await?;

    let responses: Vec<ReportResponse> =
        reports.into_iter().map(std::convert::Into::into).collect();

    Ok(ApiResponse::ok(responses))
}

/// Get a specific report.
async fn show_report(
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.get_report(&req.report_id).await?;

    Ok(ApiResponse::ok(report.into()))
}

/// List reports submitted by a user.
async fn reports_for_user(
    State(state): State<AppState>,
    Json(req): Json<ReportsForUserRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = state
        .report_service
        .get_reports_for_user(&req.user_id, req.limit.min(100))
        .await?;

    let responses: Vec<ReportResponse> =
        reports.into_iter().map(std::convert::Into::into).collect();

    Ok(ApiResponse::ok(responses))
}

/// List reports assigned to a staff member.
async fn reports_for_assignee(
    State(state): State<AppState>,
    Json(req): Json<ReportsForAssigneeRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = state
        .report_service
        .get_reports_for_assignee(&req.staff_id, req.limit.min(100))
        .await?;

    let responses: Vec<ReportResponse> =
        reports.into_iter().map(std::convert::Into::into).collect();

    Ok(ApiResponse::ok(responses))
}

/// Assign a report to a staff member.
async fn assign_report(
    State(state): State<AppState>,
    Json(req): Json<AssignReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .assign_report(&req.report_id, &req.staff_id, &req.staff_name)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Clear a report's assignment. The review status is untouched.
async fn unassign_report(
    State(state): State<AppState>,
    Json(req): Json<UnassignReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.unassign_report(&req.report_id).await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Update a report's status.
async fn update_report_status(
    State(state): State<AppState>,
    Json(req): Json<UpdateReportStatusRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .update_report_status(UpdateReportStatusInput {
            report_id: req.report_id,
            status: req.status,
            admin_notes: req.admin_notes,
            resolution_details: req.resolution_details,
        })
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Aggregate report statistics.
async fn report_stats(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReportStats>> {
    let stats = state.stats_service.report_stats().await?;

    Ok(ApiResponse::ok(stats))
}

/// Report routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_report))
        .route("/list", post(list_reports))
        .route("/show", post(show_report))
        .route("/for-user", post(reports_for_user))
        .route("/for-assignee", post(reports_for_assignee))
        .route("/assign", post(assign_report))
        .route("/unassign", post(unassign_report))
        .route("/update-status", post(update_report_status))
        .route("/stats", post(report_stats))
}
