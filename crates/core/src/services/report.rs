//! Report service: validation-gated intake and staff workflow for
//! abuse reports.

use backdesk_common::{AppError, AppResult, IdGenerator};
use backdesk_db::{
    entities::report::{self, EvidenceUrls, ReportStatus, ReportType},
    repositories::ReportRepository,
};
use sea_orm::{ActiveModelTrait, Set};

pub use backdesk_db::entities::report::{OTHER_REASON, REPORT_REASONS};

/// Input for creating a report.
pub struct CreateReportInput {
    pub user_id: String,
    /// Raw type string; normalized ("product" unless "seller").
    pub report_type: Option<String>,
    pub reason: String,
    pub description: Option<String>,
    pub issue_report: Option<String>,
    pub additional_details: Option<String>,
    pub evidence_files: Vec<String>,
    pub evidence_photos: Vec<String>,
}

/// Input for a staff status change on a report.
pub struct UpdateReportStatusInput {
    pub report_id: String,
    /// Raw status string; normalized through the legacy-alias table.
    pub status: String,
    pub admin_notes: Option<String>,
    pub resolution_details: Option<String>,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(repo: ReportRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new report. The submission must pass every validation
    /// rule; failures are returned as human-readable reasons, never
    /// silently coerced.
    pub async fn create_report(&self, input: CreateReportInput) -> AppResult<report::Model> {
        let candidate = report::Model {
            id: self.id_gen.generate(),
            user_id: input.user_id.trim().to_string(),
            report_type: ReportType::normalize(input.report_type.as_deref()),
            reason: input.reason.trim().to_string(),
            description: input.description,
            issue_report: input.issue_report,
            additional_details: input.additional_details,
            evidence_files: EvidenceUrls(input.evidence_files),
            evidence_photos: EvidenceUrls(input.evidence_photos),
            status: ReportStatus::Pending,
            created_at: chrono::Utc::now().into(),
            updated_at: None,
            admin_notes: None,
            resolution_details: None,
            assigned_to: None,
            assigned_to_name: None,
            assigned_at: None,
        };

        let errors = candidate.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(&errors));
        }

        let model = report::ActiveModel {
            id: Set(candidate.id),
            user_id: Set(candidate.user_id),
            report_type: Set(candidate.report_type),
            reason: Set(candidate.reason),
            description: Set(candidate.description),
            issue_report: Set(candidate.issue_report),
            additional_details: Set(candidate.additional_details),
            evidence_files: Set(candidate.evidence_files),
            evidence_photos: Set(candidate.evidence_photos),
            status: Set(candidate.status),
            created_at: Set(candidate.created_at),
            updated_at: Set(None),
            admin_notes: Set(None),
            resolution_details: Set(None),
            assigned_to: Set(None),
            assigned_to_name: Set(None),
            assigned_at: Set(None),
        };

        self.repo.create(model).await
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: &str) -> AppResult<report::Model> {
        self.repo.get(id).await
    }

    /// Get reports, newest first, optionally filtered by status.
    pub async fn get_reports(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.repo.list(status, limit, offset).await
    }

    /// Get reports submitted by a specific user.
    pub async fn get_reports_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.repo.list_for_user(user_id, limit).await
    }

    /// Get reports assigned to a specific staff member.
    pub async fn get_reports_for_assignee(
        &self,
        staff_id: &str,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.repo.list_for_assignee(staff_id, limit).await
    }

    /// Count reports awaiting review.
    pub async fn count_pending_reports(&self) -> AppResult<u64> {
        self.repo.count_pending().await
    }

    /// Assign a report to a staff member.
    pub async fn assign_report(
        &self,
        report_id: &str,
        staff_id: &str,
        staff_name: &str,
    ) -> AppResult<report::Model> {
        if staff_id.trim().is_empty() {
            return Err(AppError::BadRequest("Staff id is required".to_string()));
        }

        let report = self.repo.get(report_id).await?;
        let next = report.assign_to(staff_id, staff_name, chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Clear a report's assignment. The review status stays untouched;
    /// only who is handling the report changes.
    pub async fn unassign_report(&self, report_id: &str) -> AppResult<report::Model> {
        let report = self.repo.get(report_id).await?;
        let next = report.unassign(chrono::Utc::now().into());

        self.persist(next).await
    }

    /// Set a report's status. The raw string is normalized through the
    /// legacy-alias table and the transition is never rejected.
    pub async fn update_report_status(
        &self,
        input: UpdateReportStatusInput,
    ) -> AppResult<report::Model> {
        let status = ReportStatus::normalize(Some(&input.status));
        let report = self.repo.get(&input.report_id).await?;

        if report.status.is_terminal() && status != report.status {
            tracing::warn!(
                report_id = %input.report_id,
                from = report.status.value(),
                to = status.value(),
                "Report left a terminal status"
            );
        }

        let next = report.with_status(
            status,
            input.admin_notes,
            input.resolution_details,
            chrono::Utc::now().into(),
        );

        self.persist(next).await
    }

    /// Persist the full next state (read-modify-write, last writer wins).
    async fn persist(&self, next: report::Model) -> AppResult<report::Model> {
        let model = report::ActiveModel::from(next).reset_all();
        self.repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service() -> ReportService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );
        ReportService::new(ReportRepository::new(db))
    }

    fn valid_input() -> CreateReportInput {
        CreateReportInput {
            user_id: "user1".to_string(),
            report_type: Some("seller".to_string()),
            reason: "Overpriced or Hidden Charges".to_string(),
            description: None,
            issue_report: None,
            additional_details: None,
            evidence_files: vec!["https://cdn.example/invoice.pdf".to_string()],
            evidence_photos: vec!["https://cdn.example/photo.jpg".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_report_rejects_missing_documents() {
        let input = CreateReportInput {
            evidence_files: vec![],
            ..valid_input()
        };

        let err = service().create_report(input).await.unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Document evidence is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_report_rejects_unknown_reason() {
        let input = CreateReportInput {
            reason: "General dissatisfaction".to_string(),
            ..valid_input()
        };

        let err = service().create_report(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_assign_report_requires_staff_id() {
        let err = service()
            .assign_report("report1", "  ", "Nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_report_is_not_found() {
        let err = service().get_report("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
