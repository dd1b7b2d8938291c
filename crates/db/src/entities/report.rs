//! Abuse report entity.
//!
//! A report is a user-submitted complaint against a product or a seller.
//! Both document and photo evidence are mandatory before a report is
//! actionable; the validator on [`Model`] enforces this.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What the report is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ReportType {
    #[sea_orm(string_value = "product")]
    #[default]
    Product,
    #[sea_orm(string_value = "seller")]
    Seller,
}

impl ReportType {
    /// Canonical string value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Seller => "seller",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "Product Report",
            Self::Seller => "Seller Report",
        }
    }

    /// Normalize a raw string to a report type. Total: unknown or
    /// missing input maps to [`Self::Product`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("seller") => Self::Seller,
            _ => Self::Product,
        }
    }
}

/// Review status of a report.
///
/// Approved and Rejected are terminal; Pending is the only
/// non-terminal state. Status carries no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ReportStatus {
    /// Canonical string value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Normalize a raw string to a report status. Total: every known
    /// legacy alias is listed here; anything unrecognized (including
    /// `under_review` and missing input) maps to [`Self::Pending`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            // Older records wrote "resolved" for approved reports.
            Some("approved" | "resolved") => Self::Approved,
            Some("rejected") => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Whether the status is terminal (no further review expected).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// JSON-backed list of evidence URLs.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct EvidenceUrls(pub Vec<String>);

impl EvidenceUrls {
    /// Number of entries, blank or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any entry is blank or whitespace-only.
    #[must_use]
    pub fn has_blank_entries(&self) -> bool {
        self.0.iter().any(|url| url.trim().is_empty())
    }
}

impl From<Vec<String>> for EvidenceUrls {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

/// The fixed set of reasons a report may cite. Anything outside this
/// list fails validation.
pub const REPORT_REASONS: [&str; 8] = [
    "Selling Fake or Counterfeit Products",
    "Misleading Business or Contact Information",
    "Used Expired or Unsafe Products",
    "Unprofessional or Inappropriate Behavior",
    "Fake or Incorrect Business Location",
    "Overpriced or Hidden Charges",
    "No Delivery / Ghost Seller",
    "Other (Please describe below)",
];

/// The sentinel reason that requires a free-text description.
pub const OTHER_REASON: &str = "Other (Please describe below)";

/// Abuse report model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The user who submitted the report.
    pub user_id: String,
    /// Whether the report targets a product or a seller.
    pub report_type: ReportType,
    /// Reason cited by the reporter; must be one of [`REPORT_REASONS`].
    pub reason: String,
    /// Free-text description; mandatory when the reason is [`OTHER_REASON`].
    #[sea_orm(nullable)]
    pub description: Option<String>,
    /// Issue text as captured by the submission form.
    #[sea_orm(nullable)]
    pub issue_report: Option<String>,
    /// Any additional details supplied by the reporter.
    #[sea_orm(nullable)]
    pub additional_details: Option<String>,
    /// Document evidence URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub evidence_files: EvidenceUrls,
    /// Photo evidence URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub evidence_photos: EvidenceUrls,
    /// Current review status.
    pub status: ReportStatus,
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
    /// Notes recorded by staff during review.
    #[sea_orm(nullable)]
    pub admin_notes: Option<String>,
    /// Resolution text recorded when the report reaches a terminal status.
    #[sea_orm(nullable)]
    pub resolution_details: Option<String>,
    /// Staff member currently handling the report.
    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,
    #[sea_orm(nullable)]
    pub assigned_to_name: Option<String>,
    #[sea_orm(nullable)]
    pub assigned_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Validate the report against the submission rules.
    ///
    /// Returns an empty list exactly when the report is actionable.
    /// Each entry is a human-readable reason suitable for display.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.user_id.trim().is_empty() {
            errors.push("Reporting user is required".to_string());
        }

        let reason = self.reason.trim();
        if reason.is_empty() {
            errors.push("Report reason is required".to_string());
        } else if !REPORT_REASONS.contains(&reason) {
            errors.push("Report reason is not recognized".to_string());
        }

        if reason == OTHER_REASON
            && self
                .description
                .as_deref()
                .is_none_or(|d| d.trim().is_empty())
        {
            errors.push("Description is required for \"Other\" reports".to_string());
        }

        // Document + photo evidence are both mandatory.
        if self.evidence_files.is_empty() {
            errors.push("Document evidence is required".to_string());
        }
        if self.evidence_photos.is_empty() {
            errors.push("Photo evidence is required".to_string());
        }
        if self.evidence_files.has_blank_entries() || self.evidence_photos.has_blank_entries() {
            errors.push("Evidence entries must not be blank".to_string());
        }

        errors
    }

    /// Whether the report passes every validation rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Whether either evidence collection holds at least one entry.
    #[must_use]
    pub fn has_evidence(&self) -> bool {
        !self.evidence_files.is_empty() || !self.evidence_photos.is_empty()
    }

    /// Whether both evidence collections hold at least one entry.
    #[must_use]
    pub fn has_required_evidence(&self) -> bool {
        !self.evidence_files.is_empty() && !self.evidence_photos.is_empty()
    }

    /// Total number of evidence entries across both collections.
    #[must_use]
    pub fn total_evidence_count(&self) -> usize {
        self.evidence_files.len() + self.evidence_photos.len()
    }

    /// All evidence URLs, documents first, blanks filtered.
    #[must_use]
    pub fn all_evidence_urls(&self) -> Vec<String> {
        self.evidence_files
            .0
            .iter()
            .chain(self.evidence_photos.0.iter())
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Assign the report to a staff member. Re-assigning overwrites the
    /// previous assignee. Review status is untouched.
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
        self.updated_at = Some(now);
        self
    }

    /// Clear the assignment. Unlike tickets, a report's review status is
    /// independent of who is handling it and stays as-is.
    #[must_use]
    pub fn unassign(mut self, now: DateTimeWithTimeZone) -> Self {
        self.assigned_to = None;
        self.assigned_to_name = None;
        self.assigned_at = None;
        self.updated_at = Some(now);
        self
    }

    /// Set the review status, optionally recording admin notes and
    /// resolution details. The transition is unconstrained.
    #[must_use]
    pub fn with_status(
        mut self,
        status: ReportStatus,
        admin_notes: Option<String>,
        resolution_details: Option<String>,
        now: DateTimeWithTimeZone,
    ) -> Self {
        self.status = status;
        if admin_notes.is_some() {
            self.admin_notes = admin_notes;
        }
        if resolution_details.is_some() {
            self.resolution_details = resolution_details;
        }
        self.updated_at = Some(now);
        self
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_report() -> Model {
        Model {
            id: "report1".to_string(),
            user_id: "user1".to_string(),
            report_type: ReportType::Seller,
            reason: "Overpriced or Hidden Charges".to_string(),
            description: None,
            issue_report: None,
            additional_details: None,
            evidence_files: EvidenceUrls(vec!["https://cdn.example/receipt.pdf".to_string()]),
            evidence_photos: EvidenceUrls(vec!["https://cdn.example/photo.jpg".to_string()]),
            status: ReportStatus::Pending,
            created_at: Utc::now().into(),
            updated_at: None,
            admin_notes: None,
            resolution_details: None,
            assigned_to: None,
            assigned_to_name: None,
            assigned_at: None,
        }
    }

    #[test]
    fn test_status_normalize_is_total() {
        for raw in [
            None,
            Some(""),
            Some("under_review"),
            Some("PENDING"),
            Some("garbage"),
        ] {
            assert_eq!(ReportStatus::normalize(raw), ReportStatus::Pending);
        }
        assert_eq!(
            ReportStatus::normalize(Some("resolved")),
            ReportStatus::Approved
        );
        assert_eq!(
            ReportStatus::normalize(Some("approved")),
            ReportStatus::Approved
        );
        assert_eq!(
            ReportStatus::normalize(Some("rejected")),
            ReportStatus::Rejected
        );
    }

    #[test]
    fn test_type_normalize_defaults_to_product() {
        assert_eq!(ReportType::normalize(None), ReportType::Product);
        assert_eq!(ReportType::normalize(Some("unknown")), ReportType::Product);
        assert_eq!(ReportType::normalize(Some("seller")), ReportType::Seller);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(ReportStatus::Approved.is_terminal());
        assert!(ReportStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_valid_report_passes() {
        let report = valid_report();
        assert!(report.validate().is_empty());
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_documents_yields_exact_error() {
        let report = Model {
            evidence_files: EvidenceUrls(vec![]),
            evidence_photos: EvidenceUrls(vec!["url".to_string()]),
            ..valid_report()
        };
        assert_eq!(
            report.validate(),
            vec!["Document evidence is required".to_string()]
        );
    }

    #[test]
    fn test_missing_photos_rejected() {
        let report = Model {
            evidence_photos: EvidenceUrls(vec![]),
            ..valid_report()
        };
        assert_eq!(
            report.validate(),
            vec!["Photo evidence is required".to_string()]
        );
    }

    #[test]
    fn test_blank_evidence_entries_rejected() {
        let report = Model {
            evidence_files: EvidenceUrls(vec!["  ".to_string()]),
            ..valid_report()
        };
        let errors = report.validate();
        assert!(errors.contains(&"Evidence entries must not be blank".to_string()));
    }

    #[test]
    fn test_unknown_reason_rejected() {
        let report = Model {
            reason: "Just bad vibes".to_string(),
            ..valid_report()
        };
        assert_eq!(
            report.validate(),
            vec!["Report reason is not recognized".to_string()]
        );
    }

    #[test]
    fn test_other_reason_requires_description() {
        let report = Model {
            reason: OTHER_REASON.to_string(),
            description: Some("   ".to_string()),
            ..valid_report()
        };
        assert_eq!(
            report.validate(),
            vec!["Description is required for \"Other\" reports".to_string()]
        );

        let described = Model {
            reason: OTHER_REASON.to_string(),
            description: Some("Seller ignored all messages".to_string()),
            ..valid_report()
        };
        assert!(described.is_valid());
    }

    #[test]
    fn test_evidence_helpers() {
        let report = valid_report();
        assert!(report.has_evidence());
        assert!(report.has_required_evidence());
        assert_eq!(report.total_evidence_count(), 2);
        assert_eq!(report.all_evidence_urls().len(), 2);

        let partial = Model {
            evidence_files: EvidenceUrls(vec![]),
            ..valid_report()
        };
        assert!(partial.has_evidence());
        assert!(!partial.has_required_evidence());
    }

    #[test]
    fn test_all_evidence_urls_filters_blanks() {
        let report = Model {
            evidence_files: EvidenceUrls(vec![
                "https://cdn.example/a.pdf".to_string(),
                String::new(),
            ]),
            ..valid_report()
        };
        assert_eq!(
            report.all_evidence_urls(),
            vec![
                "https://cdn.example/a.pdf".to_string(),
                "https://cdn.example/photo.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_assign_then_unassign_preserves_status() {
        let now = Utc::now().into();
        let report = valid_report()
            .with_status(
                ReportStatus::Approved,
                None,
                Some("Listing removed".to_string()),
                now,
            )
            .assign_to("staff1", "Staff One", now);

        assert_eq!(report.assigned_to.as_deref(), Some("staff1"));
        assert_eq!(report.assigned_to_name.as_deref(), Some("Staff One"));
        assert!(report.assigned_at.is_some());

        let unassigned = report.unassign(now);
        assert!(unassigned.assigned_to.is_none());
        assert!(unassigned.assigned_to_name.is_none());
        assert!(unassigned.assigned_at.is_none());
        // Review status is independent of assignment.
        assert_eq!(unassigned.status, ReportStatus::Approved);
    }

    #[test]
    fn test_with_status_keeps_existing_notes_when_none_given() {
        let now = Utc::now().into();
        let report = valid_report().with_status(
            ReportStatus::Pending,
            Some("first pass".to_string()),
            None,
            now,
        );
        let updated = report.with_status(ReportStatus::Rejected, None, None, now);
        assert_eq!(updated.admin_notes.as_deref(), Some("first pass"));
        assert_eq!(updated.status, ReportStatus::Rejected);
    }
}
