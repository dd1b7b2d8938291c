//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `backdesk_test`)
//!   `TEST_DB_PASSWORD` (default: `backdesk_test`)
//!   `TEST_DB_NAME` (default: `backdesk_test`)

#![allow(clippy::unwrap_used)]

use backdesk_db::entities::report::{self, EvidenceUrls, ReportStatus, ReportType};
use backdesk_db::repositories::ReportRepository;
use backdesk_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::SubsecRound;
use sea_orm::Set;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_and_report_round_trip() {
    let db = TestDatabase::create_unique().await.unwrap();
    backdesk_db::migrate(db.connection()).await.unwrap();

    let repo = ReportRepository::new(db.connection_arc());

    let created = repo
        .create(report::ActiveModel {
            id: Set("report-integration-1".to_string()),
            user_id: Set("user-1".to_string()),
            report_type: Set(ReportType::Product),
            reason: Set("Counterfeit Product".to_string()),
            description: Set(None),
            issue_report: Set(None),
            additional_details: Set(None),
            evidence_files: Set(EvidenceUrls(vec!["doc.pdf".to_string()])),
            evidence_photos: Set(EvidenceUrls(vec!["photo.png".to_string()])),
            status: Set(ReportStatus::Pending),
            // Postgres keeps microsecond precision; truncate so the
            // round-trip compares equal.
            created_at: Set(chrono::Utc::now().trunc_subsecs(6).into()),
            updated_at: Set(None),
            admin_notes: Set(None),
            resolution_details: Set(None),
            assigned_to: Set(None),
            assigned_to_name: Set(None),
            assigned_at: Set(None),
        })
        .await
        .unwrap();

    let fetched = repo.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    db.drop_database().await.unwrap();
}
