//! Create the report table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::UserId).string().not_null())
                    .col(ColumnDef::new(Report::ReportType).string_len(32).not_null())
                    .col(ColumnDef::new(Report::Reason).string().not_null())
                    .col(ColumnDef::new(Report::Description).text().null())
                    .col(ColumnDef::new(Report::IssueReport).text().null())
                    .col(ColumnDef::new(Report::AdditionalDetails).text().null())
                    .col(
                        ColumnDef::new(Report::EvidenceFiles)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::EvidencePhotos)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Report::AdminNotes).text().null())
                    .col(ColumnDef::new(Report::ResolutionDetails).text().null())
                    .col(ColumnDef::new(Report::AssignedTo).string().null())
                    .col(ColumnDef::new(Report::AssignedToName).string().null())
                    .col(
                        ColumnDef::new(Report::AssignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_status")
                    .table(Report::Table)
                    .col(Report::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_user_id")
                    .table(Report::Table)
                    .col(Report::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_assigned_to")
                    .table(Report::Table)
                    .col(Report::AssignedTo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_created_at")
                    .table(Report::Table)
                    .col(Report::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Report {
    Table,
    Id,
    UserId,
    ReportType,
    Reason,
    Description,
    IssueReport,
    AdditionalDetails,
    EvidenceFiles,
    EvidencePhotos,
    Status,
    CreatedAt,
    UpdatedAt,
    AdminNotes,
    ResolutionDetails,
    AssignedTo,
    AssignedToName,
    AssignedAt,
}
