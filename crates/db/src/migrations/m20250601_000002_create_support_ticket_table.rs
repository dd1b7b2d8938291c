//! Create the support ticket table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupportTicket::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupportTicket::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SupportTicket::FullName).string().not_null())
                    .col(ColumnDef::new(SupportTicket::Email).string().not_null())
                    .col(
                        ColumnDef::new(SupportTicket::AccountType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SupportTicket::DeviceType).string().not_null())
                    .col(ColumnDef::new(SupportTicket::AppVersion).string().null())
                    .col(ColumnDef::new(SupportTicket::IssueType).string().not_null())
                    .col(ColumnDef::new(SupportTicket::Description).text().not_null())
                    .col(ColumnDef::new(SupportTicket::DateTime).string().null())
                    .col(
                        ColumnDef::new(SupportTicket::Attachments)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::Priority)
                            .string_len(32)
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(SupportTicket::AssignedTo).string().null())
                    .col(
                        ColumnDef::new(SupportTicket::AssignedToName)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::AssignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(SupportTicket::EscalatedTo).string().null())
                    .col(
                        ColumnDef::new(SupportTicket::EscalatedToName)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::EscalatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::EscalationReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::InternalNotes)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::FirstResponseAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::LastResponseAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportTicket::ResponseCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_support_ticket_status")
                    .table(SupportTicket::Table)
                    .col(SupportTicket::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_support_ticket_assigned_to")
                    .table(SupportTicket::Table)
                    .col(SupportTicket::AssignedTo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_support_ticket_created_at")
                    .table(SupportTicket::Table)
                    .col(SupportTicket::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupportTicket::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SupportTicket {
    Table,
    Id,
    FullName,
    Email,
    AccountType,
    DeviceType,
    AppVersion,
    IssueType,
    Description,
    DateTime,
    Attachments,
    Status,
    Priority,
    AssignedTo,
    AssignedToName,
    AssignedAt,
    EscalatedTo,
    EscalatedToName,
    EscalatedAt,
    EscalationReason,
    InternalNotes,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
    ClosedAt,
    FirstResponseAt,
    LastResponseAt,
    ResponseCount,
}
