// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tickets table
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskTickets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTickets::TicketNumber)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::Name).string().not_null())
                    .col(ColumnDef::new(HelpdeskTickets::Description).text())
                    .col(ColumnDef::new(HelpdeskTickets::TeamId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::UserId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::PartnerId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::PartnerName).string())
                    .col(ColumnDef::new(HelpdeskTickets::PartnerEmail).string())
                    .col(ColumnDef::new(HelpdeskTickets::PartnerPhone).string())
                    .col(ColumnDef::new(HelpdeskTickets::TicketTypeId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::TagIds).json().not_null())
                    .col(
                        ColumnDef::new(HelpdeskTickets::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::StageId).uuid())
                    .col(
                        ColumnDef::new(HelpdeskTickets::KanbanState)
                            .string()
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::CategoryId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::SubCategoryId).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::ProblemId).uuid())
                    .col(
                        ColumnDef::new(HelpdeskTickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTickets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTickets::DateLastStageUpdate)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::AssignDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(HelpdeskTickets::CloseDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(HelpdeskTickets::ClosedByPartner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::CloseComment).text())
                    .col(ColumnDef::new(HelpdeskTickets::CmForm).string())
                    .col(ColumnDef::new(HelpdeskTickets::ClosedById).uuid())
                    .col(ColumnDef::new(HelpdeskTickets::TimeToCloseSecs).big_integer())
                    .col(ColumnDef::new(HelpdeskTickets::SlaDeadline).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(HelpdeskTickets::SlaReachedLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTickets::AccessToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(HelpdeskTickets::Rating).integer())
                    .col(ColumnDef::new(HelpdeskTickets::RatingFeedback).text())
                    .col(
                        ColumnDef::new(HelpdeskTickets::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_team_stage")
                    .table(HelpdeskTickets::Table)
                    .col(HelpdeskTickets::TeamId)
                    .col(HelpdeskTickets::StageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_partner")
                    .table(HelpdeskTickets::Table)
                    .col(HelpdeskTickets::PartnerId)
                    .to_owned(),
            )
            .await?;

        // Stage tracking log, used to measure time spent in frozen stages
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskStageTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskStageTracking::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskStageTracking::TicketId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpdeskStageTracking::OldStageId).uuid())
                    .col(ColumnDef::new(HelpdeskStageTracking::NewStageId).uuid())
                    .col(
                        ColumnDef::new(HelpdeskStageTracking::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stage_tracking_ticket")
                    .table(HelpdeskStageTracking::Table)
                    .col(HelpdeskStageTracking::TicketId)
                    .col(HelpdeskStageTracking::ChangedAt)
                    .to_owned(),
            )
            .await?;

        // Ticket conversation
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTicketMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskTicketMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTicketMessages::TicketId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTicketMessages::Author)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpdeskTicketMessages::AuthorId).uuid())
                    .col(ColumnDef::new(HelpdeskTicketMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(HelpdeskTicketMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_messages_ticket")
                    .table(HelpdeskTicketMessages::Table)
                    .col(HelpdeskTicketMessages::TicketId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpdeskTicketMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskStageTracking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskTickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HelpdeskTickets {
    Table,
    Id,
    TicketNumber,
    Name,
    Description,
    TeamId,
    UserId,
    PartnerId,
    PartnerName,
    PartnerEmail,
    PartnerPhone,
    TicketTypeId,
    TagIds,
    Priority,
    StageId,
    KanbanState,
    CategoryId,
    SubCategoryId,
    ProblemId,
    CreatedAt,
    UpdatedAt,
    DateLastStageUpdate,
    AssignDate,
    CloseDate,
    ClosedByPartner,
    CloseComment,
    CmForm,
    ClosedById,
    TimeToCloseSecs,
    SlaDeadline,
    SlaReachedLate,
    AccessToken,
    Rating,
    RatingFeedback,
    Active,
}

#[derive(DeriveIden)]
enum HelpdeskStageTracking {
    Table,
    Id,
    TicketId,
    OldStageId,
    NewStageId,
    ChangedAt,
}

#[derive(DeriveIden)]
enum HelpdeskTicketMessages {
    Table,
    Id,
    TicketId,
    Author,
    AuthorId,
    Body,
    CreatedAt,
}
