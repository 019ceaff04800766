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
        // SLA policies
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskSlas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskSlas::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskSlas::Name).string().not_null())
                    .col(ColumnDef::new(HelpdeskSlas::TeamId).uuid().not_null())
                    .col(
                        ColumnDef::new(HelpdeskSlas::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HelpdeskSlas::TicketTypeId).uuid())
                    .col(ColumnDef::new(HelpdeskSlas::TagIds).json().not_null())
                    .col(ColumnDef::new(HelpdeskSlas::StageId).uuid().not_null())
                    .col(
                        ColumnDef::new(HelpdeskSlas::StageSequence)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HelpdeskSlas::TimeHours).double().not_null())
                    .col(ColumnDef::new(HelpdeskSlas::ExcludeStageIds).json().not_null())
                    .col(ColumnDef::new(HelpdeskSlas::PartnerIds).json().not_null())
                    .col(
                        ColumnDef::new(HelpdeskSlas::Active)
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
                    .name("idx_slas_team_priority")
                    .table(HelpdeskSlas::Table)
                    .col(HelpdeskSlas::TeamId)
                    .col(HelpdeskSlas::Priority)
                    .to_owned(),
            )
            .await?;

        // Per-ticket SLA status
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskSlaStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskSlaStatus::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskSlaStatus::TicketId).uuid().not_null())
                    .col(ColumnDef::new(HelpdeskSlaStatus::SlaId).uuid().not_null())
                    .col(ColumnDef::new(HelpdeskSlaStatus::SlaStageId).uuid().not_null())
                    .col(ColumnDef::new(HelpdeskSlaStatus::Deadline).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(HelpdeskSlaStatus::ReachedDatetime)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(HelpdeskSlaStatus::ExceededDays).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sla_status_ticket")
                    .table(HelpdeskSlaStatus::Table)
                    .col(HelpdeskSlaStatus::TicketId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sla_status_stage_reached")
                    .table(HelpdeskSlaStatus::Table)
                    .col(HelpdeskSlaStatus::SlaStageId)
                    .col(HelpdeskSlaStatus::ReachedDatetime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpdeskSlaStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskSlas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HelpdeskSlas {
    Table,
    Id,
    Name,
    TeamId,
    Priority,
    TicketTypeId,
    TagIds,
    StageId,
    StageSequence,
    TimeHours,
    ExcludeStageIds,
    PartnerIds,
    Active,
}

#[derive(DeriveIden)]
enum HelpdeskSlaStatus {
    Table,
    Id,
    TicketId,
    SlaId,
    SlaStageId,
    Deadline,
    ReachedDatetime,
    ExceededDays,
}
