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
        // Working calendars
        manager
            .create_table(
                Table::create()
                    .table(ResourceCalendars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceCalendars::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResourceCalendars::Name).string().not_null())
                    .col(ColumnDef::new(ResourceCalendars::HoursPerDay).double())
                    .col(ColumnDef::new(ResourceCalendars::Attendances).json().not_null())
                    .col(ColumnDef::new(ResourceCalendars::Leaves).json().not_null())
                    .to_owned(),
            )
            .await?;

        // Teams
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTeams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskTeams::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskTeams::Name).string().not_null())
                    .col(
                        ColumnDef::new(HelpdeskTeams::UseSla)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(HelpdeskTeams::CalendarId).uuid())
                    .col(
                        ColumnDef::new(HelpdeskTeams::AssignMethod)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(HelpdeskTeams::MemberIds).json().not_null())
                    .col(
                        ColumnDef::new(HelpdeskTeams::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Stages
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskStages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskStages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskStages::Name).string().not_null())
                    .col(
                        ColumnDef::new(HelpdeskStages::Sequence)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(HelpdeskStages::IsClose)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HelpdeskStages::Fold)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Team <-> stage links
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTeamStages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HelpdeskTeamStages::TeamId).uuid().not_null())
                    .col(ColumnDef::new(HelpdeskTeamStages::StageId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(HelpdeskTeamStages::TeamId)
                            .col(HelpdeskTeamStages::StageId),
                    )
                    .to_owned(),
            )
            .await?;

        // Partners
        manager
            .create_table(
                Table::create()
                    .table(ResPartners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResPartners::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResPartners::Name).string().not_null())
                    .col(ColumnDef::new(ResPartners::Email).string())
                    .col(ColumnDef::new(ResPartners::Phone).string())
                    .col(ColumnDef::new(ResPartners::ParentId).uuid())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partners_parent")
                    .table(ResPartners::Table)
                    .col(ResPartners::ParentId)
                    .to_owned(),
            )
            .await?;

        // Ticket types
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTicketTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskTicketTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTicketTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTicketTypes::Sequence)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .to_owned(),
            )
            .await?;

        // Tags
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskTags::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskTags::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(HelpdeskTags::Color).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpdeskTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskTicketTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResPartners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskTeamStages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskStages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskTeams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResourceCalendars::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ResourceCalendars {
    Table,
    Id,
    Name,
    HoursPerDay,
    Attendances,
    Leaves,
}

#[derive(DeriveIden)]
enum HelpdeskTeams {
    Table,
    Id,
    Name,
    UseSla,
    CalendarId,
    AssignMethod,
    MemberIds,
    CreatedAt,
}

#[derive(DeriveIden)]
enum HelpdeskStages {
    Table,
    Id,
    Name,
    Sequence,
    IsClose,
    Fold,
}

#[derive(DeriveIden)]
enum HelpdeskTeamStages {
    Table,
    TeamId,
    StageId,
}

#[derive(DeriveIden)]
enum ResPartners {
    Table,
    Id,
    Name,
    Email,
    Phone,
    ParentId,
}

#[derive(DeriveIden)]
enum HelpdeskTicketTypes {
    Table,
    Id,
    Name,
    Sequence,
}

#[derive(DeriveIden)]
enum HelpdeskTags {
    Table,
    Id,
    Name,
    Color,
}
