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
        // Named counters, one row per sequence
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskSequences::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskSequences::LastValue)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_number_unique")
                    .table(HelpdeskTickets::Table)
                    .col(HelpdeskTickets::TicketNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // SQLite only accepts one column per ALTER TABLE
        manager
            .alter_table(
                Table::alter()
                    .table(HelpdeskTickets::Table)
                    .add_column(ColumnDef::new(HelpdeskTickets::MergedIntoId).uuid())
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(HelpdeskTickets::Table)
                    .add_column(
                        ColumnDef::new(HelpdeskTickets::Locked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(HelpdeskTickets::Table)
                    .add_column(
                        ColumnDef::new(HelpdeskTickets::FollowerIds)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            HelpdeskTickets::FollowerIds,
            HelpdeskTickets::Locked,
            HelpdeskTickets::MergedIntoId,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(HelpdeskTickets::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tickets_number_unique")
                    .table(HelpdeskTickets::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskSequences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HelpdeskSequences {
    Table,
    Name,
    LastValue,
}

#[derive(DeriveIden)]
enum HelpdeskTickets {
    Table,
    TicketNumber,
    MergedIntoId,
    Locked,
    FollowerIds,
}
