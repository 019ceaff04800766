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
        manager
            .create_table(
                Table::create()
                    .table(HelpdeskCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskCategories::Name).string().not_null())
                    .col(ColumnDef::new(HelpdeskCategories::Sequence).integer().not_null())
                    .col(
                        ColumnDef::new(HelpdeskCategories::Color)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HelpdeskSubCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskSubCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskSubCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(HelpdeskSubCategories::Sequence)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpdeskSubCategories::ParentCategoryId)
                            .uuid()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HelpdeskProblems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpdeskProblems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpdeskProblems::Name).string().not_null())
                    .col(ColumnDef::new(HelpdeskProblems::Sequence).integer().not_null())
                    .col(
                        ColumnDef::new(HelpdeskProblems::ParentSubCategoryId)
                            .uuid()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpdeskProblems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskSubCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpdeskCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HelpdeskCategories {
    Table,
    Id,
    Name,
    Sequence,
    Color,
}

#[derive(DeriveIden)]
enum HelpdeskSubCategories {
    Table,
    Id,
    Name,
    Sequence,
    ParentCategoryId,
}

#[derive(DeriveIden)]
enum HelpdeskProblems {
    Table,
    Id,
    Name,
    Sequence,
    ParentSubCategoryId,
}
