// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 帮助台数据库迁移命令行
///
/// 通过 `DATABASE_URL` 指定目标库，例如 `migration up`、`migration fresh`
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
