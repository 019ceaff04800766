// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_helpdesk_core;
mod m20250301_000002_create_tickets;
mod m20250301_000003_create_sla;
mod m20250301_000004_create_taxonomy;
mod m20250315_000005_ticket_numbers_and_merge;

/// 数据库迁移器
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// 获取所有迁移
    ///
    /// # 返回值
    ///
    /// 返回迁移列表
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_helpdesk_core::Migration),
            Box::new(m20250301_000002_create_tickets::Migration),
            Box::new(m20250301_000003_create_sla::Migration),
            Box::new(m20250301_000004_create_taxonomy::Migration),
            Box::new(m20250315_000005_ticket_numbers_and_merge::Migration),
        ]
    }
}
