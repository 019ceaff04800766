// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于 SeaORM 提供领域仓库接口的具体实现。
/// 领域层统一使用 UTC 时间，数据库列为带时区时间；
/// 集合字段以 JSON 数组存储。
pub mod message_repo_impl;
pub mod partner_repo_impl;
pub mod sla_repo_impl;
pub mod stage_tracking_repo_impl;
pub mod taxonomy_repo_impl;
pub mod team_repo_impl;
pub mod ticket_repo_impl;
pub mod unit_of_work_impl;

use crate::domain::repositories::ticket_repository::RepositoryError;
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

pub(crate) fn to_utc(dt: DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}

pub(crate) fn to_utc_opt(dt: Option<DateTime<FixedOffset>>) -> Option<DateTime<Utc>> {
    dt.map(to_utc)
}

pub(crate) fn to_db(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.fixed_offset()
}

pub(crate) fn to_db_opt(dt: Option<DateTime<Utc>>) -> Option<DateTime<FixedOffset>> {
    dt.map(to_db)
}

pub(crate) fn ids_to_json(ids: &[Uuid]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect(),
    )
}

pub(crate) fn ids_from_json(value: serde_json::Value) -> Result<Vec<Uuid>, RepositoryError> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}
