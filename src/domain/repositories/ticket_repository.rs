// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::{Ticket, TicketField};
use crate::domain::query::Predicate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// JSON 列无法解析
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 存储的值不符合领域约束
    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

/// 工单仓库特质
///
/// 定义工单数据访问接口
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// 创建新工单
    async fn create(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError>;
    /// 根据ID查找工单
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepositoryError>;
    /// 批量查找工单，结果按创建顺序排列
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ticket>, RepositoryError>;
    /// 根据门户访问令牌查找工单
    async fn find_by_access_token(&self, token: &str) -> Result<Option<Ticket>, RepositoryError>;
    /// 更新工单
    async fn update(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError>;
    /// 只写入 SLA 汇总字段
    async fn update_sla_summary(
        &self,
        id: Uuid,
        sla_deadline: Option<DateTime<Utc>>,
        sla_reached_late: bool,
    ) -> Result<(), RepositoryError>;
    /// 按谓词搜索工单
    async fn search(&self, predicate: &Predicate<TicketField>) -> Result<Vec<Ticket>, RepositoryError>;
    /// 分配下一个工单编号，没有工单时从 `start` 开始
    ///
    /// 在事务中调用时，编号行一直锁定到事务结束，并发创建不会拿到相同编号。
    async fn next_ticket_number(&self, start: i64) -> Result<i64, RepositoryError>;
    /// 统计属于给定客户的工单数，排除 `exclude`
    async fn count_by_partners(
        &self,
        partner_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<u64, RepositoryError>;
}
