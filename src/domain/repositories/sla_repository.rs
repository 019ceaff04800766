// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::sla::{SlaPolicy, SlaPolicyField, SlaStatus, SlaStatusField};
use crate::domain::query::Predicate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// SLA 策略仓库特质
#[async_trait]
pub trait SlaPolicyRepository: Send + Sync {
    /// 创建策略
    async fn create(&self, policy: &SlaPolicy) -> Result<SlaPolicy, RepositoryError>;
    /// 根据ID查找策略
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SlaPolicy>, RepositoryError>;
    /// 批量查找策略
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SlaPolicy>, RepositoryError>;
    /// 按谓词搜索策略
    async fn search(
        &self,
        predicate: &Predicate<SlaPolicyField>,
    ) -> Result<Vec<SlaPolicy>, RepositoryError>;
}

/// SLA 状态仓库特质
///
/// 达成时间只能从空值写入，仓库不提供覆盖已有达成时间的操作。
#[async_trait]
pub trait SlaStatusRepository: Send + Sync {
    /// 批量创建状态
    async fn create_many(&self, statuses: &[SlaStatus]) -> Result<(), RepositoryError>;
    /// 查找一批工单的全部状态
    async fn find_by_tickets(&self, ticket_ids: &[Uuid]) -> Result<Vec<SlaStatus>, RepositoryError>;
    /// 更新截止时间和超期天数
    async fn update_deadline(
        &self,
        id: Uuid,
        deadline: Option<DateTime<Utc>>,
        exceeded_days: Option<f64>,
    ) -> Result<(), RepositoryError>;
    /// 批量删除状态
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepositoryError>;
    /// 将目标阶段属于 `stage_ids` 且尚未达成的状态标记为达成
    async fn mark_reached(
        &self,
        ticket_ids: &[Uuid],
        stage_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError>;
    /// 按谓词搜索状态
    async fn search(
        &self,
        predicate: &Predicate<SlaStatusField>,
    ) -> Result<Vec<SlaStatus>, RepositoryError>;
    /// 按工单统计逾期状态数（一次分组查询）
    async fn count_late_by_ticket(
        &self,
        ticket_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, RepositoryError>;
}
