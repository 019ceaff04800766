// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::calendar::ResourceCalendar;
use crate::domain::models::team::{Stage, Team};
use async_trait::async_trait;
use uuid::Uuid;

/// 团队仓库特质
///
/// 管理团队、阶段及两者之间的关联
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// 创建团队（同时写入阶段关联）
    async fn create_team(&self, team: &Team) -> Result<Team, RepositoryError>;
    /// 根据ID查找团队，包含阶段列表
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, RepositoryError>;
    /// 批量查找团队
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Team>, RepositoryError>;
    /// 按创建时间排序的第一个团队
    async fn first_team(&self) -> Result<Option<Team>, RepositoryError>;
    /// 创建阶段并关联到团队
    async fn create_stage(&self, stage: &Stage, team_ids: &[Uuid]) -> Result<Stage, RepositoryError>;
    /// 根据ID查找阶段
    async fn find_stage(&self, id: Uuid) -> Result<Option<Stage>, RepositoryError>;
    /// 批量查找阶段
    async fn find_stages(&self, ids: &[Uuid]) -> Result<Vec<Stage>, RepositoryError>;
    /// 团队的阶段，按序号排列
    async fn stages_for_team(&self, team_id: Uuid) -> Result<Vec<Stage>, RepositoryError>;
    /// 关联到任一团队且序号不大于 `sequence` 的阶段
    async fn stages_up_to_sequence(
        &self,
        team_ids: &[Uuid],
        sequence: i32,
    ) -> Result<Vec<Stage>, RepositoryError>;
}

/// 工作日历仓库特质
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    async fn create(&self, calendar: &ResourceCalendar) -> Result<ResourceCalendar, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ResourceCalendar>, RepositoryError>;
}
