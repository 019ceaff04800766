// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ServiceError;
use crate::domain::models::calendar::ResourceCalendar;
use crate::domain::models::team::{Stage, Team};
use crate::domain::models::ticket::DomainError;
use crate::domain::repositories::team_repository::{CalendarRepository, TeamRepository};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 团队服务
///
/// 维护团队、阶段和工作日历
pub struct TeamService {
    team_repo: Arc<dyn TeamRepository>,
    calendar_repo: Arc<dyn CalendarRepository>,
}

impl TeamService {
    /// 创建新的团队服务实例
    pub fn new(team_repo: Arc<dyn TeamRepository>, calendar_repo: Arc<dyn CalendarRepository>) -> Self {
        Self {
            team_repo,
            calendar_repo,
        }
    }

    /// 创建工作日历
    pub async fn create_calendar(
        &self,
        calendar: ResourceCalendar,
    ) -> Result<ResourceCalendar, ServiceError> {
        for attendance in &calendar.attendances {
            let valid = (0.0..=24.0).contains(&attendance.hour_from)
                && (0.0..=24.0).contains(&attendance.hour_to)
                && attendance.hour_from < attendance.hour_to;
            if !valid {
                return Err(DomainError::Validation(format!(
                    "invalid attendance {:?} {}-{}",
                    attendance.weekday, attendance.hour_from, attendance.hour_to
                ))
                .into());
            }
        }
        if calendar.leaves.iter().any(|l| l.date_from >= l.date_to) {
            return Err(DomainError::Validation("leave must end after it starts".into()).into());
        }
        if calendar.hours_per_day.is_some_and(|h| h <= 0.0 || h > 24.0) {
            return Err(DomainError::Validation("hours per day must be within (0, 24]".into()).into());
        }

        let created = self.calendar_repo.create(&calendar).await?;
        info!(calendar_id = %created.id, "Working calendar created");
        Ok(created)
    }

    /// 创建团队
    pub async fn create_team(&self, team: Team) -> Result<Team, ServiceError> {
        if team.name.trim().is_empty() {
            return Err(DomainError::Validation("team name is required".into()).into());
        }
        if let Some(calendar_id) = team.calendar_id {
            if self.calendar_repo.find_by_id(calendar_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("calendar {}", calendar_id)));
            }
        }
        let created = self.team_repo.create_team(&team).await?;
        info!(team_id = %created.id, name = %created.name, "Team created");
        Ok(created)
    }

    /// 创建阶段并关联到团队
    pub async fn create_stage(&self, stage: Stage, team_ids: &[Uuid]) -> Result<Stage, ServiceError> {
        if stage.name.trim().is_empty() {
            return Err(DomainError::Validation("stage name is required".into()).into());
        }
        let found = self.team_repo.find_by_ids(team_ids).await?;
        if let Some(missing) = team_ids.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
            return Err(ServiceError::NotFound(format!("team {}", missing)));
        }
        Ok(self.team_repo.create_stage(&stage, team_ids).await?)
    }

    pub async fn find_team(&self, id: Uuid) -> Result<Team, ServiceError> {
        self.team_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("team {}", id)))
    }

    /// 团队的阶段，按序号排列
    pub async fn stages(&self, team_id: Uuid) -> Result<Vec<Stage>, ServiceError> {
        Ok(self.team_repo.stages_for_team(team_id).await?)
    }
}
