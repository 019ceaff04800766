// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ids_from_json, ids_to_json, to_db, to_utc};
use crate::domain::models::calendar::ResourceCalendar;
use crate::domain::models::team::{Stage, Team};
use crate::domain::repositories::team_repository::{CalendarRepository, TeamRepository};
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    resource_calendar as calendar_entity, stage as stage_entity, team as team_entity,
    team_stage as link_entity,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 团队与阶段仓库实现
///
/// 团队的阶段列表保存在关联表中，读取团队时一并装载。
#[derive(Clone)]
pub struct TeamRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> TeamRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }

    async fn stage_links(
        &self,
        team_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, RepositoryError> {
        let links = link_entity::Entity::find()
            .filter(link_entity::Column::TeamId.is_in(team_ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;

        let mut by_team: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            by_team.entry(link.team_id).or_default().push(link.stage_id);
        }
        Ok(by_team)
    }

    fn to_team(
        model: team_entity::Model,
        stage_ids: Vec<Uuid>,
    ) -> Result<Team, RepositoryError> {
        Ok(Team {
            id: model.id,
            name: model.name,
            use_sla: model.use_sla,
            calendar_id: model.calendar_id,
            assign_method: model.assign_method.parse().unwrap_or_default(),
            member_ids: ids_from_json(model.member_ids)?,
            stage_ids,
            created_at: to_utc(model.created_at),
        })
    }

    async fn load_teams(&self, models: Vec<team_entity::Model>) -> Result<Vec<Team>, RepositoryError> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut links = self.stage_links(&ids).await?;

        models
            .into_iter()
            .map(|m| {
                let stage_ids = links.remove(&m.id).unwrap_or_default();
                Self::to_team(m, stage_ids)
            })
            .collect()
    }
}

async fn insert_links<C: ConnectionTrait>(
    db: &C,
    pairs: impl Iterator<Item = (Uuid, Uuid)>,
) -> Result<(), RepositoryError> {
    let models: Vec<link_entity::ActiveModel> = pairs
        .map(|(team_id, stage_id)| link_entity::ActiveModel {
            team_id: Set(team_id),
            stage_id: Set(stage_id),
        })
        .collect();

    if !models.is_empty() {
        link_entity::Entity::insert_many(models)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}

impl From<stage_entity::Model> for Stage {
    fn from(model: stage_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sequence: model.sequence,
            is_close: model.is_close,
            fold: model.fold,
        }
    }
}

#[async_trait]
impl<C> TeamRepository for TeamRepositoryImpl<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn create_team(&self, team: &Team) -> Result<Team, RepositoryError> {
        let txn = self.db.begin().await?;

        team_entity::ActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            use_sla: Set(team.use_sla),
            calendar_id: Set(team.calendar_id),
            assign_method: Set(team.assign_method.to_string()),
            member_ids: Set(ids_to_json(&team.member_ids)),
            created_at: Set(to_db(team.created_at)),
        }
        .insert(&txn)
        .await?;

        insert_links(&txn, team.stage_ids.iter().map(|stage_id| (team.id, *stage_id))).await?;

        txn.commit().await?;
        Ok(team.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, RepositoryError> {
        let Some(model) = team_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let stage_ids = self.stage_links(&[id]).await?.remove(&id).unwrap_or_default();
        Self::to_team(model, stage_ids).map(Some)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Team>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = team_entity::Entity::find()
            .filter(team_entity::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;

        self.load_teams(models).await
    }

    async fn first_team(&self) -> Result<Option<Team>, RepositoryError> {
        let model = team_entity::Entity::find()
            .order_by_asc(team_entity::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?;

        match model {
            Some(m) => Ok(self.load_teams(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_stage(&self, stage: &Stage, team_ids: &[Uuid]) -> Result<Stage, RepositoryError> {
        let txn = self.db.begin().await?;

        stage_entity::ActiveModel {
            id: Set(stage.id),
            name: Set(stage.name.clone()),
            sequence: Set(stage.sequence),
            is_close: Set(stage.is_close),
            fold: Set(stage.fold),
        }
        .insert(&txn)
        .await?;

        insert_links(&txn, team_ids.iter().map(|team_id| (*team_id, stage.id))).await?;

        txn.commit().await?;
        Ok(stage.clone())
    }

    async fn find_stage(&self, id: Uuid) -> Result<Option<Stage>, RepositoryError> {
        let model = stage_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_stages(&self, ids: &[Uuid]) -> Result<Vec<Stage>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = stage_entity::Entity::find()
            .filter(stage_entity::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(stage_entity::Column::Sequence)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn stages_for_team(&self, team_id: Uuid) -> Result<Vec<Stage>, RepositoryError> {
        let stage_ids = self
            .stage_links(&[team_id])
            .await?
            .remove(&team_id)
            .unwrap_or_default();

        self.find_stages(&stage_ids).await
    }

    async fn stages_up_to_sequence(
        &self,
        team_ids: &[Uuid],
        sequence: i32,
    ) -> Result<Vec<Stage>, RepositoryError> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut stage_ids: Vec<Uuid> = self
            .stage_links(team_ids)
            .await?
            .into_values()
            .flatten()
            .collect();
        stage_ids.sort();
        stage_ids.dedup();
        if stage_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = stage_entity::Entity::find()
            .filter(stage_entity::Column::Id.is_in(stage_ids))
            .filter(stage_entity::Column::Sequence.lte(sequence))
            .order_by_asc(stage_entity::Column::Sequence)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

/// 资源日历仓库实现
///
/// 工作时段和停工时段以 JSON 存储。
#[derive(Clone)]
pub struct CalendarRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> CalendarRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl TryFrom<calendar_entity::Model> for ResourceCalendar {
    type Error = RepositoryError;

    fn try_from(model: calendar_entity::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            hours_per_day: model.hours_per_day,
            attendances: serde_json::from_value(model.attendances)?,
            leaves: serde_json::from_value(model.leaves)?,
        })
    }
}

#[async_trait]
impl<C> CalendarRepository for CalendarRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, calendar: &ResourceCalendar) -> Result<ResourceCalendar, RepositoryError> {
        calendar_entity::ActiveModel {
            id: Set(calendar.id),
            name: Set(calendar.name.clone()),
            hours_per_day: Set(calendar.hours_per_day),
            attendances: Set(serde_json::to_value(&calendar.attendances)?),
            leaves: Set(serde_json::to_value(&calendar.leaves)?),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(calendar.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ResourceCalendar>, RepositoryError> {
        let model = calendar_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(ResourceCalendar::try_from).transpose()
    }
}
