// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ids_from_json, ids_to_json, to_db, to_db_opt, to_utc_opt};
use crate::domain::models::sla::{SlaPolicy, SlaPolicyField, SlaStatus, SlaStatusField};
use crate::domain::models::ticket::TicketPriority;
use crate::domain::query::Predicate;
use crate::domain::repositories::sla_repository::{SlaPolicyRepository, SlaStatusRepository};
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::{sla as sla_entity, sla_status as status_entity};
use crate::infrastructure::database::query::to_condition;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// SLA 策略仓库实现
#[derive(Clone)]
pub struct SlaPolicyRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> SlaPolicyRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl TryFrom<sla_entity::Model> for SlaPolicy {
    type Error = RepositoryError;

    fn try_from(model: sla_entity::Model) -> Result<Self, Self::Error> {
        let priority = TicketPriority::from_i32(model.priority).ok_or_else(|| {
            RepositoryError::InvalidData(format!("sla priority {}", model.priority))
        })?;

        Ok(Self {
            id: model.id,
            name: model.name,
            team_id: model.team_id,
            priority,
            ticket_type_id: model.ticket_type_id,
            tag_ids: ids_from_json(model.tag_ids)?,
            stage_id: model.stage_id,
            stage_sequence: model.stage_sequence,
            time_hours: model.time_hours,
            exclude_stage_ids: ids_from_json(model.exclude_stage_ids)?,
            partner_ids: ids_from_json(model.partner_ids)?,
            active: model.active,
        })
    }
}

impl From<&SlaPolicy> for sla_entity::ActiveModel {
    fn from(policy: &SlaPolicy) -> Self {
        Self {
            id: Set(policy.id),
            name: Set(policy.name.clone()),
            team_id: Set(policy.team_id),
            priority: Set(policy.priority.as_i32()),
            ticket_type_id: Set(policy.ticket_type_id),
            tag_ids: Set(ids_to_json(&policy.tag_ids)),
            stage_id: Set(policy.stage_id),
            stage_sequence: Set(policy.stage_sequence),
            time_hours: Set(policy.time_hours),
            exclude_stage_ids: Set(ids_to_json(&policy.exclude_stage_ids)),
            partner_ids: Set(ids_to_json(&policy.partner_ids)),
            active: Set(policy.active),
        }
    }
}

fn into_policies(models: Vec<sla_entity::Model>) -> Result<Vec<SlaPolicy>, RepositoryError> {
    models.into_iter().map(SlaPolicy::try_from).collect()
}

#[async_trait]
impl<C> SlaPolicyRepository for SlaPolicyRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, policy: &SlaPolicy) -> Result<SlaPolicy, RepositoryError> {
        let model: sla_entity::ActiveModel = policy.into();

        model.insert(self.db.as_ref()).await?;
        Ok(policy.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SlaPolicy>, RepositoryError> {
        let model = sla_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(SlaPolicy::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SlaPolicy>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = sla_entity::Entity::find()
            .filter(sla_entity::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;

        into_policies(models)
    }

    async fn search(
        &self,
        predicate: &Predicate<SlaPolicyField>,
    ) -> Result<Vec<SlaPolicy>, RepositoryError> {
        let mut query = sla_entity::Entity::find();
        if let Some(condition) = to_condition(predicate) {
            query = query.filter(condition);
        }

        let models = query
            .order_by_asc(sla_entity::Column::StageSequence)
            .order_by_asc(sla_entity::Column::Name)
            .all(self.db.as_ref())
            .await?;

        Ok(predicate.filter(into_policies(models)?))
    }
}

/// SLA 状态仓库实现
#[derive(Clone)]
pub struct SlaStatusRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> SlaStatusRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl From<status_entity::Model> for SlaStatus {
    fn from(model: status_entity::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            sla_id: model.sla_id,
            sla_stage_id: model.sla_stage_id,
            deadline: to_utc_opt(model.deadline),
            reached_datetime: to_utc_opt(model.reached_datetime),
            exceeded_days: model.exceeded_days,
        }
    }
}

impl From<&SlaStatus> for status_entity::ActiveModel {
    fn from(status: &SlaStatus) -> Self {
        Self {
            id: Set(status.id),
            ticket_id: Set(status.ticket_id),
            sla_id: Set(status.sla_id),
            sla_stage_id: Set(status.sla_stage_id),
            deadline: Set(to_db_opt(status.deadline)),
            reached_datetime: Set(to_db_opt(status.reached_datetime)),
            exceeded_days: Set(status.exceeded_days),
        }
    }
}

#[async_trait]
impl<C> SlaStatusRepository for SlaStatusRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create_many(&self, statuses: &[SlaStatus]) -> Result<(), RepositoryError> {
        if statuses.is_empty() {
            return Ok(());
        }

        let models: Vec<status_entity::ActiveModel> = statuses.iter().map(Into::into).collect();
        status_entity::Entity::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_tickets(&self, ticket_ids: &[Uuid]) -> Result<Vec<SlaStatus>, RepositoryError> {
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = status_entity::Entity::find()
            .filter(status_entity::Column::TicketId.is_in(ticket_ids.iter().copied()))
            .order_by_asc(status_entity::Column::Deadline)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_deadline(
        &self,
        id: Uuid,
        deadline: Option<DateTime<Utc>>,
        exceeded_days: Option<f64>,
    ) -> Result<(), RepositoryError> {
        let result = status_entity::Entity::update_many()
            .col_expr(status_entity::Column::Deadline, Expr::value(to_db_opt(deadline)))
            .col_expr(status_entity::Column::ExceededDays, Expr::value(exceeded_days))
            .filter(status_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = status_entity::Entity::delete_many()
            .filter(status_entity::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn mark_reached(
        &self,
        ticket_ids: &[Uuid],
        stage_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        if ticket_ids.is_empty() || stage_ids.is_empty() {
            return Ok(0);
        }

        // 已达成的状态保持不变
        let result = status_entity::Entity::update_many()
            .col_expr(
                status_entity::Column::ReachedDatetime,
                Expr::value(Some(to_db(at))),
            )
            .filter(status_entity::Column::TicketId.is_in(ticket_ids.iter().copied()))
            .filter(status_entity::Column::SlaStageId.is_in(stage_ids.iter().copied()))
            .filter(status_entity::Column::ReachedDatetime.is_null())
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn search(
        &self,
        predicate: &Predicate<SlaStatusField>,
    ) -> Result<Vec<SlaStatus>, RepositoryError> {
        let mut query = status_entity::Entity::find();
        if let Some(condition) = to_condition(predicate) {
            query = query.filter(condition);
        }

        let models = query.all(self.db.as_ref()).await?;
        let statuses: Vec<SlaStatus> = models.into_iter().map(Into::into).collect();

        Ok(predicate.filter(statuses))
    }

    async fn count_late_by_ticket(
        &self,
        ticket_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, RepositoryError> {
        if ticket_ids.is_empty() {
            return Ok(HashMap::new());
        }

        use status_entity::Column;

        let late = Condition::any()
            .add(Expr::col(Column::Deadline).lt(Expr::col(Column::ReachedDatetime)))
            .add(
                Condition::all()
                    .add(Column::ReachedDatetime.is_null())
                    .add(Column::Deadline.lt(to_db(now))),
            );

        let rows: Vec<(Uuid, i64)> = status_entity::Entity::find()
            .select_only()
            .column(Column::TicketId)
            .column_as(Column::Id.count(), "late_count")
            .filter(Column::TicketId.is_in(ticket_ids.iter().copied()))
            .filter(late)
            .group_by(Column::TicketId)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(ticket_id, count)| (ticket_id, count.max(0) as u64))
            .collect())
    }
}
