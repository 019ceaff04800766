// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ids_from_json, ids_to_json, to_db, to_db_opt, to_utc, to_utc_opt};
use crate::domain::models::ticket::{Ticket, TicketField, TicketPriority};
use crate::domain::query::Predicate;
use crate::domain::repositories::ticket_repository::{RepositoryError, TicketRepository};
use crate::infrastructure::database::entities::{
    sequence as sequence_entity, ticket as ticket_entity,
};
use crate::infrastructure::database::query::to_condition;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 工单编号使用的序列名
const TICKET_SEQUENCE: &str = "helpdesk.ticket";

/// 工单仓库实现
///
/// 基于SeaORM实现的工单数据访问层
#[derive(Clone)]
pub struct TicketRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> TicketRepositoryImpl<C> {
    /// 创建新的工单仓库实例
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl TryFrom<ticket_entity::Model> for Ticket {
    type Error = RepositoryError;

    fn try_from(model: ticket_entity::Model) -> Result<Self, Self::Error> {
        let priority = TicketPriority::from_i32(model.priority).ok_or_else(|| {
            RepositoryError::InvalidData(format!("ticket priority {}", model.priority))
        })?;

        Ok(Self {
            id: model.id,
            ticket_number: model.ticket_number,
            name: model.name,
            description: model.description,
            team_id: model.team_id,
            user_id: model.user_id,
            partner_id: model.partner_id,
            partner_name: model.partner_name,
            partner_email: model.partner_email,
            partner_phone: model.partner_phone,
            ticket_type_id: model.ticket_type_id,
            tag_ids: ids_from_json(model.tag_ids)?,
            priority,
            stage_id: model.stage_id,
            kanban_state: model.kanban_state.parse().unwrap_or_default(),
            category_id: model.category_id,
            sub_category_id: model.sub_category_id,
            problem_id: model.problem_id,
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
            date_last_stage_update: to_utc_opt(model.date_last_stage_update),
            assign_date: to_utc_opt(model.assign_date),
            close_date: to_utc_opt(model.close_date),
            closed_by_partner: model.closed_by_partner,
            close_comment: model.close_comment,
            cm_form: model.cm_form,
            closed_by_id: model.closed_by_id,
            time_to_close_secs: model.time_to_close_secs,
            sla_deadline: to_utc_opt(model.sla_deadline),
            sla_reached_late: model.sla_reached_late,
            access_token: model.access_token,
            rating: model.rating,
            rating_feedback: model.rating_feedback,
            active: model.active,
            merged_into_id: model.merged_into_id,
            locked: model.locked,
            follower_ids: ids_from_json(model.follower_ids)?,
        })
    }
}

impl From<&Ticket> for ticket_entity::ActiveModel {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: Set(ticket.id),
            ticket_number: Set(ticket.ticket_number),
            name: Set(ticket.name.clone()),
            description: Set(ticket.description.clone()),
            team_id: Set(ticket.team_id),
            user_id: Set(ticket.user_id),
            partner_id: Set(ticket.partner_id),
            partner_name: Set(ticket.partner_name.clone()),
            partner_email: Set(ticket.partner_email.clone()),
            partner_phone: Set(ticket.partner_phone.clone()),
            ticket_type_id: Set(ticket.ticket_type_id),
            tag_ids: Set(ids_to_json(&ticket.tag_ids)),
            priority: Set(ticket.priority.as_i32()),
            stage_id: Set(ticket.stage_id),
            kanban_state: Set(ticket.kanban_state.to_string()),
            category_id: Set(ticket.category_id),
            sub_category_id: Set(ticket.sub_category_id),
            problem_id: Set(ticket.problem_id),
            created_at: Set(to_db(ticket.created_at)),
            updated_at: Set(to_db(ticket.updated_at)),
            date_last_stage_update: Set(to_db_opt(ticket.date_last_stage_update)),
            assign_date: Set(to_db_opt(ticket.assign_date)),
            close_date: Set(to_db_opt(ticket.close_date)),
            closed_by_partner: Set(ticket.closed_by_partner),
            close_comment: Set(ticket.close_comment.clone()),
            cm_form: Set(ticket.cm_form.clone()),
            closed_by_id: Set(ticket.closed_by_id),
            time_to_close_secs: Set(ticket.time_to_close_secs),
            sla_deadline: Set(to_db_opt(ticket.sla_deadline)),
            sla_reached_late: Set(ticket.sla_reached_late),
            access_token: Set(ticket.access_token.clone()),
            rating: Set(ticket.rating),
            rating_feedback: Set(ticket.rating_feedback.clone()),
            active: Set(ticket.active),
            merged_into_id: Set(ticket.merged_into_id),
            locked: Set(ticket.locked),
            follower_ids: Set(ids_to_json(&ticket.follower_ids)),
        }
    }
}

fn into_tickets(models: Vec<ticket_entity::Model>) -> Result<Vec<Ticket>, RepositoryError> {
    models.into_iter().map(Ticket::try_from).collect()
}

#[async_trait]
impl<C> TicketRepository for TicketRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError> {
        let model: ticket_entity::ActiveModel = ticket.into();

        model.insert(self.db.as_ref()).await?;
        Ok(ticket.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepositoryError> {
        let model = ticket_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(Ticket::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ticket>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ticket_entity::Entity::find()
            .filter(ticket_entity::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(ticket_entity::Column::TicketNumber)
            .all(self.db.as_ref())
            .await?;

        into_tickets(models)
    }

    async fn find_by_access_token(&self, token: &str) -> Result<Option<Ticket>, RepositoryError> {
        let model = ticket_entity::Entity::find()
            .filter(ticket_entity::Column::AccessToken.eq(token))
            .one(self.db.as_ref())
            .await?;

        model.map(Ticket::try_from).transpose()
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket, RepositoryError> {
        let model: ticket_entity::ActiveModel = ticket.into();

        match model.update(self.db.as_ref()).await {
            Ok(updated) => updated.try_into(),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_sla_summary(
        &self,
        id: Uuid,
        sla_deadline: Option<DateTime<Utc>>,
        sla_reached_late: bool,
    ) -> Result<(), RepositoryError> {
        ticket_entity::Entity::update_many()
            .col_expr(
                ticket_entity::Column::SlaDeadline,
                Expr::value(to_db_opt(sla_deadline)),
            )
            .col_expr(
                ticket_entity::Column::SlaReachedLate,
                Expr::value(sla_reached_late),
            )
            .filter(ticket_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn search(
        &self,
        predicate: &Predicate<TicketField>,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let mut query = ticket_entity::Entity::find();
        if let Some(condition) = to_condition(predicate) {
            query = query.filter(condition);
        }

        let models = query
            .order_by_asc(ticket_entity::Column::TicketNumber)
            .all(self.db.as_ref())
            .await?;

        Ok(predicate.filter(into_tickets(models)?))
    }

    async fn next_ticket_number(&self, start: i64) -> Result<i64, RepositoryError> {
        let db = self.db.as_ref();

        // bumping the row first holds its lock until the caller's transaction ends
        let bumped = sequence_entity::Entity::update_many()
            .col_expr(
                sequence_entity::Column::LastValue,
                Expr::col(sequence_entity::Column::LastValue).add(1),
            )
            .filter(sequence_entity::Column::Name.eq(TICKET_SEQUENCE))
            .exec(db)
            .await?;
        let last = if bumped.rows_affected > 0 {
            sequence_entity::Entity::find_by_id(TICKET_SEQUENCE.to_string())
                .one(db)
                .await?
                .map(|row| row.last_value)
        } else {
            None
        };

        // tickets written with explicit numbers still push the counter forward
        let max: Option<Option<i64>> = ticket_entity::Entity::find()
            .select_only()
            .column_as(ticket_entity::Column::TicketNumber.max(), "max_number")
            .into_tuple()
            .one(db)
            .await?;

        let next = [last, max.flatten().map(|m| m + 1), Some(start)]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(start);

        if last.is_some() {
            if last != Some(next) {
                sequence_entity::Entity::update_many()
                    .col_expr(sequence_entity::Column::LastValue, Expr::value(next))
                    .filter(sequence_entity::Column::Name.eq(TICKET_SEQUENCE))
                    .exec(db)
                    .await?;
            }
        } else {
            sequence_entity::Entity::insert(sequence_entity::ActiveModel {
                name: Set(TICKET_SEQUENCE.to_string()),
                last_value: Set(next),
            })
            .exec_without_returning(db)
            .await?;
        }

        Ok(next)
    }

    async fn count_by_partners(
        &self,
        partner_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<u64, RepositoryError> {
        if partner_ids.is_empty() {
            return Ok(0);
        }

        let count = ticket_entity::Entity::find()
            .filter(ticket_entity::Column::PartnerId.is_in(partner_ids.iter().copied()))
            .filter(ticket_entity::Column::Id.ne(exclude))
            .count(self.db.as_ref())
            .await?;

        Ok(count)
    }
}
