// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{to_db, to_utc};
use crate::domain::models::ticket::StageTransition;
use crate::domain::repositories::stage_tracking_repository::StageTrackingRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::stage_tracking as tracking_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 阶段变化日志仓库实现，只追加不修改
#[derive(Clone)]
pub struct StageTrackingRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> StageTrackingRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl From<tracking_entity::Model> for StageTransition {
    fn from(model: tracking_entity::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            old_stage_id: model.old_stage_id,
            new_stage_id: model.new_stage_id,
            changed_at: to_utc(model.changed_at),
        }
    }
}

#[async_trait]
impl<C> StageTrackingRepository for StageTrackingRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn record(&self, transition: &StageTransition) -> Result<(), RepositoryError> {
        tracking_entity::ActiveModel {
            id: Set(transition.id),
            ticket_id: Set(transition.ticket_id),
            old_stage_id: Set(transition.old_stage_id),
            new_stage_id: Set(transition.new_stage_id),
            changed_at: Set(to_db(transition.changed_at)),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_ticket(&self, ticket_id: Uuid) -> Result<Vec<StageTransition>, RepositoryError> {
        let models = tracking_entity::Entity::find()
            .filter(tracking_entity::Column::TicketId.eq(ticket_id))
            .order_by_asc(tracking_entity::Column::ChangedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
