// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{to_db, to_utc};
use crate::domain::models::ticket::{MessageAuthor, TicketMessage};
use crate::domain::repositories::message_repository::TicketMessageRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::ticket_message as message_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 工单留言仓库实现
#[derive(Clone)]
pub struct TicketMessageRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> TicketMessageRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl TryFrom<message_entity::Model> for TicketMessage {
    type Error = RepositoryError;

    fn try_from(model: message_entity::Model) -> Result<Self, Self::Error> {
        let author: MessageAuthor = model
            .author
            .parse()
            .map_err(|_| RepositoryError::InvalidData(format!("message author {}", model.author)))?;

        Ok(Self {
            id: model.id,
            ticket_id: model.ticket_id,
            author,
            author_id: model.author_id,
            body: model.body,
            created_at: to_utc(model.created_at),
        })
    }
}

#[async_trait]
impl<C> TicketMessageRepository for TicketMessageRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, message: &TicketMessage) -> Result<TicketMessage, RepositoryError> {
        message_entity::ActiveModel {
            id: Set(message.id),
            ticket_id: Set(message.ticket_id),
            author: Set(message.author.to_string()),
            author_id: Set(message.author_id),
            body: Set(message.body.clone()),
            created_at: Set(to_db(message.created_at)),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(message.clone())
    }

    async fn find_by_ticket(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, RepositoryError> {
        let models = message_entity::Entity::find()
            .filter(message_entity::Column::TicketId.eq(ticket_id))
            .order_by_asc(message_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(TicketMessage::try_from).collect()
    }
}
