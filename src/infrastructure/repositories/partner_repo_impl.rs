// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::partner::Partner;
use crate::domain::repositories::partner_repository::PartnerRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::partner as partner_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// 客户仓库实现
#[derive(Clone)]
pub struct PartnerRepositoryImpl<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C: ConnectionTrait> PartnerRepositoryImpl<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

impl From<partner_entity::Model> for Partner {
    fn from(model: partner_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            parent_id: model.parent_id,
        }
    }
}

#[async_trait]
impl<C> PartnerRepository for PartnerRepositoryImpl<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, partner: &Partner) -> Result<Partner, RepositoryError> {
        partner_entity::ActiveModel {
            id: Set(partner.id),
            name: Set(partner.name.clone()),
            email: Set(partner.email.clone()),
            phone: Set(partner.phone.clone()),
            parent_id: Set(partner.parent_id),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(partner.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, RepositoryError> {
        let model = partner_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Partner>, RepositoryError> {
        let model = partner_entity::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(partner_entity::Column::Email)))
                    .eq(email.trim().to_lowercase()),
            )
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn ancestors(&self, id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(partner_id) = current {
            // 上级链出现环时停止
            if !seen.insert(partner_id) {
                break;
            }
            let Some(model) = partner_entity::Entity::find_by_id(partner_id)
                .one(self.db.as_ref())
                .await?
            else {
                break;
            };
            chain.push(model.id);
            current = model.parent_id;
        }

        Ok(chain)
    }

    async fn descendants(&self, id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let mut result = vec![id];
        let mut seen: HashSet<Uuid> = HashSet::from([id]);
        let mut frontier = vec![id];

        while !frontier.is_empty() {
            let children: Vec<Uuid> = partner_entity::Entity::find()
                .select_only()
                .column(partner_entity::Column::Id)
                .filter(partner_entity::Column::ParentId.is_in(frontier.clone()))
                .into_tuple()
                .all(self.db.as_ref())
                .await?;

            frontier = children.into_iter().filter(|c| seen.insert(*c)).collect();
            result.extend(&frontier);
        }

        Ok(result)
    }
}
