// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::taxonomy::{Category, Problem, SubCategory, Tag, TaxonomyKind, TicketType};
use crate::domain::repositories::taxonomy_repository::TaxonomyRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    category as category_entity, problem as problem_entity, sub_category as sub_category_entity,
    tag as tag_entity, ticket_type as ticket_type_entity,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 标签、工单类型及分类树的仓库实现
#[derive(Clone)]
pub struct TaxonomyRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TaxonomyRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<tag_entity::Model> for Tag {
    fn from(model: tag_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}

impl From<category_entity::Model> for Category {
    fn from(model: category_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sequence: model.sequence,
            color: model.color,
        }
    }
}

impl From<sub_category_entity::Model> for SubCategory {
    fn from(model: sub_category_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sequence: model.sequence,
            parent_category_id: model.parent_category_id,
        }
    }
}

impl From<problem_entity::Model> for Problem {
    fn from(model: problem_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sequence: model.sequence,
            parent_sub_category_id: model.parent_sub_category_id,
        }
    }
}

#[async_trait]
impl TaxonomyRepository for TaxonomyRepositoryImpl {
    async fn create_tag(&self, tag: &Tag) -> Result<Tag, RepositoryError> {
        tag_entity::ActiveModel {
            id: Set(tag.id),
            name: Set(tag.name.clone()),
            color: Set(tag.color),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(tag.clone())
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let model = tag_entity::Entity::find()
            .filter(tag_entity::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, RepositoryError> {
        let models = tag_entity::Entity::find()
            .order_by_asc(tag_entity::Column::Name)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_ticket_type(&self, ticket_type: &TicketType) -> Result<TicketType, RepositoryError> {
        ticket_type_entity::ActiveModel {
            id: Set(ticket_type.id),
            name: Set(ticket_type.name.clone()),
            sequence: Set(ticket_type.sequence),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(ticket_type.clone())
    }

    async fn create_category(&self, category: &Category) -> Result<Category, RepositoryError> {
        category_entity::ActiveModel {
            id: Set(category.id),
            name: Set(category.name.clone()),
            sequence: Set(category.sequence),
            color: Set(category.color),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(category.clone())
    }

    async fn create_sub_category(&self, sub: &SubCategory) -> Result<SubCategory, RepositoryError> {
        sub_category_entity::ActiveModel {
            id: Set(sub.id),
            name: Set(sub.name.clone()),
            sequence: Set(sub.sequence),
            parent_category_id: Set(sub.parent_category_id),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(sub.clone())
    }

    async fn create_problem(&self, problem: &Problem) -> Result<Problem, RepositoryError> {
        problem_entity::ActiveModel {
            id: Set(problem.id),
            name: Set(problem.name.clone()),
            sequence: Set(problem.sequence),
            parent_sub_category_id: Set(problem.parent_sub_category_id),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(problem.clone())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, RepositoryError> {
        let model = category_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>, RepositoryError> {
        let model = sub_category_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_sub_categories(&self, category_id: Uuid) -> Result<Vec<SubCategory>, RepositoryError> {
        let models = sub_category_entity::Entity::find()
            .filter(sub_category_entity::Column::ParentCategoryId.eq(category_id))
            .order_by_asc(sub_category_entity::Column::Sequence)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_problems(&self, sub_category_id: Uuid) -> Result<Vec<Problem>, RepositoryError> {
        let models = problem_entity::Entity::find()
            .filter(problem_entity::Column::ParentSubCategoryId.eq(sub_category_id))
            .order_by_asc(problem_entity::Column::Sequence)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_named(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<u64, RepositoryError> {
        let db = self.db.as_ref();

        let count = match kind {
            TaxonomyKind::Category => {
                category_entity::Entity::find()
                    .filter(category_entity::Column::Name.eq(name))
                    .count(db)
                    .await?
            }
            TaxonomyKind::SubCategory => {
                let mut query = sub_category_entity::Entity::find()
                    .filter(sub_category_entity::Column::Name.eq(name));
                if let Some(parent) = parent_id {
                    query = query.filter(sub_category_entity::Column::ParentCategoryId.eq(parent));
                }
                query.count(db).await?
            }
            TaxonomyKind::Problem => {
                let mut query =
                    problem_entity::Entity::find().filter(problem_entity::Column::Name.eq(name));
                if let Some(parent) = parent_id {
                    query = query.filter(problem_entity::Column::ParentSubCategoryId.eq(parent));
                }
                query.count(db).await?
            }
        };

        Ok(count)
    }

    async fn next_sequence(&self, kind: TaxonomyKind) -> Result<i32, RepositoryError> {
        let db = self.db.as_ref();

        let max: Option<Option<i32>> = match kind {
            TaxonomyKind::Category => {
                category_entity::Entity::find()
                    .select_only()
                    .column_as(category_entity::Column::Sequence.max(), "max_sequence")
                    .into_tuple()
                    .one(db)
                    .await?
            }
            TaxonomyKind::SubCategory => {
                sub_category_entity::Entity::find()
                    .select_only()
                    .column_as(sub_category_entity::Column::Sequence.max(), "max_sequence")
                    .into_tuple()
                    .one(db)
                    .await?
            }
            TaxonomyKind::Problem => {
                problem_entity::Entity::find()
                    .select_only()
                    .column_as(problem_entity::Column::Sequence.max(), "max_sequence")
                    .into_tuple()
                    .one(db)
                    .await?
            }
        };

        Ok(max.flatten().map_or(1, |m| m + 1))
    }
}
