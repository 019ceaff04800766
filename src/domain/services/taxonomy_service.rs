// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ServiceError;
use crate::domain::models::taxonomy::{Category, Problem, SubCategory, Tag, TaxonomyKind, TicketType};
use crate::domain::models::ticket::DomainError;
use crate::domain::repositories::taxonomy_repository::TaxonomyRepository;
use rand::Rng;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 分类服务
///
/// 名称唯一性在写入前校验：分类全局唯一，子分类在所属分类内唯一，
/// 问题在所属子分类内唯一。序号按层级递增分配。
pub struct TaxonomyService {
    repo: Arc<dyn TaxonomyRepository>,
}

impl TaxonomyService {
    pub fn new(repo: Arc<dyn TaxonomyRepository>) -> Self {
        Self { repo }
    }

    /// 创建标签，颜色随机
    pub async fn create_tag(&self, name: &str) -> Result<Tag, ServiceError> {
        let name = required(name, "tag")?;
        if self.repo.find_tag_by_name(&name).await?.is_some() {
            return Err(DomainError::Validation(format!("Tag name '{}' already exists", name)).into());
        }
        let color = rand::rng().random_range(1..=11);
        Ok(self
            .repo
            .create_tag(&Tag {
                id: Uuid::new_v4(),
                name,
                color,
            })
            .await?)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ServiceError> {
        Ok(self.repo.list_tags().await?)
    }

    pub async fn create_ticket_type(&self, name: &str, sequence: i32) -> Result<TicketType, ServiceError> {
        let name = required(name, "ticket type")?;
        Ok(self
            .repo
            .create_ticket_type(&TicketType {
                id: Uuid::new_v4(),
                name,
                sequence,
            })
            .await?)
    }

    pub async fn create_category(&self, name: &str, color: Option<i32>) -> Result<Category, ServiceError> {
        let name = required(name, "category")?;
        self.ensure_unique(TaxonomyKind::Category, &name, None).await?;
        let sequence = self.repo.next_sequence(TaxonomyKind::Category).await?;
        let category = self
            .repo
            .create_category(&Category {
                id: Uuid::new_v4(),
                name,
                sequence,
                color: color.unwrap_or(1),
            })
            .await?;
        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn create_sub_category(
        &self,
        name: &str,
        category_id: Uuid,
    ) -> Result<SubCategory, ServiceError> {
        let name = required(name, "sub-category")?;
        if self.repo.find_category(category_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("category {}", category_id)));
        }
        self.ensure_unique(TaxonomyKind::SubCategory, &name, Some(category_id))
            .await?;
        let sequence = self.repo.next_sequence(TaxonomyKind::SubCategory).await?;
        Ok(self
            .repo
            .create_sub_category(&SubCategory {
                id: Uuid::new_v4(),
                name,
                sequence,
                parent_category_id: category_id,
            })
            .await?)
    }

    pub async fn create_problem(
        &self,
        name: &str,
        sub_category_id: Uuid,
    ) -> Result<Problem, ServiceError> {
        let name = required(name, "problem")?;
        if self.repo.find_sub_category(sub_category_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("sub-category {}", sub_category_id)));
        }
        self.ensure_unique(TaxonomyKind::Problem, &name, Some(sub_category_id))
            .await?;
        let sequence = self.repo.next_sequence(TaxonomyKind::Problem).await?;
        Ok(self
            .repo
            .create_problem(&Problem {
                id: Uuid::new_v4(),
                name,
                sequence,
                parent_sub_category_id: sub_category_id,
            })
            .await?)
    }

    pub async fn sub_categories(&self, category_id: Uuid) -> Result<Vec<SubCategory>, ServiceError> {
        Ok(self.repo.list_sub_categories(category_id).await?)
    }

    pub async fn problems(&self, sub_category_id: Uuid) -> Result<Vec<Problem>, ServiceError> {
        Ok(self.repo.list_problems(sub_category_id).await?)
    }

    async fn ensure_unique(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if self.repo.count_named(kind, name, parent_id).await? > 0 {
            let scope = match kind {
                TaxonomyKind::Category => "",
                TaxonomyKind::SubCategory => " in this category",
                TaxonomyKind::Problem => " in this sub-category",
            };
            return Err(DomainError::Validation(format!(
                "{} name '{}' already exists{}",
                kind, name, scope
            ))
            .into());
        }
        Ok(())
    }
}

fn required(name: &str, what: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} name is required", what)));
    }
    Ok(trimmed.to_string())
}
