// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::taxonomy::{Category, Problem, SubCategory, Tag, TaxonomyKind, TicketType};
use async_trait::async_trait;
use uuid::Uuid;

/// 分类仓库特质
///
/// 覆盖标签、工单类型以及分类 / 子分类 / 问题三级结构
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn create_tag(&self, tag: &Tag) -> Result<Tag, RepositoryError>;
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, RepositoryError>;
    async fn create_ticket_type(&self, ticket_type: &TicketType) -> Result<TicketType, RepositoryError>;

    async fn create_category(&self, category: &Category) -> Result<Category, RepositoryError>;
    async fn create_sub_category(&self, sub: &SubCategory) -> Result<SubCategory, RepositoryError>;
    async fn create_problem(&self, problem: &Problem) -> Result<Problem, RepositoryError>;

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, RepositoryError>;
    async fn find_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>, RepositoryError>;
    /// 分类下的子分类，按序号排列
    async fn list_sub_categories(&self, category_id: Uuid) -> Result<Vec<SubCategory>, RepositoryError>;
    /// 子分类下的问题，按序号排列
    async fn list_problems(&self, sub_category_id: Uuid) -> Result<Vec<Problem>, RepositoryError>;

    /// 统计同名记录，`parent_id` 为上级分类或子分类
    async fn count_named(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<u64, RepositoryError>;
    /// 下一个序号（当前最大值加一）
    async fn next_sequence(&self, kind: TaxonomyKind) -> Result<i32, RepositoryError>;
}
