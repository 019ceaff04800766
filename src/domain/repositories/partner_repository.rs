// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::partner::Partner;
use async_trait::async_trait;
use uuid::Uuid;

/// 客户仓库特质
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// 创建客户
    async fn create(&self, partner: &Partner) -> Result<Partner, RepositoryError>;
    /// 根据ID查找客户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, RepositoryError>;
    /// 根据邮箱查找客户（不区分大小写）
    async fn find_by_email(&self, email: &str) -> Result<Option<Partner>, RepositoryError>;
    /// 客户本身及其所有上级，从近到远
    async fn ancestors(&self, id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
    /// 客户本身及其所有下级
    async fn descendants(&self, id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
}
