// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::ticket::StageTransition;
use async_trait::async_trait;
use uuid::Uuid;

/// 阶段变化记录仓库特质
#[async_trait]
pub trait StageTrackingRepository: Send + Sync {
    /// 追加一条阶段变化记录
    async fn record(&self, transition: &StageTransition) -> Result<(), RepositoryError>;
    /// 工单的阶段变化记录，按时间升序
    async fn find_by_ticket(&self, ticket_id: Uuid) -> Result<Vec<StageTransition>, RepositoryError>;
}
