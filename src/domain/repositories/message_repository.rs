// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket_repository::RepositoryError;
use crate::domain::models::ticket::TicketMessage;
use async_trait::async_trait;
use uuid::Uuid;

/// 工单留言仓库特质
#[async_trait]
pub trait TicketMessageRepository: Send + Sync {
    async fn create(&self, message: &TicketMessage) -> Result<TicketMessage, RepositoryError>;
    /// 工单的留言，按时间升序
    async fn find_by_ticket(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, RepositoryError>;
}
