// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::message_repository::TicketMessageRepository;
use super::partner_repository::PartnerRepository;
use super::sla_repository::{SlaPolicyRepository, SlaStatusRepository};
use super::stage_tracking_repository::StageTrackingRepository;
use super::team_repository::{CalendarRepository, TeamRepository};
use super::ticket_repository::{RepositoryError, TicketRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// 工单写入路径用到的全部仓库
///
/// 同一组仓库共享一个连接：要么是连接池，要么是一个打开的事务。
#[derive(Clone)]
pub struct Repositories {
    pub tickets: Arc<dyn TicketRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub calendars: Arc<dyn CalendarRepository>,
    pub partners: Arc<dyn PartnerRepository>,
    pub tracking: Arc<dyn StageTrackingRepository>,
    pub messages: Arc<dyn TicketMessageRepository>,
    pub policies: Arc<dyn SlaPolicyRepository>,
    pub statuses: Arc<dyn SlaStatusRepository>,
}

/// 一个打开的事务
///
/// 通过 [`UnitOfWork::repos`] 写入的内容在 [`UnitOfWork::commit`] 之前对外不可见；
/// 未提交就丢弃时全部回滚。
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 绑定到该事务的仓库
    fn repos(&self) -> &Repositories;
    /// 提交事务
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// 开启事务
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}
