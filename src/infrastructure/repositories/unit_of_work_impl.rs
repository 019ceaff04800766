// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::message_repo_impl::TicketMessageRepositoryImpl;
use super::partner_repo_impl::PartnerRepositoryImpl;
use super::sla_repo_impl::{SlaPolicyRepositoryImpl, SlaStatusRepositoryImpl};
use super::stage_tracking_repo_impl::StageTrackingRepositoryImpl;
use super::team_repo_impl::{CalendarRepositoryImpl, TeamRepositoryImpl};
use super::ticket_repo_impl::TicketRepositoryImpl;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::domain::repositories::unit_of_work::{Repositories, UnitOfWork, UnitOfWorkFactory};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use std::sync::Arc;
use tracing::debug;

/// 在给定连接（连接池或事务）上组装仓库
pub fn repositories<C>(db: Arc<C>) -> Repositories
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    Repositories {
        tickets: Arc::new(TicketRepositoryImpl::new(db.clone())),
        teams: Arc::new(TeamRepositoryImpl::new(db.clone())),
        calendars: Arc::new(CalendarRepositoryImpl::new(db.clone())),
        partners: Arc::new(PartnerRepositoryImpl::new(db.clone())),
        tracking: Arc::new(StageTrackingRepositoryImpl::new(db.clone())),
        messages: Arc::new(TicketMessageRepositoryImpl::new(db.clone())),
        policies: Arc::new(SlaPolicyRepositoryImpl::new(db.clone())),
        statuses: Arc::new(SlaStatusRepositoryImpl::new(db)),
    }
}

/// 基于 SeaORM 事务的工作单元工厂
#[derive(Clone)]
pub struct SeaOrmUnitOfWorkFactory {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUnitOfWorkFactory {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkFactory for SeaOrmUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let txn = Arc::new(self.db.begin().await?);
        let repos = repositories(txn.clone());
        Ok(Box::new(SeaOrmUnitOfWork { txn, repos }))
    }
}

/// 持有事务和绑定到它的仓库；丢弃时事务回滚
struct SeaOrmUnitOfWork {
    txn: Arc<DatabaseTransaction>,
    repos: Repositories,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn repos(&self) -> &Repositories {
        &self.repos
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let SeaOrmUnitOfWork { txn, repos } = *self;
        // the repositories hold the other references to the transaction
        drop(repos);
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| DbErr::Custom("transaction is still referenced".to_string()))?;
        txn.commit().await?;
        debug!("Transaction committed");
        Ok(())
    }
}
