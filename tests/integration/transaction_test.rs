// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_context, open_ticket, seed_support_desk};
use async_trait::async_trait;
use helpdeskrs::config::settings::HelpdeskSettings;
use helpdeskrs::domain::models::ticket::{DomainError, NewTicket, StageTransition, TicketChanges};
use helpdeskrs::domain::repositories::stage_tracking_repository::StageTrackingRepository;
use helpdeskrs::domain::repositories::ticket_repository::RepositoryError;
use helpdeskrs::domain::repositories::unit_of_work::{
    Repositories, UnitOfWork, UnitOfWorkFactory,
};
use helpdeskrs::domain::services::ticket_service::{CloseTicket, TicketService};
use helpdeskrs::domain::services::ServiceError;
use helpdeskrs::infrastructure::repositories::unit_of_work_impl::{
    repositories, SeaOrmUnitOfWorkFactory,
};
use std::sync::Arc;
use uuid::Uuid;

/// 拒绝写入的阶段记录仓库
struct RejectingTracking;

#[async_trait]
impl StageTrackingRepository for RejectingTracking {
    async fn record(&self, _transition: &StageTransition) -> Result<(), RepositoryError> {
        Err(RepositoryError::InvalidData("tracking is read-only".into()))
    }

    async fn find_by_ticket(&self, _ticket_id: Uuid) -> Result<Vec<StageTransition>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// 事务内的阶段记录写入失败
struct RejectingTrackingFactory(SeaOrmUnitOfWorkFactory);

struct RejectingTrackingUnitOfWork {
    inner: Box<dyn UnitOfWork>,
    repos: Repositories,
}

#[async_trait]
impl UnitOfWork for RejectingTrackingUnitOfWork {
    fn repos(&self) -> &Repositories {
        &self.repos
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let RejectingTrackingUnitOfWork { inner, repos } = *self;
        drop(repos);
        inner.commit().await
    }
}

#[async_trait]
impl UnitOfWorkFactory for RejectingTrackingFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let inner = self.0.begin().await?;
        let mut repos = inner.repos().clone();
        repos.tracking = Arc::new(RejectingTracking);
        Ok(Box::new(RejectingTrackingUnitOfWork { inner, repos }))
    }
}

#[tokio::test]
async fn test_failed_batch_create_leaves_nothing() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let tickets = &ctx.services.tickets;

    let err = tickets
        .create_tickets(vec![
            NewTicket {
                name: "Fine".into(),
                team_id: Some(desk.team.id),
                ..Default::default()
            },
            NewTicket {
                name: "Broken".into(),
                team_id: Some(desk.team.id),
                stage_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    assert!(tickets.list_active().await.unwrap().is_empty());
    // the number taken by the first ticket went back with the rollback
    let number = repositories(ctx.db.clone())
        .tickets
        .next_ticket_number(1)
        .await
        .unwrap();
    assert_eq!(number, 1);
}

#[tokio::test]
async fn test_failed_batch_update_keeps_every_ticket() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let open = open_ticket(&ctx, &desk, |_| {}).await;
    let merged = open_ticket(&ctx, &desk, |_| {}).await;
    let target = open_ticket(&ctx, &desk, |_| {}).await;
    let tickets = &ctx.services.tickets;
    tickets.merge_tickets(merged.id, target.id).await.unwrap();

    let err = tickets
        .update_tickets(
            &[open.id, merged.id],
            TicketChanges {
                stage_id: Some(desk.progress.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidTransition(_))
    ));

    let untouched = tickets.get(open.id).await.unwrap();
    assert_eq!(untouched.stage_id, Some(desk.new.id));
    let history = repositories(ctx.db.clone())
        .tracking
        .find_by_ticket(open.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_close_rolls_back_when_stage_change_fails() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    let failing = TicketService::new(
        repositories(ctx.db.clone()),
        Arc::new(RejectingTrackingFactory(SeaOrmUnitOfWorkFactory::new(
            ctx.db.clone(),
        ))),
        ctx.services.sla.clone(),
        ctx.clock.clone(),
        HelpdeskSettings::default(),
    );
    let err = failing
        .close_ticket(
            ticket.id,
            CloseTicket {
                comment: "done".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repository(_)));

    let reloaded = ctx.services.tickets.get(ticket.id).await.unwrap();
    assert_eq!(reloaded.stage_id, Some(desk.new.id));
    assert!(reloaded.close_comment.is_none());
    assert!(reloaded.time_to_close_secs.is_none());
    assert!(reloaded.close_date.is_none());
}
