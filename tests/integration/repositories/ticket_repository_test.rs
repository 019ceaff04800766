// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{at, create_test_db};
use helpdeskrs::domain::models::ticket::{Ticket, TicketField, TicketPriority};
use helpdeskrs::domain::query::Predicate;
use helpdeskrs::domain::repositories::ticket_repository::{RepositoryError, TicketRepository};
use helpdeskrs::domain::repositories::unit_of_work::UnitOfWorkFactory;
use helpdeskrs::infrastructure::repositories::ticket_repo_impl::TicketRepositoryImpl;
use helpdeskrs::infrastructure::repositories::unit_of_work_impl::SeaOrmUnitOfWorkFactory;
use uuid::Uuid;

#[tokio::test]
async fn test_ticket_numbers_continue_from_max() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);

    assert_eq!(repo.next_ticket_number(100).await.unwrap(), 100);
    repo.create(&Ticket::new(100, "first", at(3, 9, 0))).await.unwrap();
    repo.create(&Ticket::new(101, "second", at(3, 9, 0))).await.unwrap();
    assert_eq!(repo.next_ticket_number(100).await.unwrap(), 102);
}

#[tokio::test]
async fn test_ticket_numbers_are_not_reused_before_insert() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);

    // allocations that have not produced a ticket yet still advance the counter
    assert_eq!(repo.next_ticket_number(1).await.unwrap(), 1);
    assert_eq!(repo.next_ticket_number(1).await.unwrap(), 2);
    assert_eq!(repo.next_ticket_number(1).await.unwrap(), 3);
}

#[tokio::test]
async fn test_duplicate_ticket_number_is_rejected() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);

    repo.create(&Ticket::new(7, "first", at(3, 9, 0))).await.unwrap();
    assert!(matches!(
        repo.create(&Ticket::new(7, "second", at(3, 9, 0))).await,
        Err(RepositoryError::Database(_))
    ));
}

#[tokio::test]
async fn test_ticket_number_allocation_follows_transaction() {
    let db = create_test_db().await;
    let factory = SeaOrmUnitOfWorkFactory::new(db.clone());
    let repo = TicketRepositoryImpl::new(db);

    let uow = factory.begin().await.unwrap();
    assert_eq!(uow.repos().tickets.next_ticket_number(10).await.unwrap(), 10);
    drop(uow);
    // rolled back together with the transaction
    assert_eq!(repo.next_ticket_number(10).await.unwrap(), 10);

    let uow = factory.begin().await.unwrap();
    assert_eq!(uow.repos().tickets.next_ticket_number(10).await.unwrap(), 11);
    uow.commit().await.unwrap();
    assert_eq!(repo.next_ticket_number(10).await.unwrap(), 12);
}

#[tokio::test]
async fn test_update_missing_ticket_is_not_found() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);
    let ghost = Ticket::new(1, "ghost", at(3, 9, 0));
    assert!(matches!(
        repo.update(&ghost).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_search_combines_sql_and_json_filters() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);
    let team = Uuid::new_v4();
    let urgent_tag = Uuid::new_v4();

    let mut tagged = Ticket::new(1, "tagged", at(3, 9, 0));
    tagged.team_id = Some(team);
    tagged.priority = TicketPriority::High;
    tagged.tag_ids = vec![urgent_tag];
    let mut plain = Ticket::new(2, "plain", at(3, 9, 0));
    plain.team_id = Some(team);
    plain.priority = TicketPriority::Urgent;
    let mut elsewhere = Ticket::new(3, "elsewhere", at(3, 9, 0));
    elsewhere.tag_ids = vec![urgent_tag];
    for ticket in [&tagged, &plain, &elsewhere] {
        repo.create(ticket).await.unwrap();
    }

    let predicate = Predicate::eq(TicketField::TeamId, team)
        .and(Predicate::intersects(TicketField::TagIds, vec![urgent_tag]));
    let found = repo.search(&predicate).await.unwrap();
    assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![tagged.id]);

    let high_or_above = Predicate::ge(TicketField::Priority, TicketPriority::High.as_i32());
    assert_eq!(repo.search(&high_or_above).await.unwrap().len(), 2);

    let unassigned_team = Predicate::is_not_set(TicketField::TeamId);
    let found = repo.search(&unassigned_team).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tag_ids, vec![urgent_tag]);
}

#[tokio::test]
async fn test_sla_summary_update() {
    let db = create_test_db().await;
    let repo = TicketRepositoryImpl::new(db);
    let ticket = repo
        .create(&Ticket::new(1, "summary", at(3, 9, 0)))
        .await
        .unwrap();

    repo.update_sla_summary(ticket.id, Some(at(3, 13, 0)), true)
        .await
        .unwrap();
    let stored = repo.find_by_id(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.sla_deadline, Some(at(3, 13, 0)));
    assert!(stored.sla_reached_late);
    assert_eq!(
        repo.find_by_access_token(&ticket.access_token)
            .await
            .unwrap()
            .map(|t| t.id),
        Some(ticket.id)
    );
}
