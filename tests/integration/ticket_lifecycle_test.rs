// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, create_test_context, open_ticket, seed_policy, seed_support_desk};
use helpdeskrs::domain::models::capabilities::PortalAccessible;
use helpdeskrs::domain::models::partner::Partner;
use helpdeskrs::domain::models::team::Team;
use helpdeskrs::domain::models::ticket::{
    DomainError, MessageAuthor, NewTicket, TicketChanges,
};
use helpdeskrs::domain::services::ticket_service::CloseTicket;
use helpdeskrs::domain::services::ServiceError;
use uuid::Uuid;

#[tokio::test]
async fn test_new_ticket_defaults() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;

    let first = open_ticket(&ctx, &desk, |_| {}).await;
    let second = open_ticket(&ctx, &desk, |t| t.name = "  Toner low  ".into()).await;

    assert_eq!(first.ticket_number, 1);
    assert_eq!(second.ticket_number, 2);
    assert_eq!(second.name, "Toner low");
    assert_eq!(first.reference("TN"), "TN1-20250303");

    // default stage is the lowest sequence of the team
    assert_eq!(first.stage_id, Some(desk.new.id));
    assert_eq!(first.date_last_stage_update, Some(at(3, 9, 0)));

    // random assignment with a single member is deterministic
    assert_eq!(first.user_id, Some(desk.agent));
    assert_eq!(first.assign_date, Some(at(3, 9, 0)));

    assert!(!first.access_token.is_empty());
    assert_ne!(first.access_token, second.access_token);
    assert!(first.active);
}

#[tokio::test]
async fn test_blank_subject_rejected() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;

    let err = ctx
        .services
        .tickets
        .create_ticket(NewTicket {
            name: "   ".into(),
            team_id: Some(desk.team.id),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_partner_resolved_from_email() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let known = ctx
        .services
        .tickets
        .register_partner(Partner::new("Jane Doe").with_email("jane@example.com"))
        .await
        .unwrap();

    let existing = open_ticket(&ctx, &desk, |t| {
        t.partner_email = Some("Jane <JANE@example.com>".into());
    })
    .await;
    assert_eq!(existing.partner_id, Some(known.id));
    assert_eq!(existing.partner_name.as_deref(), Some("Jane Doe"));

    let created = open_ticket(&ctx, &desk, |t| {
        t.partner_email = Some("Bob Smith <bob@example.com>".into());
    })
    .await;
    assert!(created.partner_id.is_some());
    assert_ne!(created.partner_id, Some(known.id));
    assert_eq!(created.partner_name.as_deref(), Some("Bob Smith"));
    assert_eq!(created.partner_email.as_deref(), Some("bob@example.com"));
}

#[tokio::test]
async fn test_close_ticket_moves_to_closing_stage() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.solved, 8.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 10, 30));
    let closed = ctx
        .services
        .tickets
        .close_ticket(
            ticket.id,
            CloseTicket {
                comment: "<p>Replaced the <b>fuser</b></p><p>All good</p>".into(),
                cm_form: Some("hardware".into()),
                closed_by: Some(desk.agent),
                by_partner: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(closed.stage_id, Some(desk.solved.id));
    assert_eq!(closed.close_date, Some(at(3, 10, 30)));
    assert_eq!(closed.close_comment.as_deref(), Some("Replaced the fuser\nAll good"));
    assert_eq!(closed.time_to_close_secs, Some(5400));
    assert_eq!(closed.closed_by_id, Some(desk.agent));
    assert!(!closed.closed_by_partner);
    assert!(closed.is_closed());

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses[0].reached_datetime, Some(at(3, 10, 30)));
}

#[tokio::test]
async fn test_reopening_clears_close_date() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.services
        .tickets
        .close_ticket(
            ticket.id,
            CloseTicket {
                comment: "done".into(),
                by_partner: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reopened = ctx
        .services
        .tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                stage_id: Some(desk.progress.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(reopened.close_date.is_none());
    assert!(!reopened.closed_by_partner);
}

#[tokio::test]
async fn test_close_without_closing_stage_fails() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;

    let mut open_only = Team::new("Triage");
    open_only.stage_ids = vec![desk.new.id];
    let open_only = ctx.services.teams.create_team(open_only).await.unwrap();
    let ticket = ctx
        .services
        .tickets
        .create_ticket(NewTicket {
            name: "Nowhere to go".into(),
            team_id: Some(open_only.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = ctx
        .services
        .tickets
        .close_ticket(ticket.id, CloseTicket::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidTransition(_))
    ));
}

#[tokio::test]
async fn test_team_change_resets_foreign_stage() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |t| t.stage_id = Some(desk.progress.id)).await;

    let mut second_line = Team::new("Second line");
    second_line.stage_ids = vec![desk.waiting.id, desk.solved.id];
    let second_line = ctx.services.teams.create_team(second_line).await.unwrap();

    let moved = ctx
        .services
        .tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                team_id: Some(Some(second_line.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.team_id, Some(second_line.id));
    assert_eq!(moved.stage_id, Some(desk.waiting.id));
}

#[tokio::test]
async fn test_assign_sets_assign_date_once() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 12, 0));
    let other = Uuid::new_v4();
    let reassigned = ctx.services.tickets.assign(ticket.id, other).await.unwrap();
    assert_eq!(reassigned.user_id, Some(other));
    assert_eq!(reassigned.assign_date, Some(at(3, 9, 0)));

    let durations = ctx.services.tickets.durations(&reassigned).await.unwrap();
    assert_eq!(durations.assign_hours, Some(0.0));
    assert_eq!(durations.close_hours, None);
    assert_eq!(durations.open_hours, 3.0);
}

#[tokio::test]
async fn test_portal_access_and_rating() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;
    let tickets = &ctx.services.tickets;

    let found = tickets.find_by_access_token(&ticket.access_token).await.unwrap();
    assert_eq!(found.id, ticket.id);
    assert!(found.portal_url().ends_with(&ticket.access_token));
    assert!(matches!(
        tickets.find_by_access_token("forged").await,
        Err(ServiceError::NotFound(_))
    ));

    let rated = tickets
        .rate(ticket.id, 5, Some("Fast and friendly".into()))
        .await
        .unwrap();
    assert_eq!(rated.rating, Some(5));
    assert_eq!(rated.rating_feedback.as_deref(), Some("Fast and friendly"));
    assert!(tickets.rate(ticket.id, 9, None).await.is_err());
}

#[tokio::test]
async fn test_messages_keep_author_and_order() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;
    let tickets = &ctx.services.tickets;

    tickets
        .post_message(ticket.id, MessageAuthor::Customer, None, "It smells like smoke")
        .await
        .unwrap();
    ctx.clock.set(at(3, 9, 5));
    tickets
        .post_message(ticket.id, MessageAuthor::Staff, Some(desk.agent), "On my way")
        .await
        .unwrap();
    assert!(tickets
        .post_message(ticket.id, MessageAuthor::Staff, None, "   ")
        .await
        .is_err());

    let messages = tickets.messages(ticket.id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].author, MessageAuthor::Customer);
    assert_eq!(messages[1].author_id, Some(desk.agent));
    assert_eq!(messages[1].body, "On my way");
}

#[tokio::test]
async fn test_partner_ticket_count_spans_company() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let tickets = &ctx.services.tickets;

    let company = tickets.register_partner(Partner::new("Acme")).await.unwrap();
    let alice = tickets
        .register_partner(Partner::new("Alice").with_parent(company.id))
        .await
        .unwrap();
    let bob = tickets
        .register_partner(Partner::new("Bob").with_parent(company.id))
        .await
        .unwrap();

    let from_alice = open_ticket(&ctx, &desk, |t| t.partner_id = Some(alice.id)).await;
    open_ticket(&ctx, &desk, |t| t.partner_id = Some(bob.id)).await;
    open_ticket(&ctx, &desk, |t| t.partner_id = Some(company.id)).await;
    open_ticket(&ctx, &desk, |_| {}).await;

    assert_eq!(tickets.partner_ticket_count(&from_alice).await.unwrap(), 2);

    let missing_parent = tickets
        .register_partner(Partner::new("Orphan").with_parent(Uuid::new_v4()))
        .await;
    assert!(matches!(missing_parent, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_merge_closes_and_locks_source() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let source = open_ticket(&ctx, &desk, |t| {
        t.partner_email = Some("Bob Smith <bob@example.com>".into());
    })
    .await;
    let target = open_ticket(&ctx, &desk, |t| t.name = "Printer still on fire".into()).await;
    let tickets = &ctx.services.tickets;

    ctx.clock.set(at(3, 11, 0));
    let merged = tickets.merge_tickets(source.id, target.id).await.unwrap();

    assert_eq!(merged.source.stage_id, Some(desk.solved.id));
    assert_eq!(merged.source.close_date, Some(at(3, 11, 0)));
    assert_eq!(merged.source.time_to_close_secs, Some(7200));
    assert_eq!(merged.source.merged_into_id, Some(target.id));
    assert!(merged.source.locked);
    assert!(merged.source.is_closed());

    assert!(!merged.target.is_closed());
    assert_eq!(merged.target.follower_ids, vec![source.partner_id.unwrap()]);

    let prefix = &tickets.settings().ticket_number_prefix;
    let messages = tickets.messages(target.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].author, MessageAuthor::Staff);
    assert_eq!(
        messages[0].body,
        format!(
            "Ticket {} was merged into {}",
            source.reference(prefix),
            target.reference(prefix)
        )
    );
}

#[tokio::test]
async fn test_merged_ticket_stays_closed() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let source = open_ticket(&ctx, &desk, |_| {}).await;
    let target = open_ticket(&ctx, &desk, |_| {}).await;
    let other = open_ticket(&ctx, &desk, |_| {}).await;
    let tickets = &ctx.services.tickets;

    tickets.merge_tickets(source.id, target.id).await.unwrap();

    let err = tickets
        .update_ticket(
            source.id,
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
    assert_eq!(tickets.get(source.id).await.unwrap().stage_id, Some(desk.solved.id));

    // a merged ticket can be neither merged again nor absorb others
    let again = tickets.merge_tickets(source.id, other.id).await.unwrap_err();
    assert!(matches!(
        again,
        ServiceError::Domain(DomainError::InvalidTransition(_))
    ));
    let into_merged = tickets.merge_tickets(other.id, source.id).await.unwrap_err();
    assert!(matches!(
        into_merged,
        ServiceError::Domain(DomainError::InvalidTransition(_))
    ));

    let itself = tickets.merge_tickets(target.id, target.id).await.unwrap_err();
    assert!(matches!(itself, ServiceError::Domain(DomainError::Validation(_))));
}
