// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, create_test_context, open_ticket, seed_policy, seed_support_desk};
use helpdeskrs::domain::models::partner::Partner;
use helpdeskrs::domain::models::sla::SlaState;
use helpdeskrs::domain::models::ticket::{NewTicket, TicketChanges, TicketPriority};
use helpdeskrs::infrastructure::repositories::unit_of_work_impl::repositories;
use std::collections::HashSet;
use uuid::Uuid;

/// 截止时间按团队的工作日历推进
#[tokio::test]
async fn test_deadline_follows_working_calendar() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let quick = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let day = seed_policy(&ctx, &desk, &desk.solved, 8.0, |_| {}).await;

    let ticket = open_ticket(&ctx, &desk, |_| {}).await;
    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses.len(), 2);

    let deadline_of = |sla_id| {
        statuses
            .iter()
            .find(|s| s.sla_id == sla_id)
            .and_then(|s| s.deadline)
    };
    assert_eq!(deadline_of(quick.id), Some(at(3, 13, 0)));
    assert_eq!(deadline_of(day.id), Some(at(3, 17, 0)));

    // earliest open deadline is mirrored on the ticket
    assert_eq!(ticket.sla_deadline, Some(at(3, 13, 0)));
    assert!(!ticket.sla_reached_late);
    assert!(statuses
        .iter()
        .all(|s| s.state(at(3, 9, 0)) == SlaState::Ongoing));
}

#[tokio::test]
async fn test_reaching_stage_in_time() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let policy = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 11, 0));
    let ticket = ctx
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

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sla_id, policy.id);
    assert_eq!(statuses[0].reached_datetime, Some(at(3, 11, 0)));
    assert_eq!(statuses[0].state(at(3, 11, 0)), SlaState::Reached);
    assert_eq!(ticket.sla_deadline, None);
    assert!(!ticket.sla_reached_late);
}

#[tokio::test]
async fn test_skipping_ahead_reaches_earlier_targets() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let early = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 10, 0));
    ctx.services
        .tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                stage_id: Some(desk.solved.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    let status = statuses.iter().find(|s| s.sla_id == early.id).unwrap();
    assert_eq!(status.reached_datetime, Some(at(3, 10, 0)));
}

#[tokio::test]
async fn test_late_reach_marks_ticket() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 14, 0));
    let ticket = ctx
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

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses[0].state(at(3, 14, 0)), SlaState::Failed);
    assert!(ticket.sla_reached_late);
    assert!(ticket.sla_fail(at(3, 14, 0)));

    let failed = ctx.services.tickets.search_by_sla(true).await.unwrap();
    assert_eq!(failed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ticket.id]);
    assert!(ctx.services.tickets.search_by_sla(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reached_datetime_is_not_overwritten() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    for (hour, stage) in [(10, &desk.progress), (11, &desk.waiting), (12, &desk.solved)] {
        ctx.clock.set(at(3, hour, 0));
        ctx.services
            .tickets
            .update_ticket(
                ticket.id,
                TicketChanges {
                    stage_id: Some(stage.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses[0].reached_datetime, Some(at(3, 10, 0)));
}

#[tokio::test]
async fn test_policy_matching_by_priority_and_tags() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let tag = Uuid::new_v4();
    let other_tag = Uuid::new_v4();
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |p| {
        p.priority = TicketPriority::High;
        p.tag_ids = vec![tag];
    })
    .await;

    let low = open_ticket(&ctx, &desk, |t| t.tag_ids = vec![tag]).await;
    let untagged = open_ticket(&ctx, &desk, |t| t.priority = TicketPriority::Urgent).await;
    let matching = open_ticket(&ctx, &desk, |t| {
        t.priority = TicketPriority::Urgent;
        t.tag_ids = vec![tag, other_tag];
    })
    .await;

    let sla = &ctx.services.sla;
    assert!(sla.statuses_for_ticket(low.id).await.unwrap().is_empty());
    assert!(sla.statuses_for_ticket(untagged.id).await.unwrap().is_empty());
    assert_eq!(sla.statuses_for_ticket(matching.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_policy_for_earlier_stage_is_skipped() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.new, 2.0, |_| {}).await;
    let later = seed_policy(&ctx, &desk, &desk.solved, 8.0, |_| {}).await;

    let ticket = open_ticket(&ctx, &desk, |t| t.stage_id = Some(desk.progress.id)).await;
    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sla_id, later.id);
}

#[tokio::test]
async fn test_priority_change_keeps_reached_status() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let first = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let second = seed_policy(&ctx, &desk, &desk.solved, 16.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 10, 0));
    ctx.services
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
    let before = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    let reached_id = before.iter().find(|s| s.sla_id == first.id).unwrap().id;

    ctx.clock.set(at(3, 11, 0));
    ctx.services
        .tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                priority: Some(TicketPriority::High),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(after.len(), 2);
    let kept = after.iter().find(|s| s.sla_id == first.id).unwrap();
    assert_eq!(kept.id, reached_id);
    assert_eq!(kept.reached_datetime, Some(at(3, 10, 0)));
    let renewed = after.iter().find(|s| s.sla_id == second.id).unwrap();
    assert!(renewed.reached_datetime.is_none());
    // 16 working hours from Monday 09:00
    assert_eq!(renewed.deadline, Some(at(4, 17, 0)));
}

#[tokio::test]
async fn test_time_in_excluded_stage_extends_deadline() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let waiting_id = desk.waiting.id;
    seed_policy(&ctx, &desk, &desk.solved, 4.0, |p| {
        p.exclude_stage_ids = vec![waiting_id];
    })
    .await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;
    assert_eq!(ticket.sla_deadline, Some(at(3, 13, 0)));

    let move_to = |stage_id| TicketChanges {
        stage_id: Some(stage_id),
        ..Default::default()
    };

    ctx.clock.set(at(3, 10, 0));
    let ticket = ctx
        .services
        .tickets
        .update_ticket(ticket.id, move_to(desk.waiting.id))
        .await
        .unwrap();
    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses[0].deadline, None);
    assert_eq!(ticket.sla_deadline, None);

    ctx.clock.set(at(3, 12, 0));
    let ticket = ctx
        .services
        .tickets
        .update_ticket(ticket.id, move_to(desk.progress.id))
        .await
        .unwrap();
    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses[0].deadline, Some(at(3, 15, 0)));
    assert_eq!(ticket.sla_deadline, Some(at(3, 15, 0)));
}

#[tokio::test]
async fn test_partner_policy_covers_company_hierarchy() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let tickets = &ctx.services.tickets;

    let company = tickets
        .register_partner(Partner::new("Acme"))
        .await
        .unwrap();
    let employee = tickets
        .register_partner(Partner::new("Wile E.").with_parent(company.id))
        .await
        .unwrap();
    let stranger = tickets
        .register_partner(Partner::new("Road Runner"))
        .await
        .unwrap();

    let company_id = company.id;
    seed_policy(&ctx, &desk, &desk.progress, 2.0, |p| {
        p.partner_ids = vec![company_id];
    })
    .await;

    let from_employee = open_ticket(&ctx, &desk, |t| t.partner_id = Some(employee.id)).await;
    let from_stranger = open_ticket(&ctx, &desk, |t| t.partner_id = Some(stranger.id)).await;
    let anonymous = open_ticket(&ctx, &desk, |_| {}).await;

    let sla = &ctx.services.sla;
    assert_eq!(sla.statuses_for_ticket(from_employee.id).await.unwrap().len(), 1);
    assert!(sla.statuses_for_ticket(from_stranger.id).await.unwrap().is_empty());
    assert!(sla.statuses_for_ticket(anonymous.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_team_without_sla_gets_no_status() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;

    let mut quiet = helpdeskrs::domain::models::team::Team::new("Quiet");
    quiet.use_sla = false;
    quiet.stage_ids = vec![desk.new.id];
    let quiet = ctx.services.teams.create_team(quiet).await.unwrap();

    let ticket = ctx
        .services
        .tickets
        .create_ticket(helpdeskrs::domain::models::ticket::NewTicket {
            name: "No rush".into(),
            team_id: Some(quiet.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(ctx
        .services
        .sla
        .statuses_for_ticket(ticket.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_search_statuses_by_state() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let in_time = open_ticket(&ctx, &desk, |_| {}).await;
    let forgotten = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 10, 0));
    ctx.services
        .tickets
        .update_ticket(
            in_time.id,
            TicketChanges {
                stage_id: Some(desk.progress.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let sla = &ctx.services.sla;
    let now = at(3, 15, 0);
    let failed = sla.search_statuses(&[SlaState::Failed], false, now).await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].ticket_id, forgotten.id);

    let reached = sla.search_statuses(&[SlaState::Reached], false, now).await.unwrap();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0].ticket_id, in_time.id);

    let not_failed = sla.search_statuses(&[SlaState::Failed], true, now).await.unwrap();
    assert_eq!(not_failed.len(), 1);
    assert_eq!(not_failed[0].ticket_id, in_time.id);

    // before the deadline the forgotten one is still ongoing
    let ongoing = sla
        .search_statuses(&[SlaState::Ongoing], false, at(3, 12, 0))
        .await
        .unwrap();
    assert_eq!(ongoing.len(), 1);
    assert_eq!(ongoing[0].ticket_id, forgotten.id);
}

fn move_to(stage_id: Uuid) -> TicketChanges {
    TicketChanges {
        stage_id: Some(stage_id),
        ..Default::default()
    }
}

/// 目标阶段已被越过的已达成状态，在触发字段变化后仍然保留
#[tokio::test]
async fn test_trigger_change_after_closing_keeps_passed_targets() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let progress = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let solved = seed_policy(&ctx, &desk, &desk.solved, 16.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;
    let tickets = &ctx.services.tickets;

    ctx.clock.set(at(3, 14, 0));
    tickets.update_ticket(ticket.id, move_to(desk.progress.id)).await.unwrap();
    ctx.clock.set(at(3, 15, 0));
    tickets.update_ticket(ticket.id, move_to(desk.solved.id)).await.unwrap();
    let before = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();

    ctx.clock.set(at(3, 16, 0));
    let ticket = tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                priority: Some(TicketPriority::High),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(after.len(), 2);
    let ids = |statuses: &[helpdeskrs::domain::models::sla::SlaStatus]| {
        statuses.iter().map(|s| s.id).collect::<HashSet<_>>()
    };
    assert_eq!(ids(&after), ids(&before));

    let late = after.iter().find(|s| s.sla_id == progress.id).unwrap();
    assert_eq!(late.reached_datetime, Some(at(3, 14, 0)));
    assert_eq!(late.state(at(3, 16, 0)), SlaState::Failed);
    let in_time = after.iter().find(|s| s.sla_id == solved.id).unwrap();
    assert_eq!(in_time.reached_datetime, Some(at(3, 15, 0)));

    assert!(ticket.sla_reached_late);
    assert_eq!(ticket.sla_deadline, None);
}

#[tokio::test]
async fn test_reached_status_dropped_when_policy_stops_matching() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let vip = Uuid::new_v4();
    seed_policy(&ctx, &desk, &desk.progress, 4.0, |p| p.tag_ids = vec![vip]).await;
    let general = seed_policy(&ctx, &desk, &desk.solved, 16.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |t| t.tag_ids = vec![vip]).await;
    let tickets = &ctx.services.tickets;

    ctx.clock.set(at(3, 10, 0));
    tickets.update_ticket(ticket.id, move_to(desk.progress.id)).await.unwrap();
    assert_eq!(ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap().len(), 2);

    ctx.clock.set(at(3, 11, 0));
    let ticket = tickets
        .update_ticket(
            ticket.id,
            TicketChanges {
                tag_ids: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let statuses = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sla_id, general.id);
    assert!(statuses[0].reached_datetime.is_none());
    assert_eq!(ticket.sla_deadline, Some(at(4, 17, 0)));
}

#[tokio::test]
async fn test_apply_without_keep_reached_replaces_every_status() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let progress = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    seed_policy(&ctx, &desk, &desk.solved, 16.0, |_| {}).await;
    let ticket = open_ticket(&ctx, &desk, |_| {}).await;

    ctx.clock.set(at(3, 10, 0));
    let ticket = ctx
        .services
        .tickets
        .update_ticket(ticket.id, move_to(desk.progress.id))
        .await
        .unwrap();
    let before = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();

    let repos = repositories(ctx.db.clone());
    let created = ctx
        .services
        .sla
        .apply(&repos, std::slice::from_ref(&ticket), false, at(3, 11, 0))
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let after = ctx.services.sla.statuses_for_ticket(ticket.id).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().all(|s| before.iter().all(|old| old.id != s.id)));

    // the ticket sits on the target stage, so the fresh status is reached at once
    let renewed = after.iter().find(|s| s.sla_id == progress.id).unwrap();
    assert_eq!(renewed.reached_datetime, Some(at(3, 11, 0)));
}

#[tokio::test]
async fn test_batch_shares_lookup_per_key() {
    let ctx = create_test_context().await;
    let desk = seed_support_desk(&ctx).await;
    let base = seed_policy(&ctx, &desk, &desk.progress, 4.0, |_| {}).await;
    let escalated = seed_policy(&ctx, &desk, &desk.solved, 8.0, |p| {
        p.priority = TicketPriority::High;
    })
    .await;

    let new_ticket = |name: &str, priority| NewTicket {
        name: name.to_string(),
        team_id: Some(desk.team.id),
        priority,
        ..Default::default()
    };
    let created = ctx
        .services
        .tickets
        .create_tickets(vec![
            new_ticket("first", TicketPriority::Low),
            new_ticket("second", TicketPriority::Low),
            new_ticket("loud", TicketPriority::High),
        ])
        .await
        .unwrap();
    assert_eq!(created.len(), 3);

    let repos = repositories(ctx.db.clone());
    let assignments = ctx.services.sla.find_applicable(&repos, &created).await.unwrap();
    assert_eq!(assignments.len(), 2);
    let shared = assignments
        .iter()
        .find(|a| a.key.priority == TicketPriority::Low)
        .unwrap();
    assert_eq!(shared.ticket_ids, vec![created[0].id, created[1].id]);
    assert_eq!(shared.policies.iter().map(|p| p.id).collect::<Vec<_>>(), vec![base.id]);

    let sla = &ctx.services.sla;
    for quiet in &created[..2] {
        let statuses = sla.statuses_for_ticket(quiet.id).await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].sla_id, base.id);
        assert_eq!(statuses[0].deadline, Some(at(3, 13, 0)));
    }
    let loud: HashSet<Uuid> = sla
        .statuses_for_ticket(created[2].id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.sla_id)
        .collect();
    assert_eq!(loud, HashSet::from([base.id, escalated.id]));
}
