// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{at, create_test_db};
use helpdeskrs::domain::models::sla::{SlaPolicy, SlaState, SlaStatus};
use helpdeskrs::domain::repositories::sla_repository::{SlaPolicyRepository, SlaStatusRepository};
use helpdeskrs::infrastructure::repositories::sla_repo_impl::{
    SlaPolicyRepositoryImpl, SlaStatusRepositoryImpl,
};
use uuid::Uuid;

fn status(
    ticket_id: Uuid,
    policy: &SlaPolicy,
    deadline: Option<chrono::DateTime<chrono::Utc>>,
    reached: Option<chrono::DateTime<chrono::Utc>>,
) -> SlaStatus {
    let mut status = SlaStatus::new(ticket_id, policy, reached);
    status.deadline = deadline;
    status
}

#[tokio::test]
async fn test_mark_reached_keeps_first_timestamp() {
    let db = create_test_db().await;
    let repo = SlaStatusRepositoryImpl::new(db);
    let policy = SlaPolicy::new("4h", Uuid::new_v4(), Uuid::new_v4(), 1, 4.0);
    let other = SlaPolicy::new("8h", Uuid::new_v4(), Uuid::new_v4(), 2, 8.0);
    let ticket = Uuid::new_v4();

    repo.create_many(&[
        status(ticket, &policy, Some(at(3, 13, 0)), None),
        status(ticket, &other, Some(at(3, 17, 0)), None),
    ])
    .await
    .unwrap();

    let marked = repo
        .mark_reached(&[ticket], &[policy.stage_id], at(3, 10, 0))
        .await
        .unwrap();
    assert_eq!(marked, 1);
    let again = repo
        .mark_reached(&[ticket], &[policy.stage_id, other.stage_id], at(3, 11, 0))
        .await
        .unwrap();
    assert_eq!(again, 1);

    let stored = repo.find_by_tickets(&[ticket]).await.unwrap();
    let reached_at = |sla_id| {
        stored
            .iter()
            .find(|s| s.sla_id == sla_id)
            .and_then(|s| s.reached_datetime)
    };
    assert_eq!(reached_at(policy.id), Some(at(3, 10, 0)));
    assert_eq!(reached_at(other.id), Some(at(3, 11, 0)));
}

#[tokio::test]
async fn test_count_late_by_ticket() {
    let db = create_test_db().await;
    let repo = SlaStatusRepositoryImpl::new(db);
    let policy = SlaPolicy::new("4h", Uuid::new_v4(), Uuid::new_v4(), 1, 4.0);
    let (late_reach, overdue, on_time, frozen) =
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    repo.create_many(&[
        status(late_reach, &policy, Some(at(3, 13, 0)), Some(at(3, 14, 0))),
        status(overdue, &policy, Some(at(3, 13, 0)), None),
        status(overdue, &policy, Some(at(3, 12, 0)), None),
        status(on_time, &policy, Some(at(3, 13, 0)), Some(at(3, 12, 0))),
        status(frozen, &policy, None, None),
    ])
    .await
    .unwrap();

    let late = repo
        .count_late_by_ticket(&[late_reach, overdue, on_time, frozen], at(3, 15, 0))
        .await
        .unwrap();
    assert_eq!(late.get(&late_reach), Some(&1));
    assert_eq!(late.get(&overdue), Some(&2));
    assert_eq!(late.get(&on_time), None);
    assert_eq!(late.get(&frozen), None);
}

#[tokio::test]
async fn test_search_by_state_matches_in_memory_state() {
    let db = create_test_db().await;
    let repo = SlaStatusRepositoryImpl::new(db);
    let policy = SlaPolicy::new("4h", Uuid::new_v4(), Uuid::new_v4(), 1, 4.0);
    let ticket = Uuid::new_v4();
    let now = at(3, 15, 0);

    let rows = vec![
        status(ticket, &policy, Some(at(3, 13, 0)), Some(at(3, 12, 0))),
        status(ticket, &policy, Some(at(3, 13, 0)), Some(at(3, 13, 0))),
        status(ticket, &policy, Some(at(3, 14, 0)), None),
        status(ticket, &policy, Some(at(3, 16, 0)), None),
        status(ticket, &policy, None, None),
        status(ticket, &policy, None, Some(at(3, 12, 0))),
    ];
    repo.create_many(&rows).await.unwrap();

    for state in [SlaState::Ongoing, SlaState::Reached, SlaState::Failed] {
        for negate in [false, true] {
            let predicate = SlaState::search_predicate(&[state], negate, now);
            let mut found: Vec<Uuid> = repo
                .search(&predicate)
                .await
                .unwrap()
                .into_iter()
                .map(|s| s.id)
                .collect();
            let mut expected: Vec<Uuid> = rows
                .iter()
                .filter(|s| (s.state(now) == state) != negate)
                .map(|s| s.id)
                .collect();
            found.sort();
            expected.sort();
            assert_eq!(found, expected, "state {:?} negate {}", state, negate);
        }
    }
}

#[tokio::test]
async fn test_policy_round_trip_keeps_lists() {
    let db = create_test_db().await;
    let repo = SlaPolicyRepositoryImpl::new(db);
    let mut policy = SlaPolicy::new("VIP", Uuid::new_v4(), Uuid::new_v4(), 3, 2.5);
    policy.tag_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    policy.partner_ids = vec![Uuid::new_v4()];
    policy.exclude_stage_ids = vec![Uuid::new_v4()];

    repo.create(&policy).await.unwrap();
    let loaded = repo.find_by_id(policy.id).await.unwrap().unwrap();
    assert_eq!(loaded, policy);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}
