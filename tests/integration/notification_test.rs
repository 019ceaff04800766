// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, create_test_db, seed_support_desk, FixedClock, TestContext};
use helpdeskrs::config::settings::{HelpdeskSettings, SlaSettings};
use helpdeskrs::domain::models::ticket::NewTicket;
use helpdeskrs::domain::services::notification_service::{NotificationService, PushNotification};
use helpdeskrs::infrastructure::services::push_notification_service_impl::{
    PushNotificationServiceImpl, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use helpdeskrs::presentation::routes::AppServices;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier(server: &MockServer) -> PushNotificationServiceImpl {
    PushNotificationServiceImpl::new(
        format!("{}/push", server.uri()),
        "test-secret".to_string(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_push_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(header_exists(SIGNATURE_HEADER))
        .and(header_exists(TIMESTAMP_HEADER))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notification = PushNotification {
        user_id: Uuid::new_v4(),
        ticket_id: Uuid::new_v4(),
        title: "New ticket assigned".to_string(),
        body: "Printer on fire".to_string(),
    };
    notifier(&server).send(&notification).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["user_id"], notification.user_id.to_string());
    assert_eq!(body["title"], "New ticket assigned");
}

#[tokio::test]
async fn test_gateway_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let notification = PushNotification {
        user_id: Uuid::new_v4(),
        ticket_id: Uuid::new_v4(),
        title: "t".to_string(),
        body: "b".to_string(),
    };
    assert!(notifier(&server).send(&notification).await.is_err());
}

/// 自动指派的处理人会收到推送，网关故障不影响建单
#[tokio::test]
async fn test_assignee_notified_on_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let db = create_test_db().await;
    let clock = Arc::new(FixedClock::new(at(3, 9, 0)));
    let push: Arc<dyn NotificationService> = Arc::new(notifier(&server));
    let ctx = TestContext {
        db: db.clone(),
        clock: clock.clone(),
        services: AppServices::new(
            db,
            clock,
            SlaSettings::default(),
            HelpdeskSettings::default(),
            Some(push),
        ),
    };
    let desk = seed_support_desk(&ctx).await;

    let ticket = ctx
        .services
        .tickets
        .create_ticket(NewTicket {
            name: "Printer on fire".into(),
            team_id: Some(desk.team.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ticket.user_id, Some(desk.agent));

    // delivery runs in the background
    for _ in 0..50 {
        if !server.received_requests().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["user_id"], desk.agent.to_string());
    assert_eq!(body["ticket_id"], ticket.id.to_string());
}
