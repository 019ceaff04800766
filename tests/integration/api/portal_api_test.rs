// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpdesk_api_test::{create_api_desk, create_api_ticket};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_portal_requires_matching_token() {
    let desk = create_api_desk().await;
    let ticket = create_api_ticket(&desk).await;
    let other = create_api_ticket(&desk).await;
    let id = ticket["id"].as_str().unwrap();
    let token = desk
        .ctx
        .services
        .tickets
        .get(id.parse().unwrap())
        .await
        .unwrap()
        .access_token;

    let view: Value = desk
        .server
        .get(&format!("/v1/portal/tickets/{}", id))
        .add_query_param("access_token", &token)
        .await
        .json();
    assert_eq!(view["reference"], ticket["reference"]);

    desk.server
        .get(&format!("/v1/portal/tickets/{}", id))
        .add_query_param("access_token", "forged")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // a valid token for another ticket
    desk.server
        .get(&format!("/v1/portal/tickets/{}", other["id"].as_str().unwrap()))
        .add_query_param("access_token", &token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_messages_rates_and_closes() {
    let desk = create_api_desk().await;
    let ticket = create_api_ticket(&desk).await;
    let id = ticket["id"].as_str().unwrap();
    let token = desk
        .ctx
        .services
        .tickets
        .get(id.parse().unwrap())
        .await
        .unwrap()
        .access_token;

    let message: Value = desk
        .server
        .post(&format!("/v1/portal/tickets/{}/messages", id))
        .add_query_param("access_token", &token)
        .json(&json!({"body": "Still dropping every hour"}))
        .await
        .json();
    assert_eq!(message["author"], "customer");
    assert_eq!(message["author_id"], ticket["partner_id"]);

    desk.server
        .post(&format!("/v1/portal/tickets/{}/rating", id))
        .add_query_param("access_token", &token)
        .json(&json!({"rating": 9}))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let rated: Value = desk
        .server
        .post(&format!("/v1/portal/tickets/{}/rating", id))
        .add_query_param("access_token", &token)
        .json(&json!({"rating": 4, "feedback": "ok"}))
        .await
        .json();
    assert_eq!(rated["rating"], 4);
    assert_eq!(rated["messages"].as_array().unwrap().len(), 1);

    let closed: Value = desk
        .server
        .post(&format!("/v1/portal/tickets/{}/close", id))
        .add_query_param("access_token", &token)
        .json(&json!({"comment": "Works now"}))
        .await
        .json();
    assert!(closed["close_date"].is_string());

    let stored = desk
        .ctx
        .services
        .tickets
        .get(id.parse().unwrap())
        .await
        .unwrap();
    assert!(stored.closed_by_partner);
    assert_eq!(stored.closed_by_id, stored.partner_id);
}
