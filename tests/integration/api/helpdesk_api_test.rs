// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{at, create_test_context, TestContext};
use axum::http::StatusCode;
use axum_test::TestServer;
use helpdeskrs::presentation::routes;
use serde_json::{json, Value};

pub(crate) struct ApiDesk {
    pub server: TestServer,
    pub ctx: TestContext,
    pub team_id: String,
    pub stage_ids: Vec<String>,
}

/// 通过 HTTP 接口搭建团队：日历、三个阶段、团队和一条 4 小时策略
pub(crate) async fn create_api_desk() -> ApiDesk {
    let ctx = create_test_context().await;
    let server = TestServer::new(routes::app(ctx.services.clone())).unwrap();

    let attendances: Vec<Value> = ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| json!({"weekday": d, "hour_from": 9.0, "hour_to": 17.0}))
        .collect();
    let calendar: Value = server
        .post("/v1/calendars")
        .json(&json!({
            "name": "Office",
            "attendances": attendances,
        }))
        .await
        .json();

    let mut stage_ids = Vec::new();
    for (name, sequence, is_close) in [("New", 1, false), ("In Progress", 2, false), ("Solved", 3, true)] {
        let stage: Value = server
            .post("/v1/stages")
            .json(&json!({"name": name, "sequence": sequence, "is_close": is_close}))
            .await
            .json();
        stage_ids.push(stage["id"].as_str().unwrap().to_string());
    }

    let response = server
        .post("/v1/teams")
        .json(&json!({
            "name": "Support",
            "calendar_id": calendar["id"],
            "stage_ids": stage_ids,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let team: Value = response.json();
    let team_id = team["id"].as_str().unwrap().to_string();

    server
        .post("/v1/sla/policies")
        .json(&json!({
            "name": "First answer",
            "team_id": team_id,
            "stage_id": stage_ids[1],
            "time_hours": 4.0
        }))
        .await
        .assert_status(StatusCode::CREATED);

    ApiDesk {
        server,
        ctx,
        team_id,
        stage_ids,
    }
}

pub(crate) async fn create_api_ticket(desk: &ApiDesk) -> Value {
    let response = desk
        .server
        .post("/v1/tickets")
        .json(&json!({
            "name": "VPN keeps dropping",
            "team_id": desk.team_id,
            "partner_name": "Jane",
            "partner_email": "jane@example.com",
            "priority": "high"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = create_test_context().await;
    let server = TestServer::new(routes::app(ctx.services.clone())).unwrap();
    server.get("/health").await.assert_text("OK");
    server
        .get("/v1/version")
        .await
        .assert_text(env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_ticket_flow_over_http() {
    let desk = create_api_desk().await;
    let ticket = create_api_ticket(&desk).await;
    let id = ticket["id"].as_str().unwrap();

    assert_eq!(ticket["reference"], "TN1-20250303");
    assert_eq!(ticket["stage_id"], desk.stage_ids[0]);
    assert_eq!(ticket["partner_email"], "jane@example.com");
    assert_eq!(ticket["sla_deadline"], json!(at(3, 13, 0)));
    assert_eq!(ticket["sla_statuses"][0]["state"], "ongoing");

    desk.ctx.clock.set(at(3, 11, 0));
    let updated: Value = desk
        .server
        .patch(&format!("/v1/tickets/{}", id))
        .json(&json!({"stage_id": desk.stage_ids[1]}))
        .await
        .json();
    assert_eq!(updated["sla_statuses"][0]["state"], "reached");
    assert_eq!(updated["sla_statuses"][0]["color"], 10);
    assert_eq!(updated["sla_success"], false);

    let statuses: Value = desk
        .server
        .get(&format!("/v1/tickets/{}/sla", id))
        .await
        .json();
    assert_eq!(statuses.as_array().unwrap().len(), 1);

    let reached: Value = desk
        .server
        .get("/v1/sla/statuses")
        .add_query_param("states", "reached")
        .await
        .json();
    assert_eq!(reached.as_array().unwrap().len(), 1);

    let closed: Value = desk
        .server
        .post(&format!("/v1/tickets/{}/close", id))
        .json(&json!({"comment": "<p>Router replaced</p>"}))
        .await
        .json();
    assert_eq!(closed["stage_id"], desk.stage_ids[2]);
    assert_eq!(closed["close_comment"], "Router replaced");

    let detail: Value = desk
        .server
        .get(&format!("/v1/tickets/{}", id))
        .await
        .json();
    let close_hours = detail["durations"]["close_hours"].as_f64().unwrap();
    assert!((close_hours - 2.0).abs() < 1e-6);
    assert_eq!(detail["partner_ticket_count"], 0);
    assert_eq!(detail["suggested_recipients"][0]["reason"], "Customer");
}

#[tokio::test]
async fn test_merge_over_http() {
    let desk = create_api_desk().await;
    let source = create_api_ticket(&desk).await;
    let target: Value = desk
        .server
        .post("/v1/tickets")
        .json(&json!({
            "name": "VPN down for the whole floor",
            "team_id": desk.team_id,
            "partner_email": "Bob <bob@example.com>"
        }))
        .await
        .json();
    let source_id = source["id"].as_str().unwrap();
    let target_id = target["id"].as_str().unwrap();

    let response = desk
        .server
        .post(&format!("/v1/tickets/{}/merge", source_id))
        .json(&json!({"target_id": target_id}))
        .await;
    response.assert_status_ok();
    let merged: Value = response.json();
    assert_eq!(merged["source"]["stage_id"], desk.stage_ids[2]);
    assert_eq!(merged["source"]["merged_into_id"], target_id);
    assert_eq!(merged["source"]["locked"], true);
    assert_eq!(merged["target"]["follower_ids"][0], source["partner_id"]);

    let messages: Value = desk
        .server
        .get(&format!("/v1/tickets/{}/messages", target_id))
        .await
        .json();
    assert_eq!(
        messages[0]["body"],
        "Ticket TN1-20250303 was merged into TN2-20250303"
    );

    desk.server
        .patch(&format!("/v1/tickets/{}", source_id))
        .json(&json!({"stage_id": desk.stage_ids[0]}))
        .await
        .assert_status(StatusCode::CONFLICT);
    desk.server
        .post(&format!("/v1/tickets/{}/merge", target_id))
        .json(&json!({"target_id": target_id}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_filter_lists_overdue_tickets() {
    let desk = create_api_desk().await;
    let ticket = create_api_ticket(&desk).await;

    let failed: Value = desk
        .server
        .get("/v1/tickets")
        .add_query_param("sla_failed", "true")
        .await
        .json();
    assert!(failed.as_array().unwrap().is_empty());

    desk.ctx.clock.set(at(3, 16, 0));
    let failed: Value = desk
        .server
        .get("/v1/tickets")
        .add_query_param("sla_failed", "true")
        .await
        .json();
    assert_eq!(failed[0]["id"], ticket["id"]);
    assert_eq!(failed[0]["sla_fail"], true);

    let all: Value = desk.server.get("/v1/tickets").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_error_statuses() {
    let desk = create_api_desk().await;

    // validator rejects an empty subject
    desk.server
        .post("/v1/tickets")
        .json(&json!({"name": ""}))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    desk.server
        .get(&format!("/v1/tickets/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    desk.server
        .get("/v1/sla/statuses")
        .add_query_param("states", "late")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    desk.server
        .post("/v1/tags")
        .json(&json!({"name": "vpn"}))
        .await
        .assert_status(StatusCode::CREATED);
    let duplicate = desk
        .server
        .post("/v1/tags")
        .json(&json!({"name": "vpn"}))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = duplicate.json();
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_taxonomy_endpoints() {
    let desk = create_api_desk().await;
    let category: Value = desk
        .server
        .post("/v1/categories")
        .json(&json!({"name": "Network"}))
        .await
        .json();
    let sub: Value = desk
        .server
        .post("/v1/sub-categories")
        .json(&json!({"name": "VPN", "parent_id": category["id"]}))
        .await
        .json();
    desk.server
        .post("/v1/problems")
        .json(&json!({"name": "Disconnects", "parent_id": sub["id"]}))
        .await
        .assert_status(StatusCode::CREATED);

    let subs: Value = desk
        .server
        .get(&format!("/v1/categories/{}/sub-categories", category["id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(subs[0]["name"], "VPN");
    let problems: Value = desk
        .server
        .get(&format!("/v1/sub-categories/{}/problems", sub["id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(problems[0]["name"], "Disconnects");

    let stages: Value = desk
        .server
        .get(&format!("/v1/teams/{}/stages", desk.team_id))
        .await
        .json();
    assert_eq!(stages.as_array().unwrap().len(), 3);
}
