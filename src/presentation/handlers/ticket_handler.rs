// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::ticket_request::{
    AssignTicketRequestDto, CloseTicketRequestDto, CreateTicketRequestDto, MergeTicketRequestDto,
    PostMessageRequestDto, TicketSearchQuery, UpdateTicketRequestDto,
};
use crate::application::dto::ticket_response::{
    MergeView, SlaStatusView, TicketDetailView, TicketView,
};
use crate::domain::models::ticket::{MessageAuthor, Ticket, TicketMessage};
use crate::domain::services::sla_service::SlaService;
use crate::domain::services::ticket_service::TicketService;
use crate::presentation::errors::{validate, AppError};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 为一批工单构建视图，SLA 状态一次取回
async fn ticket_views(
    service: &TicketService,
    sla: &SlaService,
    tickets: &[Ticket],
) -> Result<Vec<TicketView>, AppError> {
    let ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();
    let statuses = sla.statuses_for_tickets(&ids).await?;
    let now = service.now();
    let prefix = &service.settings().ticket_number_prefix;

    Ok(tickets
        .iter()
        .map(|t| TicketView::new(t, &statuses, prefix, now))
        .collect())
}

async fn ticket_view(
    service: &TicketService,
    sla: &SlaService,
    ticket: &Ticket,
) -> Result<TicketView, AppError> {
    let mut views = ticket_views(service, sla, std::slice::from_ref(ticket)).await?;
    views
        .pop()
        .ok_or_else(|| AppError::from(anyhow::anyhow!("ticket view missing")))
}

/// 创建工单
pub async fn create_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Json(request): Json<CreateTicketRequestDto>,
) -> Result<(StatusCode, Json<TicketView>), AppError> {
    validate(&request)?;

    let ticket = service.create_ticket(request.into()).await?;
    info!(ticket_id = %ticket.id, "Ticket created via API");
    Ok((StatusCode::CREATED, Json(ticket_view(&service, &sla, &ticket).await?)))
}

/// 工单列表，可按 SLA 失败标记过滤
pub async fn list_tickets(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Query(query): Query<TicketSearchQuery>,
) -> Result<Json<Vec<TicketView>>, AppError> {
    let tickets = match query.sla_failed {
        Some(failed) => service.search_by_sla(failed).await?,
        None => service.list_active().await?,
    };
    Ok(Json(ticket_views(&service, &sla, &tickets).await?))
}

/// 工单详情
pub async fn get_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDetailView>, AppError> {
    let ticket = service.get(id).await?;
    let view = ticket_view(&service, &sla, &ticket).await?;
    let durations = service.durations(&ticket).await?;
    let partner_ticket_count = service.partner_ticket_count(&ticket).await?;
    let messages = service.messages(id).await?;

    Ok(Json(TicketDetailView::new(
        &ticket,
        view,
        durations,
        partner_ticket_count,
        messages,
    )))
}

/// 部分更新工单
pub async fn update_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTicketRequestDto>,
) -> Result<Json<TicketView>, AppError> {
    validate(&request)?;

    let ticket = service.update_ticket(id, request.into()).await?;
    Ok(Json(ticket_view(&service, &sla, &ticket).await?))
}

/// 关闭工单
pub async fn close_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CloseTicketRequestDto>,
) -> Result<Json<TicketView>, AppError> {
    validate(&request)?;

    let ticket = service.close_ticket(id, request.into()).await?;
    Ok(Json(ticket_view(&service, &sla, &ticket).await?))
}

/// 指派处理人
pub async fn assign_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTicketRequestDto>,
) -> Result<Json<TicketView>, AppError> {
    let ticket = service.assign(id, request.user_id).await?;
    Ok(Json(ticket_view(&service, &sla, &ticket).await?))
}

/// 把工单合并到另一张工单
pub async fn merge_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<MergeTicketRequestDto>,
) -> Result<Json<MergeView>, AppError> {
    let merged = service.merge_tickets(id, request.target_id).await?;
    info!(source_id = %id, target_id = %request.target_id, "Ticket merged via API");

    Ok(Json(MergeView {
        source: ticket_view(&service, &sla, &merged.source).await?,
        target: ticket_view(&service, &sla, &merged.target).await?,
    }))
}

/// 工单的 SLA 状态
pub async fn ticket_sla_statuses(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SlaStatusView>>, AppError> {
    let ticket = service.get(id).await?;
    let now = service.now();
    let statuses = sla.statuses_for_ticket(ticket.id).await?;

    Ok(Json(
        statuses.iter().map(|s| SlaStatusView::new(s, now)).collect(),
    ))
}

/// 工单留言
pub async fn list_messages(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TicketMessage>>, AppError> {
    service.get(id).await?;
    Ok(Json(service.messages(id).await?))
}

/// 员工留言
pub async fn post_message(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PostMessageRequestDto>,
) -> Result<(StatusCode, Json<TicketMessage>), AppError> {
    validate(&request)?;

    let message = service
        .post_message(id, MessageAuthor::Staff, request.author_id, &request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
