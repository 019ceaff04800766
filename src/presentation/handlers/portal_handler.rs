// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 客户门户接口
//!
//! 所有请求都以工单的访问令牌鉴权，令牌与路径中的工单不符时返回 403。

use crate::application::dto::ticket_request::{
    AccessTokenQuery, CloseTicketRequestDto, PostMessageRequestDto, RateTicketRequestDto,
};
use crate::application::dto::ticket_response::PortalTicketView;
use crate::domain::models::ticket::{DomainError, MessageAuthor, Ticket, TicketMessage};
use crate::domain::services::ticket_service::{CloseTicket, TicketService};
use crate::presentation::errors::{validate, AppError};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

async fn authorize(
    service: &TicketService,
    id: Uuid,
    query: &AccessTokenQuery,
) -> Result<Ticket, AppError> {
    let ticket = service.find_by_access_token(&query.access_token).await?;
    if ticket.id != id {
        return Err(DomainError::AccessDenied.into());
    }
    Ok(ticket)
}

async fn portal_view(service: &TicketService, ticket: &Ticket) -> Result<PortalTicketView, AppError> {
    let messages = service.messages(ticket.id).await?;
    Ok(PortalTicketView::new(
        ticket,
        &service.settings().ticket_number_prefix,
        messages,
    ))
}

pub async fn get_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AccessTokenQuery>,
) -> Result<Json<PortalTicketView>, AppError> {
    let ticket = authorize(&service, id, &query).await?;
    Ok(Json(portal_view(&service, &ticket).await?))
}

/// 客户留言
pub async fn post_message(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AccessTokenQuery>,
    Json(request): Json<PostMessageRequestDto>,
) -> Result<(StatusCode, Json<TicketMessage>), AppError> {
    validate(&request)?;
    let ticket = authorize(&service, id, &query).await?;

    let message = service
        .post_message(ticket.id, MessageAuthor::Customer, ticket.partner_id, &request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// 客户评分
pub async fn rate_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AccessTokenQuery>,
    Json(request): Json<RateTicketRequestDto>,
) -> Result<Json<PortalTicketView>, AppError> {
    validate(&request)?;
    let ticket = authorize(&service, id, &query).await?;

    let ticket = service
        .rate(ticket.id, request.rating, request.feedback)
        .await?;
    Ok(Json(portal_view(&service, &ticket).await?))
}

/// 客户关闭工单
pub async fn close_ticket(
    Extension(service): Extension<Arc<TicketService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AccessTokenQuery>,
    Json(request): Json<CloseTicketRequestDto>,
) -> Result<Json<PortalTicketView>, AppError> {
    validate(&request)?;
    let ticket = authorize(&service, id, &query).await?;

    let ticket = service
        .close_ticket(
            ticket.id,
            CloseTicket {
                comment: request.comment,
                cm_form: request.cm_form,
                closed_by: ticket.partner_id,
                by_partner: true,
            },
        )
        .await?;
    Ok(Json(portal_view(&service, &ticket).await?))
}
