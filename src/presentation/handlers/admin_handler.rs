// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 团队、阶段、工作日历和客户的管理接口

use crate::application::dto::admin_request::{
    CreateCalendarRequestDto, CreatePartnerRequestDto, CreateStageRequestDto,
    CreateTeamRequestDto,
};
use crate::domain::models::calendar::ResourceCalendar;
use crate::domain::models::partner::Partner;
use crate::domain::models::team::{Stage, Team};
use crate::domain::services::team_service::TeamService;
use crate::domain::services::ticket_service::TicketService;
use crate::presentation::errors::{validate, AppError};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_team(
    Extension(service): Extension<Arc<TeamService>>,
    Json(request): Json<CreateTeamRequestDto>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    validate(&request)?;
    Ok((StatusCode::CREATED, Json(service.create_team(request.into()).await?)))
}

pub async fn get_team(
    Extension(service): Extension<Arc<TeamService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Team>, AppError> {
    Ok(Json(service.find_team(id).await?))
}

/// 团队可用的阶段
pub async fn list_team_stages(
    Extension(service): Extension<Arc<TeamService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Stage>>, AppError> {
    service.find_team(id).await?;
    Ok(Json(service.stages(id).await?))
}

pub async fn create_stage(
    Extension(service): Extension<Arc<TeamService>>,
    Json(request): Json<CreateStageRequestDto>,
) -> Result<(StatusCode, Json<Stage>), AppError> {
    validate(&request)?;
    let stage = service
        .create_stage(request.to_stage(), &request.team_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

pub async fn create_calendar(
    Extension(service): Extension<Arc<TeamService>>,
    Json(request): Json<CreateCalendarRequestDto>,
) -> Result<(StatusCode, Json<ResourceCalendar>), AppError> {
    validate(&request)?;
    let calendar = service.create_calendar(request.into()).await?;
    Ok((StatusCode::CREATED, Json(calendar)))
}

pub async fn create_partner(
    Extension(service): Extension<Arc<TicketService>>,
    Json(request): Json<CreatePartnerRequestDto>,
) -> Result<(StatusCode, Json<Partner>), AppError> {
    validate(&request)?;
    let partner = service.register_partner(request.into()).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}
