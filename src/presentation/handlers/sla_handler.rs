// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::sla_request::{CreateSlaPolicyRequestDto, SlaStatusSearchQuery};
use crate::application::dto::ticket_response::SlaStatusView;
use crate::domain::models::sla::SlaPolicy;
use crate::domain::services::sla_service::SlaService;
use crate::domain::services::ticket_service::TicketService;
use crate::presentation::errors::{validate, AppError};
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

/// 创建 SLA 策略
pub async fn create_policy(
    Extension(sla): Extension<Arc<SlaService>>,
    Json(request): Json<CreateSlaPolicyRequestDto>,
) -> Result<(StatusCode, Json<SlaPolicy>), AppError> {
    validate(&request)?;

    let policy = sla.create_policy(request.into()).await?;
    info!(sla_id = %policy.id, team_id = %policy.team_id, "SLA policy created");
    Ok((StatusCode::CREATED, Json(policy)))
}

/// 按派生状态搜索 SLA 状态
///
/// `states` 为逗号分隔的列表，`negate=true` 时取补集。
pub async fn search_statuses(
    Extension(service): Extension<Arc<TicketService>>,
    Extension(sla): Extension<Arc<SlaService>>,
    Query(query): Query<SlaStatusSearchQuery>,
) -> Result<Json<Vec<SlaStatusView>>, AppError> {
    let states = query.parse_states().map_err(AppError::bad_request)?;
    let now = service.now();
    let statuses = sla.search_statuses(&states, query.negate, now).await?;

    Ok(Json(
        statuses.iter().map(|s| SlaStatusView::new(s, now)).collect(),
    ))
}
