// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::taxonomy_request::{
    CreateCategoryRequestDto, CreateChildRequestDto, CreateTagRequestDto,
    CreateTicketTypeRequestDto,
};
use crate::domain::models::taxonomy::{Category, Problem, SubCategory, Tag, TicketType};
use crate::domain::services::taxonomy_service::TaxonomyService;
use crate::presentation::errors::{validate, AppError};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_tag(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Json(request): Json<CreateTagRequestDto>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    validate(&request)?;
    Ok((StatusCode::CREATED, Json(service.create_tag(&request.name).await?)))
}

pub async fn list_tags(
    Extension(service): Extension<Arc<TaxonomyService>>,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(service.list_tags().await?))
}

pub async fn create_ticket_type(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Json(request): Json<CreateTicketTypeRequestDto>,
) -> Result<(StatusCode, Json<TicketType>), AppError> {
    validate(&request)?;
    let ticket_type = service
        .create_ticket_type(&request.name, request.sequence)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket_type)))
}

pub async fn create_category(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Json(request): Json<CreateCategoryRequestDto>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    validate(&request)?;
    let category = service.create_category(&request.name, request.color).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// 在分类下创建子分类
pub async fn create_sub_category(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Json(request): Json<CreateChildRequestDto>,
) -> Result<(StatusCode, Json<SubCategory>), AppError> {
    validate(&request)?;
    let sub_category = service
        .create_sub_category(&request.name, request.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(sub_category)))
}

pub async fn list_sub_categories(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<SubCategory>>, AppError> {
    Ok(Json(service.sub_categories(category_id).await?))
}

/// 在子分类下创建问题
pub async fn create_problem(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Json(request): Json<CreateChildRequestDto>,
) -> Result<(StatusCode, Json<Problem>), AppError> {
    validate(&request)?;
    let problem = service
        .create_problem(&request.name, request.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

pub async fn list_problems(
    Extension(service): Extension<Arc<TaxonomyService>>,
    Path(sub_category_id): Path<Uuid>,
) -> Result<Json<Vec<Problem>>, AppError> {
    Ok(Json(service.problems(sub_category_id).await?))
}
