// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::{Validate, ValidationErrors};

use crate::domain::models::ticket::DomainError;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::domain::services::ServiceError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 请求参数错误
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<ValidationErrors>().is_some() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        if let Some(e) = self.0.downcast_ref::<ServiceError>() {
            return match e {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Domain(d) => domain_status(d),
                ServiceError::Repository(r) => repository_status(r),
            };
        }
        if let Some(d) = self.0.downcast_ref::<DomainError>() {
            return domain_status(d);
        }
        if let Some(r) = self.0.downcast_ref::<RepositoryError>() {
            return repository_status(r);
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidTransition(_) => StatusCode::CONFLICT,
        DomainError::AccessDenied => StatusCode::FORBIDDEN,
    }
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// 校验请求体
pub fn validate<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(AppError::from)
}
