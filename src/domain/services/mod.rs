// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::DomainError;
use crate::domain::repositories::ticket_repository::RepositoryError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 领域服务模块
///
/// 该模块包含帮助台的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - SLA 规则（sla_engine）：截止时间、状态和汇总值的纯函数
/// - SLA 服务（sla_service）：策略匹配、状态生成、达成标记和重算
/// - 工单服务（ticket_service）：工单创建、更新、关闭、留言和评分
/// - 团队服务（team_service）：团队、阶段和工作日历的维护
/// - 分类服务（taxonomy_service）：标签、类型和三级分类的校验与创建
/// - 通知服务（notification_service）：推送通知接口与异步派发
pub mod notification_service;
pub mod sla_engine;
pub mod sla_service;
pub mod taxonomy_service;
pub mod team_service;
pub mod ticket_service;

/// 服务错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(String),
}

/// 时间来源
///
/// 服务通过它获取“当前时间”，测试中可以替换为固定时钟。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
