// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::double_option;
use crate::domain::models::ticket::{KanbanState, NewTicket, TicketChanges, TicketPriority};
use crate::domain::services::ticket_service::CloseTicket;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 创建工单请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTicketRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    #[validate(length(max = 255))]
    pub partner_name: Option<String>,
    #[validate(email)]
    pub partner_email: Option<String>,
    #[validate(length(max = 64))]
    pub partner_phone: Option<String>,
    pub ticket_type_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub priority: TicketPriority,
    pub stage_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
}

impl From<CreateTicketRequestDto> for NewTicket {
    fn from(dto: CreateTicketRequestDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            team_id: dto.team_id,
            user_id: dto.user_id,
            partner_id: dto.partner_id,
            partner_name: dto.partner_name,
            partner_email: dto.partner_email,
            partner_phone: dto.partner_phone,
            ticket_type_id: dto.ticket_type_id,
            tag_ids: dto.tag_ids,
            priority: dto.priority,
            stage_id: dto.stage_id,
            category_id: dto.category_id,
            sub_category_id: dto.sub_category_id,
            problem_id: dto.problem_id,
        }
    }
}

/// 更新工单请求
///
/// 可清空字段：缺失表示不修改，`null` 表示清空。
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTicketRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub team_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub partner_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ticket_type_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub priority: Option<TicketPriority>,
    pub stage_id: Option<Uuid>,
    pub kanban_state: Option<KanbanState>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sub_category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub problem_id: Option<Option<Uuid>>,
}

impl From<UpdateTicketRequestDto> for TicketChanges {
    fn from(dto: UpdateTicketRequestDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            team_id: dto.team_id,
            user_id: dto.user_id,
            partner_id: dto.partner_id,
            ticket_type_id: dto.ticket_type_id,
            tag_ids: dto.tag_ids,
            priority: dto.priority,
            stage_id: dto.stage_id,
            kanban_state: dto.kanban_state,
            category_id: dto.category_id,
            sub_category_id: dto.sub_category_id,
            problem_id: dto.problem_id,
            ..Default::default()
        }
    }
}

/// 关闭工单请求
#[derive(Debug, Deserialize, Validate)]
pub struct CloseTicketRequestDto {
    /// 关闭说明，允许 HTML
    #[validate(length(min = 1))]
    pub comment: String,
    #[validate(length(max = 64))]
    pub cm_form: Option<String>,
    pub closed_by: Option<Uuid>,
}

impl From<CloseTicketRequestDto> for CloseTicket {
    fn from(dto: CloseTicketRequestDto) -> Self {
        Self {
            comment: dto.comment,
            cm_form: dto.cm_form,
            closed_by: dto.closed_by,
            by_partner: false,
        }
    }
}

/// 指派请求
#[derive(Debug, Deserialize)]
pub struct AssignTicketRequestDto {
    pub user_id: Uuid,
}

/// 合并请求：把路径中的工单合并到 `target_id`
#[derive(Debug, Deserialize)]
pub struct MergeTicketRequestDto {
    pub target_id: Uuid,
}

/// 留言请求
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequestDto {
    #[validate(length(min = 1, max = 20000))]
    pub body: String,
    pub author_id: Option<Uuid>,
}

/// 评分请求
#[derive(Debug, Deserialize, Validate)]
pub struct RateTicketRequestDto {
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

/// 工单列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct TicketSearchQuery {
    /// `true` 只返回 SLA 失败的工单，`false` 只返回未失败的
    pub sla_failed: Option<bool>,
}

/// 门户访问参数
#[derive(Debug, Deserialize)]
pub struct AccessTokenQuery {
    pub access_token: String,
}
