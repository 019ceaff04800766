// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sla::{SlaPolicy, SlaState};
use crate::domain::models::ticket::TicketPriority;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// 创建 SLA 策略请求
///
/// 目标阶段序号由服务从阶段读取，不由调用方提供。
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlaPolicyRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub team_id: Uuid,
    #[serde(default)]
    pub priority: TicketPriority,
    pub ticket_type_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub stage_id: Uuid,
    #[validate(range(min = 0.0))]
    pub time_hours: f64,
    #[serde(default)]
    pub exclude_stage_ids: Vec<Uuid>,
    #[serde(default)]
    pub partner_ids: Vec<Uuid>,
}

impl From<CreateSlaPolicyRequestDto> for SlaPolicy {
    fn from(dto: CreateSlaPolicyRequestDto) -> Self {
        let mut policy = SlaPolicy::new(dto.name, dto.team_id, dto.stage_id, 0, dto.time_hours);
        policy.priority = dto.priority;
        policy.ticket_type_id = dto.ticket_type_id;
        policy.tag_ids = dto.tag_ids;
        policy.exclude_stage_ids = dto.exclude_stage_ids;
        policy.partner_ids = dto.partner_ids;
        policy
    }
}

/// SLA 状态搜索参数
#[derive(Debug, Default, Deserialize)]
pub struct SlaStatusSearchQuery {
    /// 逗号分隔的状态列表，如 `failed,ongoing`
    pub states: Option<String>,
    /// 为真时返回不在列表中的状态
    #[serde(default)]
    pub negate: bool,
}

impl SlaStatusSearchQuery {
    /// 解析状态列表，未指定时为全部状态
    pub fn parse_states(&self) -> Result<Vec<SlaState>, String> {
        match &self.states {
            None => Ok(vec![SlaState::Ongoing, SlaState::Reached, SlaState::Failed]),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<SlaState>().map_err(|_| format!("unknown SLA state '{}'", s)))
                .collect(),
        }
    }
}
