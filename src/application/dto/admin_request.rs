// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::calendar::{Attendance, Leave, ResourceCalendar};
use crate::domain::models::partner::Partner;
use crate::domain::models::team::{AssignMethod, Stage, Team};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

fn default_true() -> bool {
    true
}

/// 创建团队请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default = "default_true")]
    pub use_sla: bool,
    pub calendar_id: Option<Uuid>,
    #[serde(default)]
    pub assign_method: AssignMethod,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub stage_ids: Vec<Uuid>,
}

impl From<CreateTeamRequestDto> for Team {
    fn from(dto: CreateTeamRequestDto) -> Self {
        let mut team = Team::new(dto.name);
        team.use_sla = dto.use_sla;
        team.calendar_id = dto.calendar_id;
        team.assign_method = dto.assign_method;
        team.member_ids = dto.member_ids;
        team.stage_ids = dto.stage_ids;
        team
    }
}

/// 创建阶段请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStageRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub sequence: i32,
    #[serde(default)]
    pub is_close: bool,
    #[serde(default)]
    pub fold: bool,
    /// 使用该阶段的团队
    #[serde(default)]
    pub team_ids: Vec<Uuid>,
}

impl CreateStageRequestDto {
    pub fn to_stage(&self) -> Stage {
        let mut stage = Stage::new(self.name.clone(), self.sequence);
        stage.is_close = self.is_close;
        stage.fold = self.fold || self.is_close;
        stage
    }
}

/// 创建工作日历请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCalendarRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, max = 24.0))]
    pub hours_per_day: Option<f64>,
    #[serde(default)]
    pub attendances: Vec<Attendance>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
}

impl From<CreateCalendarRequestDto> for ResourceCalendar {
    fn from(dto: CreateCalendarRequestDto) -> Self {
        let mut calendar = ResourceCalendar::new(dto.name);
        calendar.hours_per_day = dto.hours_per_day;
        calendar.attendances = dto.attendances;
        calendar.leaves = dto.leaves;
        calendar
    }
}

/// 登记客户请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartnerRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl From<CreatePartnerRequestDto> for Partner {
    fn from(dto: CreatePartnerRequestDto) -> Self {
        let mut partner = Partner::new(dto.name);
        partner.email = dto.email;
        partner.phone = dto.phone;
        partner.parent_id = dto.parent_id;
        partner
    }
}
