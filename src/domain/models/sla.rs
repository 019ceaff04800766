// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket::{DomainError, Ticket, TicketPriority};
use crate::domain::query::{Operator, Predicate, Record, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// SLA 策略
///
/// 规定某团队的工单在给定时间预算内到达目标阶段。
/// 策略按团队、优先级、工单类型、标签和客户筛选适用的工单。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub id: Uuid,
    pub name: String,
    pub team_id: Uuid,
    /// 最低适用优先级
    pub priority: TicketPriority,
    /// 限定的工单类型，未设置时适用于所有类型
    pub ticket_type_id: Option<Uuid>,
    /// 工单必须同时带有的标签
    pub tag_ids: Vec<Uuid>,
    /// 目标阶段
    pub stage_id: Uuid,
    /// 目标阶段的序号，冗余存储以便在查询中比较
    pub stage_sequence: i32,
    /// 时间预算（工作小时）
    pub time_hours: f64,
    /// 冻结阶段：工单停留其间的时间不计入预算
    pub exclude_stage_ids: Vec<Uuid>,
    /// 限定的客户，未设置时适用于所有客户
    pub partner_ids: Vec<Uuid>,
    pub active: bool,
}

impl SlaPolicy {
    pub fn new(
        name: impl Into<String>,
        team_id: Uuid,
        stage_id: Uuid,
        stage_sequence: i32,
        time_hours: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_id,
            priority: TicketPriority::Low,
            ticket_type_id: None,
            tag_ids: Vec::new(),
            stage_id,
            stage_sequence,
            time_hours,
            exclude_stage_ids: Vec::new(),
            partner_ids: Vec::new(),
            active: true,
        }
    }

    /// 校验策略在所属团队中是否合法
    pub fn validate(&self, team_stage_ids: &[Uuid]) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("SLA policy name is required".into()));
        }
        if !self.time_hours.is_finite() || self.time_hours < 0.0 {
            return Err(DomainError::Validation(format!(
                "SLA time budget must be a non-negative number of hours, got {}",
                self.time_hours
            )));
        }
        if let Some(stage) = self
            .exclude_stage_ids
            .iter()
            .find(|s| !team_stage_ids.contains(s))
        {
            return Err(DomainError::Validation(format!(
                "excluded stage {} does not belong to the team",
                stage
            )));
        }
        Ok(())
    }

    pub fn has_frozen_stages(&self) -> bool {
        !self.exclude_stage_ids.is_empty()
    }

    /// 给定阶段是否为冻结阶段
    pub fn freezes(&self, stage_id: Option<Uuid>) -> bool {
        stage_id.is_some_and(|s| self.exclude_stage_ids.contains(&s))
    }
}

/// 可查询的 SLA 策略字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlaPolicyField {
    Id,
    TeamId,
    Priority,
    TicketTypeId,
    TagIds,
    StageId,
    StageSequence,
    PartnerIds,
    Active,
}

impl Record<SlaPolicyField> for SlaPolicy {
    fn value(&self, field: &SlaPolicyField) -> Value {
        match field {
            SlaPolicyField::Id => self.id.into(),
            SlaPolicyField::TeamId => self.team_id.into(),
            SlaPolicyField::Priority => self.priority.as_i32().into(),
            SlaPolicyField::TicketTypeId => self.ticket_type_id.into(),
            SlaPolicyField::TagIds => self.tag_ids.as_slice().into(),
            SlaPolicyField::StageId => self.stage_id.into(),
            SlaPolicyField::StageSequence => self.stage_sequence.into(),
            SlaPolicyField::PartnerIds => self.partner_ids.as_slice().into(),
            SlaPolicyField::Active => self.active.into(),
        }
    }
}

/// SLA 匹配分组键
///
/// 具有相同键的工单共享同一组候选策略，只需查询一次。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlaKey {
    pub team_id: Uuid,
    pub priority: TicketPriority,
    pub ticket_type_id: Option<Uuid>,
    /// 排序去重后的标签
    pub tag_ids: Vec<Uuid>,
    pub partner_id: Option<Uuid>,
}

impl SlaKey {
    /// 没有团队的工单不参与 SLA
    pub fn from_ticket(ticket: &Ticket) -> Option<Self> {
        let mut tag_ids = ticket.tag_ids.clone();
        tag_ids.sort();
        tag_ids.dedup();
        Some(Self {
            team_id: ticket.team_id?,
            priority: ticket.priority,
            ticket_type_id: ticket.ticket_type_id,
            tag_ids,
            partner_id: ticket.partner_id,
        })
    }

    /// 构造匹配策略的谓词
    ///
    /// 在触发条件之外，还要求策略的目标阶段不早于工单当前阶段。
    /// `partner_scope` 是工单客户及其所有上级和下级客户。
    pub fn policy_predicate(
        &self,
        stage_sequence: i32,
        partner_scope: &[Uuid],
    ) -> Predicate<SlaPolicyField> {
        self.trigger_predicate(partner_scope)
            .and(Predicate::ge(SlaPolicyField::StageSequence, stage_sequence))
    }

    /// 只看触发字段（团队、优先级、类型、标签、客户）的谓词
    pub fn trigger_predicate(&self, partner_scope: &[Uuid]) -> Predicate<SlaPolicyField> {
        let ticket_type = match self.ticket_type_id {
            Some(ticket_type) => Predicate::eq(SlaPolicyField::TicketTypeId, ticket_type)
                .or(Predicate::is_not_set(SlaPolicyField::TicketTypeId)),
            None => Predicate::is_not_set(SlaPolicyField::TicketTypeId),
        };
        let partner = if partner_scope.is_empty() {
            Predicate::is_not_set(SlaPolicyField::PartnerIds)
        } else {
            Predicate::intersects(SlaPolicyField::PartnerIds, partner_scope)
                .or(Predicate::is_not_set(SlaPolicyField::PartnerIds))
        };

        Predicate::all([
            Predicate::eq(SlaPolicyField::Active, true),
            Predicate::eq(SlaPolicyField::TeamId, self.team_id),
            Predicate::le(SlaPolicyField::Priority, self.priority.as_i32()),
            ticket_type,
            partner,
            Predicate::subset_of(SlaPolicyField::TagIds, self.tag_ids.as_slice()),
        ])
    }
}

/// SLA 状态的派生结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaState {
    /// 进行中
    Ongoing,
    /// 按时达成
    Reached,
    /// 失败：逾期达成或已超过截止时间
    Failed,
}

impl SlaState {
    /// 看板中的颜色编号
    pub fn color(self) -> i32 {
        match self {
            SlaState::Failed => 1,
            SlaState::Reached => 10,
            SlaState::Ongoing => 0,
        }
    }

    /// 匹配该派生状态的状态记录谓词
    pub fn predicate(self, now: DateTime<Utc>) -> Predicate<SlaStatusField> {
        use SlaStatusField::{Deadline, ReachedDatetime};

        match self {
            SlaState::Reached => Predicate::all([
                Predicate::is_set(ReachedDatetime),
                Predicate::is_set(Deadline),
                Predicate::compare_fields(ReachedDatetime, Operator::Lt, Deadline),
            ]),
            SlaState::Failed => Predicate::any([
                Predicate::all([
                    Predicate::is_set(ReachedDatetime),
                    Predicate::is_set(Deadline),
                    Predicate::compare_fields(ReachedDatetime, Operator::Ge, Deadline),
                ]),
                Predicate::all([
                    Predicate::is_not_set(ReachedDatetime),
                    Predicate::is_set(Deadline),
                    Predicate::le(Deadline, now),
                ]),
            ]),
            SlaState::Ongoing => Predicate::any([
                Predicate::all([
                    Predicate::is_not_set(ReachedDatetime),
                    Predicate::is_not_set(Deadline).or(Predicate::gt(Deadline, now)),
                ]),
                Predicate::all([
                    Predicate::is_set(ReachedDatetime),
                    Predicate::is_not_set(Deadline),
                ]),
            ]),
        }
    }

    /// `status in states`，`negate` 时为 `status not in states`
    pub fn search_predicate(
        states: &[SlaState],
        negate: bool,
        now: DateTime<Utc>,
    ) -> Predicate<SlaStatusField> {
        let matched = Predicate::any(states.iter().map(|s| s.predicate(now)));
        if negate {
            !matched
        } else {
            matched
        }
    }
}

impl fmt::Display for SlaState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SlaState::Ongoing => write!(f, "ongoing"),
            SlaState::Reached => write!(f, "reached"),
            SlaState::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SlaState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(SlaState::Ongoing),
            "reached" => Ok(SlaState::Reached),
            "failed" => Ok(SlaState::Failed),
            _ => Err(()),
        }
    }
}

/// 工单与 SLA 策略的关联
///
/// `reached_datetime` 一旦写入就不再改变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaStatus {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub sla_id: Uuid,
    /// 策略目标阶段，冗余存储以便按阶段批量标记达成
    pub sla_stage_id: Uuid,
    pub deadline: Option<DateTime<Utc>>,
    pub reached_datetime: Option<DateTime<Utc>>,
    /// 达成时间相对截止时间的工作日偏差，提前为负
    pub exceeded_days: Option<f64>,
}

impl SlaStatus {
    pub fn new(ticket_id: Uuid, policy: &SlaPolicy, reached_datetime: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            sla_id: policy.id,
            sla_stage_id: policy.stage_id,
            deadline: None,
            reached_datetime,
            exceeded_days: None,
        }
    }

    /// 派生状态
    pub fn state(&self, now: DateTime<Utc>) -> SlaState {
        match (self.reached_datetime, self.deadline) {
            (Some(reached), Some(deadline)) if reached < deadline => SlaState::Reached,
            (Some(_), Some(_)) => SlaState::Failed,
            (Some(_), None) => SlaState::Ongoing,
            (None, Some(deadline)) if deadline <= now => SlaState::Failed,
            (None, _) => SlaState::Ongoing,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.reached_datetime.is_some()
    }

    /// 标记达成，已达成的状态保持原值
    ///
    /// 返回是否发生了变化。
    pub fn mark_reached(&mut self, at: DateTime<Utc>) -> bool {
        if self.reached_datetime.is_some() {
            return false;
        }
        self.reached_datetime = Some(at);
        true
    }

    /// 逾期达成，或未达成且已过截止时间
    pub fn is_late(&self, now: DateTime<Utc>) -> bool {
        match (self.deadline, self.reached_datetime) {
            (Some(deadline), Some(reached)) => deadline < reached,
            (Some(deadline), None) => deadline < now,
            (None, _) => false,
        }
    }
}

/// 可查询的 SLA 状态字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlaStatusField {
    Id,
    TicketId,
    SlaId,
    SlaStageId,
    Deadline,
    ReachedDatetime,
}

impl Record<SlaStatusField> for SlaStatus {
    fn value(&self, field: &SlaStatusField) -> Value {
        match field {
            SlaStatusField::Id => self.id.into(),
            SlaStatusField::TicketId => self.ticket_id.into(),
            SlaStatusField::SlaId => self.sla_id.into(),
            SlaStatusField::SlaStageId => self.sla_stage_id.into(),
            SlaStatusField::Deadline => self.deadline.into(),
            SlaStatusField::ReachedDatetime => self.reached_datetime.into(),
        }
    }
}
