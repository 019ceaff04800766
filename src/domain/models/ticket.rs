// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::query::{Predicate, Record, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 工单实体
///
/// 帮助台中的一个客户请求。工单归属于一个团队，沿着团队的阶段推进，
/// 并由 SLA 引擎为其生成截止时间和达成状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// 工单唯一标识符
    pub id: Uuid,
    /// 递增的工单编号，用于生成展示用的参考号
    pub ticket_number: i64,
    /// 主题
    pub name: String,
    pub description: Option<String>,
    /// 负责团队
    pub team_id: Option<Uuid>,
    /// 指派的处理人
    pub user_id: Option<Uuid>,
    /// 客户
    pub partner_id: Option<Uuid>,
    pub partner_name: Option<String>,
    pub partner_email: Option<String>,
    pub partner_phone: Option<String>,
    pub ticket_type_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub priority: TicketPriority,
    /// 当前阶段，未设置时视为阶段序号 0
    pub stage_id: Option<Uuid>,
    pub kanban_state: KanbanState,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 最近一次阶段变化的时间
    pub date_last_stage_update: Option<DateTime<Utc>>,
    /// 首次指派处理人的时间
    pub assign_date: Option<DateTime<Utc>>,
    /// 进入关闭阶段的时间
    pub close_date: Option<DateTime<Utc>>,
    /// 是否由客户自行关闭
    pub closed_by_partner: bool,
    pub close_comment: Option<String>,
    pub cm_form: Option<String>,
    pub closed_by_id: Option<Uuid>,
    /// 从创建到关闭经过的秒数
    pub time_to_close_secs: Option<i64>,
    /// 未达成 SLA 中最早的截止时间（存储的汇总值）
    pub sla_deadline: Option<DateTime<Utc>>,
    /// 是否存在逾期的 SLA（存储的汇总值）
    pub sla_reached_late: bool,
    /// 门户访问令牌
    pub access_token: String,
    pub rating: Option<i32>,
    pub rating_feedback: Option<String>,
    pub active: bool,
    /// 被合并时指向吸收它的工单
    pub merged_into_id: Option<Uuid>,
    /// 锁定的工单不能重新打开
    pub locked: bool,
    /// 关注工单进展的客户
    pub follower_ids: Vec<Uuid>,
}

impl Ticket {
    /// 创建新的工单，其余字段由工单服务填充
    pub fn new(ticket_number: i64, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_number,
            name: name.into(),
            description: None,
            team_id: None,
            user_id: None,
            partner_id: None,
            partner_name: None,
            partner_email: None,
            partner_phone: None,
            ticket_type_id: None,
            tag_ids: Vec::new(),
            priority: TicketPriority::default(),
            stage_id: None,
            kanban_state: KanbanState::default(),
            category_id: None,
            sub_category_id: None,
            problem_id: None,
            created_at: now,
            updated_at: now,
            date_last_stage_update: None,
            assign_date: None,
            close_date: None,
            closed_by_partner: false,
            close_comment: None,
            cm_form: None,
            closed_by_id: None,
            time_to_close_secs: None,
            sla_deadline: None,
            sla_reached_late: false,
            access_token: Uuid::new_v4().simple().to_string(),
            rating: None,
            rating_feedback: None,
            active: true,
            merged_into_id: None,
            locked: false,
            follower_ids: Vec::new(),
        }
    }

    /// 展示用的参考号，例如 `TN42-20250303`
    pub fn reference(&self, prefix: &str) -> String {
        format!(
            "{}{}-{}",
            prefix,
            self.ticket_number,
            self.created_at.format("%Y%m%d")
        )
    }

    /// 当前是否处于某个关闭阶段
    pub fn is_closed(&self) -> bool {
        self.close_date.is_some()
    }

    /// 锁定的已关闭工单不能移回非关闭阶段
    pub fn ensure_can_reopen(&self) -> Result<(), DomainError> {
        if self.locked && self.is_closed() {
            return Err(DomainError::InvalidTransition(format!(
                "ticket {} is locked and cannot be reopened",
                self.ticket_number
            )));
        }
        Ok(())
    }

    /// 添加关注者，已存在或就是工单客户时忽略
    pub fn add_follower(&mut self, partner_id: Uuid) -> bool {
        if self.partner_id == Some(partner_id) || self.follower_ids.contains(&partner_id) {
            return false;
        }
        self.follower_ids.push(partner_id);
        true
    }

    /// 实时计算的 SLA 失败标记
    pub fn sla_fail(&self, now: DateTime<Utc>) -> bool {
        self.sla_deadline.is_some_and(|d| d < now) || self.sla_reached_late
    }

    /// 所有 SLA 截止时间仍在未来
    pub fn sla_success(&self, now: DateTime<Utc>) -> bool {
        self.sla_deadline.is_some_and(|d| d > now)
    }

    /// 按 SLA 失败标记搜索工单的谓词
    pub fn sla_fail_predicate(failed: bool, now: DateTime<Utc>) -> Predicate<TicketField> {
        if failed {
            Predicate::lt(TicketField::SlaDeadline, now)
                .or(Predicate::eq(TicketField::SlaReachedLate, true))
        } else {
            Predicate::is_not_set(TicketField::SlaDeadline)
                .or(Predicate::ge(TicketField::SlaDeadline, now))
                .and(Predicate::eq(TicketField::SlaReachedLate, false))
        }
    }

    /// 截止时间仍在未来的工单
    pub fn sla_success_predicate(now: DateTime<Utc>) -> Predicate<TicketField> {
        Predicate::gt(TicketField::SlaDeadline, now)
    }
}

/// 工单优先级
///
/// 数值越大越紧急，SLA 策略匹配时使用“策略优先级 ≤ 工单优先级”。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_i32(self) -> i32 {
        match self {
            TicketPriority::Low => 0,
            TicketPriority::Medium => 1,
            TicketPriority::High => 2,
            TicketPriority::Urgent => 3,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TicketPriority::Low),
            1 => Some(TicketPriority::Medium),
            2 => Some(TicketPriority::High),
            3 => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" | "0" => Ok(TicketPriority::Low),
            "medium" | "1" => Ok(TicketPriority::Medium),
            "high" | "2" => Ok(TicketPriority::High),
            "urgent" | "3" => Ok(TicketPriority::Urgent),
            _ => Err(()),
        }
    }
}

/// 看板状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KanbanState {
    /// 进行中
    #[default]
    Normal,
    /// 可进入下一阶段
    Done,
    /// 受阻
    Blocked,
}

impl fmt::Display for KanbanState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KanbanState::Normal => write!(f, "normal"),
            KanbanState::Done => write!(f, "done"),
            KanbanState::Blocked => write!(f, "blocked"),
        }
    }
}

impl FromStr for KanbanState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(KanbanState::Normal),
            "done" => Ok(KanbanState::Done),
            "blocked" => Ok(KanbanState::Blocked),
            _ => Err(()),
        }
    }
}

/// 可查询的工单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
    Id,
    TeamId,
    UserId,
    PartnerId,
    TicketTypeId,
    TagIds,
    Priority,
    StageId,
    KanbanState,
    SlaDeadline,
    SlaReachedLate,
    CloseDate,
    CreatedAt,
    Active,
}

impl TicketField {
    /// 修改后需要重新应用 SLA 的字段
    pub const SLA_TRIGGERS: [TicketField; 5] = [
        TicketField::TeamId,
        TicketField::Priority,
        TicketField::TicketTypeId,
        TicketField::TagIds,
        TicketField::PartnerId,
    ];

    pub fn is_sla_trigger(self) -> bool {
        Self::SLA_TRIGGERS.contains(&self)
    }
}

impl Record<TicketField> for Ticket {
    fn value(&self, field: &TicketField) -> Value {
        match field {
            TicketField::Id => self.id.into(),
            TicketField::TeamId => self.team_id.into(),
            TicketField::UserId => self.user_id.into(),
            TicketField::PartnerId => self.partner_id.into(),
            TicketField::TicketTypeId => self.ticket_type_id.into(),
            TicketField::TagIds => self.tag_ids.as_slice().into(),
            TicketField::Priority => self.priority.as_i32().into(),
            TicketField::StageId => self.stage_id.into(),
            TicketField::KanbanState => self.kanban_state.to_string().into(),
            TicketField::SlaDeadline => self.sla_deadline.into(),
            TicketField::SlaReachedLate => self.sla_reached_late.into(),
            TicketField::CloseDate => self.close_date.into(),
            TicketField::CreatedAt => self.created_at.into(),
            TicketField::Active => self.active.into(),
        }
    }
}

/// 创建工单的输入
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub partner_name: Option<String>,
    pub partner_email: Option<String>,
    pub partner_phone: Option<String>,
    pub ticket_type_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub priority: TicketPriority,
    pub stage_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
}

/// 工单的部分更新
///
/// 外层 `None` 表示不修改；`Some(None)` 表示清空可选字段。
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub team_id: Option<Option<Uuid>>,
    pub user_id: Option<Option<Uuid>>,
    pub partner_id: Option<Option<Uuid>>,
    pub ticket_type_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub priority: Option<TicketPriority>,
    pub stage_id: Option<Uuid>,
    pub kanban_state: Option<KanbanState>,
    pub category_id: Option<Option<Uuid>>,
    pub sub_category_id: Option<Option<Uuid>>,
    pub problem_id: Option<Option<Uuid>>,
    pub closed_by_partner: Option<bool>,
}

impl TicketChanges {
    /// 本次更新涉及的可查询字段
    pub fn changed_fields(&self) -> Vec<TicketField> {
        let mut fields = Vec::new();
        if self.team_id.is_some() {
            fields.push(TicketField::TeamId);
        }
        if self.user_id.is_some() {
            fields.push(TicketField::UserId);
        }
        if self.partner_id.is_some() {
            fields.push(TicketField::PartnerId);
        }
        if self.ticket_type_id.is_some() {
            fields.push(TicketField::TicketTypeId);
        }
        if self.tag_ids.is_some() {
            fields.push(TicketField::TagIds);
        }
        if self.priority.is_some() {
            fields.push(TicketField::Priority);
        }
        if self.stage_id.is_some() {
            fields.push(TicketField::StageId);
        }
        if self.kanban_state.is_some() {
            fields.push(TicketField::KanbanState);
        }
        fields
    }

    /// 是否修改了任何 SLA 触发字段
    pub fn touches_sla(&self) -> bool {
        self.changed_fields().into_iter().any(TicketField::is_sla_trigger)
    }
}

/// 阶段变化记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub old_stage_id: Option<Uuid>,
    pub new_stage_id: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}

impl StageTransition {
    pub fn new(
        ticket_id: Uuid,
        old_stage_id: Option<Uuid>,
        new_stage_id: Option<Uuid>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            old_stage_id,
            new_stage_id,
            changed_at,
        }
    }
}

/// 留言作者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageAuthor {
    Staff,
    Customer,
}

impl fmt::Display for MessageAuthor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MessageAuthor::Staff => write!(f, "staff"),
            MessageAuthor::Customer => write!(f, "customer"),
        }
    }
}

impl FromStr for MessageAuthor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(MessageAuthor::Staff),
            "customer" => Ok(MessageAuthor::Customer),
            _ => Err(()),
        }
    }
}

/// 工单上的留言
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author: MessageAuthor,
    pub author_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 领域错误
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
    #[error("Access denied")]
    AccessDenied,
}
