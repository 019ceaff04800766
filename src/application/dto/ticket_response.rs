// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::capabilities::{Commentable, PortalAccessible, SuggestedRecipient};
use crate::domain::models::sla::{SlaState, SlaStatus};
use crate::domain::models::ticket::{KanbanState, Ticket, TicketMessage, TicketPriority};
use crate::domain::services::ticket_service::TicketDurations;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// SLA 状态视图，附带按当前时间派生的状态和颜色
#[derive(Debug, Clone, Serialize)]
pub struct SlaStatusView {
    pub id: Uuid,
    pub sla_id: Uuid,
    pub sla_stage_id: Uuid,
    pub deadline: Option<DateTime<Utc>>,
    pub reached_datetime: Option<DateTime<Utc>>,
    pub exceeded_days: Option<f64>,
    pub state: SlaState,
    pub color: i32,
}

impl SlaStatusView {
    pub fn new(status: &SlaStatus, now: DateTime<Utc>) -> Self {
        let state = status.state(now);
        Self {
            id: status.id,
            sla_id: status.sla_id,
            sla_stage_id: status.sla_stage_id,
            deadline: status.deadline,
            reached_datetime: status.reached_datetime,
            exceeded_days: status.exceeded_days,
            state,
            color: state.color(),
        }
    }
}

/// 工单视图
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub id: Uuid,
    pub reference: String,
    pub ticket_number: i64,
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub partner_name: Option<String>,
    pub partner_email: Option<String>,
    pub ticket_type_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub priority: TicketPriority,
    pub stage_id: Option<Uuid>,
    pub kanban_state: KanbanState,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub assign_date: Option<DateTime<Utc>>,
    pub close_date: Option<DateTime<Utc>>,
    pub close_comment: Option<String>,
    pub closed_by_partner: bool,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub sla_reached_late: bool,
    pub sla_fail: bool,
    pub sla_success: bool,
    pub rating: Option<i32>,
    pub merged_into_id: Option<Uuid>,
    pub locked: bool,
    pub follower_ids: Vec<Uuid>,
    pub sla_statuses: Vec<SlaStatusView>,
}

impl TicketView {
    pub fn new(ticket: &Ticket, statuses: &[SlaStatus], prefix: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: ticket.id,
            reference: ticket.reference(prefix),
            ticket_number: ticket.ticket_number,
            name: ticket.name.clone(),
            description: ticket.description.clone(),
            team_id: ticket.team_id,
            user_id: ticket.user_id,
            partner_id: ticket.partner_id,
            partner_name: ticket.partner_name.clone(),
            partner_email: ticket.partner_email.clone(),
            ticket_type_id: ticket.ticket_type_id,
            tag_ids: ticket.tag_ids.clone(),
            priority: ticket.priority,
            stage_id: ticket.stage_id,
            kanban_state: ticket.kanban_state,
            category_id: ticket.category_id,
            sub_category_id: ticket.sub_category_id,
            problem_id: ticket.problem_id,
            created_at: ticket.created_at,
            assign_date: ticket.assign_date,
            close_date: ticket.close_date,
            close_comment: ticket.close_comment.clone(),
            closed_by_partner: ticket.closed_by_partner,
            sla_deadline: ticket.sla_deadline,
            sla_reached_late: ticket.sla_reached_late,
            sla_fail: ticket.sla_fail(now),
            sla_success: ticket.sla_success(now),
            rating: ticket.rating,
            merged_into_id: ticket.merged_into_id,
            locked: ticket.locked,
            follower_ids: ticket.follower_ids.clone(),
            sla_statuses: statuses
                .iter()
                .filter(|s| s.ticket_id == ticket.id)
                .map(|s| SlaStatusView::new(s, now))
                .collect(),
        }
    }
}

/// 合并结果视图
#[derive(Debug, Clone, Serialize)]
pub struct MergeView {
    pub source: TicketView,
    pub target: TicketView,
}

/// 工单详情，额外包含耗时、同客户工单数和留言
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetailView {
    #[serde(flatten)]
    pub ticket: TicketView,
    pub durations: TicketDurations,
    pub partner_ticket_count: u64,
    pub portal_url: String,
    pub suggested_recipients: Vec<SuggestedRecipient>,
    pub messages: Vec<TicketMessage>,
}

impl TicketDetailView {
    pub fn new(
        ticket: &Ticket,
        view: TicketView,
        durations: TicketDurations,
        partner_ticket_count: u64,
        messages: Vec<TicketMessage>,
    ) -> Self {
        Self {
            ticket: view,
            durations,
            partner_ticket_count,
            portal_url: ticket.portal_url(),
            suggested_recipients: ticket.suggested_recipients(),
            messages,
        }
    }
}

/// 门户中客户可见的工单视图
#[derive(Debug, Clone, Serialize)]
pub struct PortalTicketView {
    pub reference: String,
    pub name: String,
    pub description: Option<String>,
    pub stage_id: Option<Uuid>,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub close_date: Option<DateTime<Utc>>,
    pub rating: Option<i32>,
    pub messages: Vec<TicketMessage>,
}

impl PortalTicketView {
    pub fn new(ticket: &Ticket, prefix: &str, messages: Vec<TicketMessage>) -> Self {
        Self {
            reference: ticket.reference(prefix),
            name: ticket.name.clone(),
            description: ticket.description.clone(),
            stage_id: ticket.stage_id,
            priority: ticket.priority,
            created_at: ticket.created_at,
            close_date: ticket.close_date,
            rating: ticket.rating,
            messages,
        }
    }
}
