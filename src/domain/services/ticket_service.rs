// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::notification_service::{self, NotificationService, PushNotification};
use super::sla_service::SlaService;
use super::{Clock, ServiceError};
use crate::config::settings::HelpdeskSettings;
use crate::domain::models::calendar::WorkingCalendar;
use crate::domain::models::capabilities::{PortalAccessible, Rateable};
use crate::domain::models::partner::{parse_name_and_email, Partner};
use crate::domain::models::team::{Stage, Team};
use crate::domain::models::ticket::{
    DomainError, KanbanState, MessageAuthor, NewTicket, StageTransition, Ticket, TicketChanges,
    TicketField, TicketMessage,
};
use crate::domain::query::Predicate;
use crate::domain::repositories::unit_of_work::{Repositories, UnitOfWorkFactory};
use crate::utils::text::html_to_text;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// 关闭工单的输入
#[derive(Debug, Clone, Default)]
pub struct CloseTicket {
    /// 关闭说明（可含 HTML）
    pub comment: String,
    pub cm_form: Option<String>,
    pub closed_by: Option<Uuid>,
    /// 由客户在门户中关闭
    pub by_partner: bool,
}

/// 工单耗时（小时）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDurations {
    /// 从创建到首次指派的工作小时
    pub assign_hours: Option<f64>,
    /// 从创建到关闭的工作小时
    pub close_hours: Option<f64>,
    /// 从创建到关闭（或现在）的自然小时
    pub open_hours: f64,
}

/// 合并结果
#[derive(Debug, Clone)]
pub struct MergedTickets {
    /// 被关闭并锁定的工单
    pub source: Ticket,
    /// 吸收它的工单
    pub target: Ticket,
}

/// 工单服务
///
/// 处理工单的创建、更新、关闭、合并、留言和评分，并在写入后显式调用 SLA 服务。
/// 创建、更新、关闭和合并各自在一个事务中完成，推送通知在提交之后发出。
pub struct TicketService {
    repos: Repositories,
    uow: Arc<dyn UnitOfWorkFactory>,
    sla: Arc<SlaService>,
    notifier: Option<Arc<dyn NotificationService>>,
    clock: Arc<dyn Clock>,
    settings: HelpdeskSettings,
}

impl TicketService {
    /// 创建新的工单服务实例
    pub fn new(
        repos: Repositories,
        uow: Arc<dyn UnitOfWorkFactory>,
        sla: Arc<SlaService>,
        clock: Arc<dyn Clock>,
        settings: HelpdeskSettings,
    ) -> Self {
        Self {
            repos,
            uow,
            sla,
            notifier: None,
            clock,
            settings,
        }
    }

    /// 设置推送通知服务
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationService>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn settings(&self) -> &HelpdeskSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 创建单张工单
    pub async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, ServiceError> {
        self.create_tickets(vec![new])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound("created ticket".into()))
    }

    /// 批量创建工单
    ///
    /// 同一批次中每个团队只挑选一次处理人。任何一张失败时整批回滚。
    pub async fn create_tickets(&self, batch: Vec<NewTicket>) -> Result<Vec<Ticket>, ServiceError> {
        let now = self.clock.now();
        let uow = self.uow.begin().await?;
        let tickets = self.create_in(uow.repos(), batch, now).await?;
        uow.commit().await?;

        for ticket in &tickets {
            if let Some(user_id) = ticket.user_id {
                self.notify_assignee(ticket, user_id);
            }
        }
        Ok(tickets)
    }

    async fn create_in(
        &self,
        repos: &Repositories,
        batch: Vec<NewTicket>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, ServiceError> {
        let mut picked: HashMap<Uuid, Option<Uuid>> = HashMap::new();
        let mut team_cache: HashMap<Uuid, (Team, Vec<Stage>)> = HashMap::new();
        let mut created = Vec::with_capacity(batch.len());

        for new in batch {
            if new.name.trim().is_empty() {
                return Err(DomainError::Validation("ticket subject is required".into()).into());
            }

            let team = resolve_team(
                repos,
                new.team_id.or(self.settings.default_team_id),
                &mut team_cache,
            )
            .await?;

            let stage = match (new.stage_id, &team) {
                (Some(stage_id), _) => Some(find_stage(repos, stage_id).await?),
                (None, Some((team, stages))) => team.default_stage(stages).cloned(),
                (None, None) => None,
            };

            let user_id = match (new.user_id, &team) {
                (Some(user_id), _) => Some(user_id),
                (None, Some((team, _))) => *picked
                    .entry(team.id)
                    .or_insert_with(|| team.pick_assignee(&mut rand::rng())),
                (None, None) => None,
            };

            let number = repos
                .tickets
                .next_ticket_number(self.settings.ticket_number_start)
                .await?;
            let mut ticket = Ticket::new(number, new.name.trim(), now);
            ticket.description = new.description;
            ticket.team_id = team.as_ref().map(|(t, _)| t.id);
            ticket.user_id = user_id;
            ticket.ticket_type_id = new.ticket_type_id;
            ticket.tag_ids = new.tag_ids;
            ticket.priority = new.priority;
            ticket.category_id = new.category_id;
            ticket.sub_category_id = new.sub_category_id;
            ticket.problem_id = new.problem_id;
            ticket.partner_name = new.partner_name;
            ticket.partner_email = new.partner_email;
            ticket.partner_phone = new.partner_phone;
            ticket.partner_id = new.partner_id;
            attach_partner(repos, &mut ticket).await?;

            if ticket.user_id.is_some() {
                ticket.assign_date = Some(now);
            }
            if let Some(stage) = &stage {
                ticket.stage_id = Some(stage.id);
                ticket.date_last_stage_update = Some(now);
                if stage.is_close {
                    ticket.close_date = Some(now);
                }
            }

            let saved = repos.tickets.create(&ticket).await?;
            if saved.stage_id.is_some() {
                repos
                    .tracking
                    .record(&StageTransition::new(saved.id, None, saved.stage_id, now))
                    .await?;
            }
            counter!("helpdesk_tickets_created_total").increment(1);
            info!(
                ticket_id = %saved.id,
                reference = %saved.reference(&self.settings.ticket_number_prefix),
                "Ticket created"
            );
            created.push(saved);
        }

        self.sla.apply(repos, &created, false, now).await?;

        let ids: Vec<Uuid> = created.iter().map(|t| t.id).collect();
        Ok(repos.tickets.find_by_ids(&ids).await?)
    }

    /// 更新单张工单
    pub async fn update_ticket(&self, id: Uuid, changes: TicketChanges) -> Result<Ticket, ServiceError> {
        self.update_tickets(&[id], changes)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("ticket {}", id)))
    }

    /// 批量更新工单
    ///
    /// 修改 SLA 触发字段时以保留已达成状态的方式重新应用 SLA；
    /// 修改阶段时向 SLA 传播达成。任何一张失败时整批回滚。
    pub async fn update_tickets(
        &self,
        ids: &[Uuid],
        changes: TicketChanges,
    ) -> Result<Vec<Ticket>, ServiceError> {
        let now = self.clock.now();
        let uow = self.uow.begin().await?;
        let (tickets, newly_assigned) = self.update_in(uow.repos(), ids, &changes, now).await?;
        uow.commit().await?;

        for (ticket_id, user_id) in newly_assigned {
            if let Some(ticket) = tickets.iter().find(|t| t.id == ticket_id) {
                self.notify_assignee(ticket, user_id);
            }
        }
        debug!(tickets = tickets.len(), "Tickets updated");
        Ok(tickets)
    }

    /// 在给定事务中更新工单，返回更新后的工单和新指派的 (工单, 处理人)
    async fn update_in(
        &self,
        repos: &Repositories,
        ids: &[Uuid],
        changes: &TicketChanges,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Ticket>, Vec<(Uuid, Uuid)>), ServiceError> {
        let tickets = repos.tickets.find_by_ids(ids).await?;
        if let Some(missing) = ids.iter().find(|id| !tickets.iter().any(|t| t.id == **id)) {
            return Err(ServiceError::NotFound(format!("ticket {}", missing)));
        }
        if changes.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::Validation("ticket subject is required".into()).into());
        }

        let explicit_stage = match changes.stage_id {
            Some(stage_id) => Some(find_stage(repos, stage_id).await?),
            None => None,
        };
        let new_team = match changes.team_id {
            Some(Some(team_id)) => Some(
                repos
                    .teams
                    .find_by_id(team_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("team {}", team_id)))?,
            ),
            _ => None,
        };
        let new_team_stages = match &new_team {
            Some(team) => repos.teams.stages_for_team(team.id).await?,
            None => Vec::new(),
        };

        let mut updated = Vec::with_capacity(tickets.len());
        let mut newly_assigned = Vec::new();
        for mut ticket in tickets {
            let old_stage = ticket.stage_id;
            let old_user = ticket.user_id;
            apply_simple_changes(&mut ticket, changes);

            if changes.partner_id.is_some() {
                ticket.partner_name = None;
                ticket.partner_email = None;
                ticket.partner_phone = None;
                attach_partner(repos, &mut ticket).await?;
            }

            // moving to a team that does not use the current stage resets it
            let target_stage = explicit_stage.clone().or_else(|| {
                let team = new_team.as_ref()?;
                let keeps_stage = ticket.stage_id.is_some_and(|s| team.stage_ids.contains(&s));
                if keeps_stage {
                    None
                } else {
                    team.default_stage(&new_team_stages).cloned()
                }
            });

            if let Some(Some(user_id)) = changes.user_id {
                if ticket.assign_date.is_none() {
                    ticket.assign_date = Some(now);
                }
                if old_user != Some(user_id) {
                    newly_assigned.push((ticket.id, user_id));
                }
            }

            if let Some(stage) = &target_stage {
                if stage.is_close {
                    if ticket.close_date.is_none() {
                        ticket.close_date = Some(now);
                    }
                } else {
                    ticket.ensure_can_reopen()?;
                    ticket.close_date = None;
                    ticket.closed_by_partner = false;
                }
                ticket.stage_id = Some(stage.id);
                ticket.date_last_stage_update = Some(now);
                ticket.kanban_state = changes.kanban_state.unwrap_or(KanbanState::Normal);
                if old_stage != ticket.stage_id {
                    repos
                        .tracking
                        .record(&StageTransition::new(ticket.id, old_stage, ticket.stage_id, now))
                        .await?;
                }
            }

            ticket.updated_at = now;
            updated.push(repos.tickets.update(&ticket).await?);
        }

        if changes.touches_sla() {
            self.sla.apply(repos, &updated, true, now).await?;
        }
        if let Some(stage) = &explicit_stage {
            self.sla.reach(repos, &updated, stage.id, now).await?;
        }

        Ok((repos.tickets.find_by_ids(ids).await?, newly_assigned))
    }

    /// 关闭工单
    ///
    /// 记录关闭说明和耗时，然后移动到团队的第一个关闭阶段。
    pub async fn close_ticket(&self, id: Uuid, close: CloseTicket) -> Result<Ticket, ServiceError> {
        let now = self.clock.now();
        let uow = self.uow.begin().await?;
        let repos = uow.repos();

        let mut ticket = get_in(repos, id).await?;
        let closing = closing_stage(repos, &ticket).await?;

        let comment = html_to_text(&close.comment);
        ticket.close_comment = (!comment.is_empty()).then_some(comment);
        ticket.cm_form = close.cm_form;
        ticket.closed_by_id = close.closed_by;
        ticket.time_to_close_secs = Some((now - ticket.created_at).num_seconds());
        repos.tickets.update(&ticket).await?;

        info!(ticket_id = %id, stage_id = %closing.id, "Closing ticket");
        let changes = TicketChanges {
            stage_id: Some(closing.id),
            closed_by_partner: close.by_partner.then_some(true),
            ..Default::default()
        };
        let (tickets, _) = self.update_in(repos, &[id], &changes, now).await?;
        uow.commit().await?;

        tickets
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("ticket {}", id)))
    }

    /// 把 `source_id` 合并到 `target_id`
    ///
    /// 源工单被关闭、记录关闭耗时并锁定，此后不能重新打开；
    /// 源工单的客户成为目标工单的关注者，目标工单上留下一条合并记录。
    pub async fn merge_tickets(
        &self,
        source_id: Uuid,
        target_id: Uuid,
    ) -> Result<MergedTickets, ServiceError> {
        if source_id == target_id {
            return Err(DomainError::Validation("a ticket cannot be merged into itself".into()).into());
        }
        let now = self.clock.now();
        let uow = self.uow.begin().await?;
        let repos = uow.repos();

        let mut source = get_in(repos, source_id).await?;
        let mut target = get_in(repos, target_id).await?;
        if let Some(merged_into) = source.merged_into_id {
            return Err(DomainError::InvalidTransition(format!(
                "ticket {} is already merged into {}",
                source.ticket_number, merged_into
            ))
            .into());
        }
        if target.merged_into_id.is_some() {
            return Err(DomainError::InvalidTransition(format!(
                "ticket {} was merged and cannot absorb other tickets",
                target.ticket_number
            ))
            .into());
        }
        let closing = closing_stage(repos, &source).await?;

        source.time_to_close_secs = Some((now - source.created_at).num_seconds());
        source.merged_into_id = Some(target.id);
        source.locked = true;
        repos.tickets.update(&source).await?;

        let changes = TicketChanges {
            stage_id: Some(closing.id),
            ..Default::default()
        };
        self.update_in(repos, &[source.id], &changes, now).await?;

        if let Some(partner_id) = source.partner_id {
            if target.add_follower(partner_id) {
                target.updated_at = now;
                repos.tickets.update(&target).await?;
            }
        }
        let prefix = &self.settings.ticket_number_prefix;
        repos
            .messages
            .create(&TicketMessage {
                id: Uuid::new_v4(),
                ticket_id: target.id,
                author: MessageAuthor::Staff,
                author_id: None,
                body: format!(
                    "Ticket {} was merged into {}",
                    source.reference(prefix),
                    target.reference(prefix)
                ),
                created_at: now,
            })
            .await?;

        let source = get_in(repos, source_id).await?;
        let target = get_in(repos, target_id).await?;
        uow.commit().await?;

        counter!("helpdesk_tickets_merged_total").increment(1);
        info!(source_id = %source.id, target_id = %target.id, "Tickets merged");
        Ok(MergedTickets { source, target })
    }

    /// 指派处理人
    pub async fn assign(&self, id: Uuid, user_id: Uuid) -> Result<Ticket, ServiceError> {
        self.update_ticket(
            id,
            TicketChanges {
                user_id: Some(Some(user_id)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Ticket>, ServiceError> {
        Ok(self.repos.tickets.find_by_id(id).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Ticket, ServiceError> {
        self.find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("ticket {}", id)))
    }

    /// 通过门户令牌访问工单
    pub async fn find_by_access_token(&self, token: &str) -> Result<Ticket, ServiceError> {
        let ticket = self
            .repos
            .tickets
            .find_by_access_token(token)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ticket".into()))?;
        if !ticket.check_access_token(token) {
            return Err(DomainError::AccessDenied.into());
        }
        Ok(ticket)
    }

    /// 所有有效工单
    pub async fn list_active(&self) -> Result<Vec<Ticket>, ServiceError> {
        let predicate = Predicate::eq(TicketField::Active, true);
        Ok(self.repos.tickets.search(&predicate).await?)
    }

    /// 按 SLA 失败标记搜索工单
    pub async fn search_by_sla(&self, failed: bool) -> Result<Vec<Ticket>, ServiceError> {
        let predicate = Ticket::sla_fail_predicate(failed, self.clock.now());
        Ok(self.repos.tickets.search(&predicate).await?)
    }

    /// 添加留言
    pub async fn post_message(
        &self,
        ticket_id: Uuid,
        author: MessageAuthor,
        author_id: Option<Uuid>,
        body: &str,
    ) -> Result<TicketMessage, ServiceError> {
        let ticket = self.get(ticket_id).await?;
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::Validation("message body is required".into()).into());
        }
        let message = TicketMessage {
            id: Uuid::new_v4(),
            ticket_id: ticket.id,
            author,
            author_id,
            body: body.to_string(),
            created_at: self.clock.now(),
        };
        Ok(self.repos.messages.create(&message).await?)
    }

    pub async fn messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, ServiceError> {
        Ok(self.repos.messages.find_by_ticket(ticket_id).await?)
    }

    /// 客户评分
    pub async fn rate(
        &self,
        ticket_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Ticket, ServiceError> {
        let mut ticket = self.get(ticket_id).await?;
        ticket.apply_rating(rating, feedback)?;
        ticket.updated_at = self.clock.now();
        info!(ticket_id = %ticket_id, team_id = ?ticket.rating_parent_id(), rating, "Ticket rated");
        Ok(self.repos.tickets.update(&ticket).await?)
    }

    /// 工单耗时
    pub async fn durations(&self, ticket: &Ticket) -> Result<TicketDurations, ServiceError> {
        let calendar = match ticket.team_id {
            Some(team_id) => match self.repos.teams.find_by_id(team_id).await? {
                Some(Team {
                    calendar_id: Some(calendar_id),
                    ..
                }) => self.repos.calendars.find_by_id(calendar_id).await?,
                _ => None,
            },
            None => None,
        };
        let worked = |until: Option<DateTime<Utc>>| -> Option<f64> {
            let until = until?;
            Some(match &calendar {
                Some(c) => c.working_hours_between(ticket.created_at, until),
                None => (until - ticket.created_at).num_seconds() as f64 / 3600.0,
            })
        };

        let end = ticket.close_date.unwrap_or_else(|| self.clock.now());
        Ok(TicketDurations {
            assign_hours: worked(ticket.assign_date),
            close_hours: worked(ticket.close_date),
            open_hours: (end - ticket.created_at).num_seconds() as f64 / 3600.0,
        })
    }

    /// 同一商业实体下其他工单的数量
    pub async fn partner_ticket_count(&self, ticket: &Ticket) -> Result<u64, ServiceError> {
        let Some(partner_id) = ticket.partner_id else {
            return Ok(0);
        };
        let ancestors = self.repos.partners.ancestors(partner_id).await?;
        let commercial = ancestors.last().copied().unwrap_or(partner_id);
        let family = self.repos.partners.descendants(commercial).await?;
        Ok(self
            .repos
            .tickets
            .count_by_partners(&family, ticket.id)
            .await?)
    }

    /// 登记客户
    pub async fn register_partner(&self, partner: Partner) -> Result<Partner, ServiceError> {
        if partner.name.trim().is_empty() {
            return Err(DomainError::Validation("partner name is required".into()).into());
        }
        if let Some(parent_id) = partner.parent_id {
            if self.repos.partners.find_by_id(parent_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("partner {}", parent_id)));
            }
        }
        Ok(self.repos.partners.create(&partner).await?)
    }

    fn notify_assignee(&self, ticket: &Ticket, user_id: Uuid) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        notification_service::dispatch(
            notifier.clone(),
            PushNotification {
                user_id,
                ticket_id: ticket.id,
                title: format!(
                    "New Ticket: {}",
                    ticket.reference(&self.settings.ticket_number_prefix)
                ),
                body: ticket.name.clone(),
            },
        );
    }
}

async fn get_in(repos: &Repositories, id: Uuid) -> Result<Ticket, ServiceError> {
    repos
        .tickets
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("ticket {}", id)))
}

async fn find_stage(repos: &Repositories, stage_id: Uuid) -> Result<Stage, ServiceError> {
    repos
        .teams
        .find_stage(stage_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("stage {}", stage_id)))
}

/// 工单所在团队的第一个关闭阶段
async fn closing_stage(repos: &Repositories, ticket: &Ticket) -> Result<Stage, ServiceError> {
    let team_id = ticket
        .team_id
        .ok_or_else(|| DomainError::InvalidTransition("ticket has no team".into()))?;
    let team = repos
        .teams
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team {}", team_id)))?;
    let stages = repos.teams.stages_for_team(team_id).await?;
    team.closing_stage(&stages).cloned().ok_or_else(|| {
        DomainError::InvalidTransition(format!("team {} has no closing stage", team.name)).into()
    })
}

/// 加载团队及其阶段；未指定团队时使用第一个团队
async fn resolve_team(
    repos: &Repositories,
    team_id: Option<Uuid>,
    cache: &mut HashMap<Uuid, (Team, Vec<Stage>)>,
) -> Result<Option<(Team, Vec<Stage>)>, ServiceError> {
    if let Some(entry) = team_id.and_then(|id| cache.get(&id)) {
        return Ok(Some(entry.clone()));
    }
    let team = match team_id {
        Some(id) => Some(
            repos
                .teams
                .find_by_id(id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("team {}", id)))?,
        ),
        None => repos.teams.first_team().await?,
    };
    let Some(team) = team else {
        return Ok(None);
    };
    let stages = repos.teams.stages_for_team(team.id).await?;
    cache.insert(team.id, (team.clone(), stages.clone()));
    Ok(Some((team, stages)))
}

/// 关联客户：没有客户ID时按邮箱查找或创建，并补全联系方式
async fn attach_partner(repos: &Repositories, ticket: &mut Ticket) -> Result<(), ServiceError> {
    if ticket.partner_id.is_none() {
        if let Some(raw) = ticket.partner_email.clone() {
            let (parsed_name, email) = parse_name_and_email(&raw);
            if let Some(email) = email {
                let partner = match repos.partners.find_by_email(&email).await? {
                    Some(partner) => partner,
                    None => {
                        let name = ticket
                            .partner_name
                            .clone()
                            .or(parsed_name)
                            .unwrap_or_else(|| email.clone());
                        let partner = Partner::new(name).with_email(email.clone());
                        debug!(email = %email, "Creating partner for ticket");
                        repos.partners.create(&partner).await?
                    }
                };
                ticket.partner_email = Some(email);
                ticket.partner_id = Some(partner.id);
            }
        }
    }

    if let Some(partner_id) = ticket.partner_id {
        let partner = repos
            .partners
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("partner {}", partner_id)))?;
        ticket.partner_name.get_or_insert(partner.name);
        if let Some(email) = partner.email {
            ticket.partner_email.get_or_insert(email);
        }
        if let Some(phone) = partner.phone {
            ticket.partner_phone.get_or_insert(phone);
        }
    }
    Ok(())
}

fn apply_simple_changes(ticket: &mut Ticket, changes: &TicketChanges) {
    if let Some(name) = &changes.name {
        ticket.name = name.trim().to_string();
    }
    if let Some(description) = &changes.description {
        ticket.description = description.clone();
    }
    if let Some(team_id) = changes.team_id {
        ticket.team_id = team_id;
    }
    if let Some(user_id) = changes.user_id {
        ticket.user_id = user_id;
    }
    if let Some(partner_id) = changes.partner_id {
        ticket.partner_id = partner_id;
    }
    if let Some(ticket_type_id) = changes.ticket_type_id {
        ticket.ticket_type_id = ticket_type_id;
    }
    if let Some(tag_ids) = &changes.tag_ids {
        ticket.tag_ids = tag_ids.clone();
    }
    if let Some(priority) = changes.priority {
        ticket.priority = priority;
    }
    if let Some(kanban_state) = changes.kanban_state {
        ticket.kanban_state = kanban_state;
    }
    if let Some(category_id) = changes.category_id {
        ticket.category_id = category_id;
    }
    if let Some(sub_category_id) = changes.sub_category_id {
        ticket.sub_category_id = sub_category_id;
    }
    if let Some(problem_id) = changes.problem_id {
        ticket.problem_id = problem_id;
    }
    if let Some(closed_by_partner) = changes.closed_by_partner {
        ticket.closed_by_partner = closed_by_partner;
    }
}
