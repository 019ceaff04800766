// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::sla_engine::{self, DeadlineInput};
use super::ServiceError;
use crate::config::settings::SlaSettings;
use crate::domain::models::calendar::{ResourceCalendar, WorkingCalendar};
use crate::domain::models::sla::{SlaKey, SlaPolicy, SlaPolicyField, SlaState, SlaStatus};
use crate::domain::models::team::Team;
use crate::domain::models::ticket::{StageTransition, Ticket};
use crate::domain::query::Predicate;
use crate::domain::repositories::unit_of_work::Repositories;
use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 一组共享匹配键的工单及其适用策略
#[derive(Debug, Clone)]
pub struct SlaAssignment {
    pub key: SlaKey,
    pub ticket_ids: Vec<Uuid>,
    pub policies: Vec<SlaPolicy>,
    /// 不考虑阶段序号的匹配条件，用于判断已达成的状态是否仍然适用
    pub trigger: Predicate<SlaPolicyField>,
}

/// SLA 服务
///
/// 负责策略匹配、状态生成与替换、阶段推进时的达成标记、
/// 截止时间重算以及工单汇总字段的刷新。
///
/// 写操作接收调用方传入的 [`Repositories`]，以便与工单写入处于同一事务；
/// 只读操作使用服务自身持有的仓库。
pub struct SlaService {
    repos: Repositories,
    settings: SlaSettings,
}

impl SlaService {
    pub fn new(repos: Repositories, settings: SlaSettings) -> Self {
        Self { repos, settings }
    }

    /// 创建策略
    ///
    /// 目标阶段序号取自阶段本身，冻结阶段必须属于策略所在团队。
    pub async fn create_policy(&self, mut policy: SlaPolicy) -> Result<SlaPolicy, ServiceError> {
        let team = self
            .repos
            .teams
            .find_by_id(policy.team_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("team {}", policy.team_id)))?;
        let stage = self
            .repos
            .teams
            .find_stage(policy.stage_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("stage {}", policy.stage_id)))?;

        policy.stage_sequence = stage.sequence;
        policy.validate(&team.stage_ids)?;
        let created = self.repos.policies.create(&policy).await?;
        info!(policy_id = %created.id, team_id = %created.team_id, "SLA policy created");
        Ok(created)
    }

    /// 查找适用的策略
    ///
    /// 按 (团队, 优先级, 类型, 标签, 客户) 分组，每组只查询一次。
    /// 组内工单的阶段序号取第一张工单的值。
    pub async fn find_applicable(
        &self,
        repos: &Repositories,
        tickets: &[Ticket],
    ) -> Result<Vec<SlaAssignment>, ServiceError> {
        let teams = load_teams(repos, tickets).await?;

        let mut groups: BTreeMap<SlaKey, Vec<&Ticket>> = BTreeMap::new();
        for ticket in tickets {
            let Some(key) = SlaKey::from_ticket(ticket) else {
                continue;
            };
            if teams.get(&key.team_id).is_some_and(|t| t.use_sla) {
                groups.entry(key).or_default().push(ticket);
            }
        }

        let stage_ids: Vec<Uuid> = tickets.iter().filter_map(|t| t.stage_id).collect();
        let sequences: HashMap<Uuid, i32> = repos
            .teams
            .find_stages(&stage_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s.sequence))
            .collect();

        let mut assignments = Vec::with_capacity(groups.len());
        for (key, group) in groups {
            let stage_sequence = group
                .first()
                .and_then(|t| t.stage_id)
                .and_then(|id| sequences.get(&id).copied())
                .unwrap_or(0);
            let partner_scope = match key.partner_id {
                Some(partner_id) => partner_scope(repos, partner_id).await?,
                None => Vec::new(),
            };

            let predicate = key.policy_predicate(stage_sequence, &partner_scope);
            let policies = repos.policies.search(&predicate).await?;
            debug!(
                team_id = %key.team_id,
                tickets = group.len(),
                policies = policies.len(),
                "Matched SLA policies"
            );
            assignments.push(SlaAssignment {
                trigger: key.trigger_predicate(&partner_scope),
                key,
                ticket_ids: group.iter().map(|t| t.id).collect(),
                policies,
            });
        }
        Ok(assignments)
    }

    /// 应用 SLA：删除旧状态并为适用策略生成新状态
    ///
    /// `keep_reached` 为真时，已达成的状态只要其策略的触发条件仍与工单匹配就被保留，
    /// 与工单此后推进到哪个阶段无关。
    pub async fn apply(
        &self,
        repos: &Repositories,
        tickets: &[Ticket],
        keep_reached: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<SlaStatus>, ServiceError> {
        if tickets.is_empty() {
            return Ok(Vec::new());
        }
        let assignments = self.find_applicable(repos, tickets).await?;
        let ticket_ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();

        let triggers: HashMap<Uuid, &Predicate<SlaPolicyField>> = assignments
            .iter()
            .flat_map(|a| a.ticket_ids.iter().map(move |id| (*id, &a.trigger)))
            .collect();

        let existing = repos.statuses.find_by_tickets(&ticket_ids).await?;
        let reached_policies: HashMap<Uuid, SlaPolicy> = if keep_reached {
            let mut ids: Vec<Uuid> = existing
                .iter()
                .filter(|s| s.is_reached())
                .map(|s| s.sla_id)
                .collect();
            ids.sort();
            ids.dedup();
            repos
                .policies
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        } else {
            HashMap::new()
        };

        let mut preserved: HashSet<(Uuid, Uuid)> = HashSet::new();
        let mut obsolete = Vec::new();
        for status in existing {
            let still_applies = triggers
                .get(&status.ticket_id)
                .zip(reached_policies.get(&status.sla_id))
                .is_some_and(|(trigger, policy)| trigger.evaluate(policy));
            if keep_reached && status.is_reached() && still_applies {
                preserved.insert((status.ticket_id, status.sla_id));
            } else {
                obsolete.push(status.id);
            }
        }

        let by_id: HashMap<Uuid, &Ticket> = tickets.iter().map(|t| (t.id, t)).collect();
        let mut generated = Vec::new();
        for assignment in &assignments {
            for ticket_id in &assignment.ticket_ids {
                let Some(ticket) = by_id.get(ticket_id) else {
                    continue;
                };
                for policy in &assignment.policies {
                    if preserved.contains(&(ticket.id, policy.id)) {
                        continue;
                    }
                    let reached = (ticket.stage_id == Some(policy.stage_id)).then_some(now);
                    generated.push(SlaStatus::new(ticket.id, policy, reached));
                }
            }
        }

        repos.statuses.delete_many(&obsolete).await?;
        repos.statuses.create_many(&generated).await?;
        counter!("helpdesk_sla_status_created_total").increment(generated.len() as u64);
        info!(
            tickets = tickets.len(),
            removed = obsolete.len(),
            preserved = preserved.len(),
            created = generated.len(),
            "SLA applied"
        );

        self.recompute_deadlines(repos, tickets, now).await?;
        self.refresh_summaries(repos, &ticket_ids, now).await?;

        let created: HashSet<Uuid> = generated.iter().map(|s| s.id).collect();
        Ok(repos
            .statuses
            .find_by_tickets(&ticket_ids)
            .await?
            .into_iter()
            .filter(|s| created.contains(&s.id))
            .collect())
    }

    /// 工单推进到 `stage_id` 时标记达成
    ///
    /// 工单所在团队中序号不大于目标阶段的所有阶段都视为已到达。
    pub async fn reach(
        &self,
        repos: &Repositories,
        tickets: &[Ticket],
        stage_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError> {
        let stage = repos
            .teams
            .find_stage(stage_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("stage {}", stage_id)))?;

        let mut team_ids: Vec<Uuid> = tickets.iter().filter_map(|t| t.team_id).collect();
        team_ids.sort();
        team_ids.dedup();
        let stage_ids: Vec<Uuid> = repos
            .teams
            .stages_up_to_sequence(&team_ids, stage.sequence)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let ticket_ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();
        let reached = if stage_ids.is_empty() {
            0
        } else {
            repos
                .statuses
                .mark_reached(&ticket_ids, &stage_ids, now)
                .await?
        };
        counter!("helpdesk_sla_reached_total").increment(reached);
        debug!(stage_id = %stage_id, sequence = stage.sequence, reached, "SLA reach propagated");

        self.recompute_deadlines(repos, tickets, now).await?;
        self.refresh_summaries(repos, &ticket_ids, now).await?;
        Ok(reached)
    }

    /// 重新计算截止时间和超期天数
    pub async fn recompute_deadlines(
        &self,
        repos: &Repositories,
        tickets: &[Ticket],
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let ticket_ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();
        let statuses = repos.statuses.find_by_tickets(&ticket_ids).await?;
        if statuses.is_empty() {
            return Ok(());
        }

        let mut policy_ids: Vec<Uuid> = statuses.iter().map(|s| s.sla_id).collect();
        policy_ids.sort();
        policy_ids.dedup();
        let policies: HashMap<Uuid, SlaPolicy> = repos
            .policies
            .find_by_ids(&policy_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let calendars = load_calendars(repos, tickets).await?;
        let by_id: HashMap<Uuid, &Ticket> = tickets.iter().map(|t| (t.id, t)).collect();
        let mut transitions: HashMap<Uuid, Vec<StageTransition>> = HashMap::new();

        for status in statuses {
            let (Some(ticket), Some(policy)) =
                (by_id.get(&status.ticket_id), policies.get(&status.sla_id))
            else {
                continue;
            };
            let calendar: Option<&dyn WorkingCalendar> = ticket
                .team_id
                .and_then(|team_id| calendars.get(&team_id))
                .map(|c| c as &dyn WorkingCalendar);

            let mut deadline = status.deadline;
            if sla_engine::needs_recompute(&status, policy, now) {
                if calendar.is_none() {
                    debug!(ticket_id = %ticket.id, "No working calendar, deadline falls back to creation time");
                }
                if policy.has_frozen_stages() && !transitions.contains_key(&ticket.id) {
                    let log = repos.tracking.find_by_ticket(ticket.id).await?;
                    transitions.insert(ticket.id, log);
                }
                let log = transitions.get(&ticket.id).map(Vec::as_slice).unwrap_or(&[]);
                deadline = sla_engine::compute_deadline(&DeadlineInput {
                    created_at: ticket.created_at,
                    policy,
                    calendar,
                    current_stage_id: ticket.stage_id,
                    transitions: log,
                    now,
                    default_hours_per_day: self.settings.default_hours_per_day,
                });
            }

            let mut updated = status.clone();
            updated.deadline = deadline;
            let exceeded = sla_engine::exceeded_days(&updated, calendar);
            if deadline != status.deadline || exceeded != status.exceeded_days {
                repos
                    .statuses
                    .update_deadline(status.id, deadline, exceeded)
                    .await?;
            }
        }
        Ok(())
    }

    /// 刷新工单上存储的 SLA 汇总字段
    pub async fn refresh_summaries(
        &self,
        repos: &Repositories,
        ticket_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        if ticket_ids.is_empty() {
            return Ok(());
        }
        let statuses = repos.statuses.find_by_tickets(ticket_ids).await?;
        let late = repos.statuses.count_late_by_ticket(ticket_ids, now).await?;

        let mut by_ticket: HashMap<Uuid, Vec<&SlaStatus>> = HashMap::new();
        for status in &statuses {
            by_ticket.entry(status.ticket_id).or_default().push(status);
        }

        for ticket_id in ticket_ids {
            let deadline = by_ticket
                .get(ticket_id)
                .and_then(|s| sla_engine::earliest_open_deadline(s.iter().copied()));
            let reached_late = late.get(ticket_id).copied().unwrap_or(0) > 0;
            repos
                .tickets
                .update_sla_summary(*ticket_id, deadline, reached_late)
                .await?;
        }
        Ok(())
    }

    /// 工单的全部 SLA 状态
    pub async fn statuses_for_ticket(&self, ticket_id: Uuid) -> Result<Vec<SlaStatus>, ServiceError> {
        Ok(self.repos.statuses.find_by_tickets(&[ticket_id]).await?)
    }

    /// 一批工单的 SLA 状态
    pub async fn statuses_for_tickets(&self, ticket_ids: &[Uuid]) -> Result<Vec<SlaStatus>, ServiceError> {
        Ok(self.repos.statuses.find_by_tickets(ticket_ids).await?)
    }

    /// 按派生状态搜索 SLA 状态
    pub async fn search_statuses(
        &self,
        states: &[SlaState],
        negate: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<SlaStatus>, ServiceError> {
        let predicate = SlaState::search_predicate(states, negate, now);
        Ok(self.repos.statuses.search(&predicate).await?)
    }
}

async fn load_teams(
    repos: &Repositories,
    tickets: &[Ticket],
) -> Result<HashMap<Uuid, Team>, ServiceError> {
    let mut team_ids: Vec<Uuid> = tickets.iter().filter_map(|t| t.team_id).collect();
    team_ids.sort();
    team_ids.dedup();
    Ok(repos
        .teams
        .find_by_ids(&team_ids)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect())
}

/// 按团队加载工作日历
async fn load_calendars(
    repos: &Repositories,
    tickets: &[Ticket],
) -> Result<HashMap<Uuid, ResourceCalendar>, ServiceError> {
    let mut calendars = HashMap::new();
    for team in load_teams(repos, tickets).await?.into_values() {
        let Some(calendar_id) = team.calendar_id else {
            continue;
        };
        match repos.calendars.find_by_id(calendar_id).await? {
            Some(calendar) => {
                calendars.insert(team.id, calendar);
            }
            None => warn!(
                team_id = %team.id,
                calendar_id = %calendar_id,
                "Team references a missing working calendar"
            ),
        }
    }
    Ok(calendars)
}

/// 客户本身及其上下级
async fn partner_scope(repos: &Repositories, partner_id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
    let mut scope = repos.partners.ancestors(partner_id).await?;
    scope.extend(repos.partners.descendants(partner_id).await?);
    scope.sort();
    scope.dedup();
    Ok(scope)
}
