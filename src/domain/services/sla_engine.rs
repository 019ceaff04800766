// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! SLA 计算规则
//!
//! 这里的函数都是纯函数：输入工单、策略、日历和当前时间，输出截止时间、
//! 状态或汇总值。持久化和触发时机由 [`super::sla_service::SlaService`] 负责。

use crate::domain::models::calendar::{WorkingCalendar, DEFAULT_HOURS_PER_DAY};
use crate::domain::models::sla::{SlaPolicy, SlaState, SlaStatus};
use crate::domain::models::ticket::StageTransition;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use tracing::warn;
use uuid::Uuid;

/// 计算截止时间所需的输入
pub struct DeadlineInput<'a> {
    /// 工单创建时间
    pub created_at: DateTime<Utc>,
    pub policy: &'a SlaPolicy,
    /// 团队的工作日历
    pub calendar: Option<&'a dyn WorkingCalendar>,
    /// 工单当前阶段
    pub current_stage_id: Option<Uuid>,
    /// 按时间升序排列的阶段变化记录
    pub transitions: &'a [StageTransition],
    pub now: DateTime<Utc>,
    /// 日历未声明工时时使用的每日工时
    pub default_hours_per_day: f64,
}

/// 计算 SLA 截止时间
///
/// 返回 `None` 表示工单正停留在冻结阶段，截止时间暂不确定。
pub fn compute_deadline(input: &DeadlineInput<'_>) -> Option<DateTime<Utc>> {
    let Some(calendar) = input.calendar else {
        return Some(input.created_at);
    };
    if input.policy.freezes(input.current_stage_id) {
        return None;
    }

    let hours_per_day = calendar
        .hours_per_day()
        .or(Some(input.default_hours_per_day))
        .filter(|h| *h > 0.0)
        .unwrap_or(DEFAULT_HOURS_PER_DAY);
    let budget = input.policy.time_hours.max(0.0);
    let days = (budget / hours_per_day).floor();
    let mut remainder = budget - days * hours_per_day;

    let mut deadline = input.created_at;
    if days > 0.0 {
        match calendar.advance_by_working_days(days as u32 + 1, input.created_at) {
            Some(planned) => {
                let opening = calendar
                    .advance_by_working_hours(0.0, input.created_at, true)
                    .unwrap_or(input.created_at);
                deadline = with_time_of(planned, opening);
            }
            None => warn!(
                policy_id = %input.policy.id,
                "Working calendar has no working days ahead, keeping creation time"
            ),
        }
    }

    if input.policy.has_frozen_stages() {
        remainder += frozen_hours(
            calendar,
            input.policy,
            input.created_at,
            input.transitions,
            input.now,
        );
    }

    match calendar.advance_by_working_hours(remainder, deadline, true) {
        Some(advanced) => deadline = advanced,
        None => warn!(
            policy_id = %input.policy.id,
            "Working calendar has no working hours ahead, keeping planned day"
        ),
    }

    Some(normalize_to_previous_close(
        calendar,
        deadline,
        input.created_at,
    ))
}

/// 在冻结阶段中消耗的工作小时
pub fn frozen_hours(
    calendar: &dyn WorkingCalendar,
    policy: &SlaPolicy,
    created_at: DateTime<Utc>,
    transitions: &[StageTransition],
    now: DateTime<Utc>,
) -> f64 {
    let mut hours = 0.0;
    let mut entered_at = created_at;
    for transition in transitions {
        if policy.freezes(transition.old_stage_id) {
            hours += calendar.working_hours_between(entered_at, transition.changed_at);
        }
        entered_at = transition.changed_at;
    }
    if let Some(last) = transitions.last() {
        if policy.freezes(last.new_stage_id) {
            hours += calendar.working_hours_between(last.changed_at, now);
        }
    }
    hours
}

/// 截止时间落在工作区间起点、且与上一个区间终点之间没有工作时间时，
/// 取较早的区间终点。两者对应相同的已消耗工时。
fn normalize_to_previous_close(
    calendar: &dyn WorkingCalendar,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> DateTime<Utc> {
    match calendar.last_working_instant(deadline) {
        Some(previous) if previous < deadline && previous >= created_at => previous,
        _ => deadline,
    }
}

fn with_time_of(day: DateTime<Utc>, time: DateTime<Utc>) -> DateTime<Utc> {
    let time: NaiveTime = time.time();
    Utc.from_utc_datetime(&day.date_naive().and_time(time))
}

/// 是否需要重新计算截止时间
///
/// 以下情况跳过：已有截止时间且已达成；策略没有冻结阶段且已有截止时间；状态已失败。
pub fn needs_recompute(status: &SlaStatus, policy: &SlaPolicy, now: DateTime<Utc>) -> bool {
    let settled = status.deadline.is_some() && status.is_reached();
    let fixed = status.deadline.is_some() && !policy.has_frozen_stages();
    let failed = status.state(now) == SlaState::Failed;
    !(settled || fixed || failed)
}

/// 达成时间相对截止时间的工作日偏差
pub fn exceeded_days(
    status: &SlaStatus,
    calendar: Option<&dyn WorkingCalendar>,
) -> Option<f64> {
    let (deadline, reached) = (status.deadline?, status.reached_datetime?);
    calendar.map(|c| c.working_days_between(deadline, reached))
}

/// 未达成状态中最早的截止时间
pub fn earliest_open_deadline<'a>(
    statuses: impl IntoIterator<Item = &'a SlaStatus>,
) -> Option<DateTime<Utc>> {
    statuses
        .into_iter()
        .filter(|s| !s.is_reached())
        .filter_map(|s| s.deadline)
        .min()
}

/// 是否存在逾期状态
pub fn any_late<'a>(statuses: impl IntoIterator<Item = &'a SlaStatus>, now: DateTime<Utc>) -> bool {
    statuses.into_iter().any(|s| s.is_late(now))
}
