// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// 每个工作日的默认工时
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// 每次展开工作区间的窗口长度（天）
const PLANNING_WINDOW_DAYS: i64 = 14;
/// 规划时最多展开的窗口数，约等于四年
const PLANNING_MAX_WINDOWS: i64 = 100;

type Interval = (DateTime<Utc>, DateTime<Utc>);

/// 工作日历抽象
///
/// SLA 引擎只通过此接口推算时间，不关心日历的具体存储方式。
/// 所有时间都以 UTC 计算。
pub trait WorkingCalendar: Send + Sync {
    /// 日历声明的每日平均工时
    fn hours_per_day(&self) -> Option<f64>;

    /// 从 `from` 开始向后数 `days` 个不同的工作日，
    /// 返回第 `days` 个工作日中第一个工作区间的结束时刻
    fn advance_by_working_days(&self, days: u32, from: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// 从 `from` 开始消耗 `hours` 个工作小时后的时刻
    ///
    /// `hours` 为 0 时返回 `from` 当时或之后的第一个工作时刻。
    /// `skip_non_working` 为 false 时按自然时间相加。
    fn advance_by_working_hours(
        &self,
        hours: f64,
        from: DateTime<Utc>,
        skip_non_working: bool,
    ) -> Option<DateTime<Utc>>;

    /// `[from, to)` 之间的工作小时数，`to <= from` 时为 0
    fn working_hours_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64;

    /// `from` 到 `to` 之间的工作日数（可为小数，`to < from` 时为负）
    fn working_days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64;

    /// `at` 当时或之前最后一个仍处于工作时间的时刻
    ///
    /// `at` 位于工作区间内部时返回 `at` 本身；
    /// 位于非工作时间（或恰好在区间起点）时返回前一个工作区间的结束时刻。
    fn last_working_instant(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// 每周固定的工作时段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// 星期几
    pub weekday: Weekday,
    /// 开始时刻（小时，允许小数，如 8.5 表示 08:30）
    pub hour_from: f64,
    /// 结束时刻（小时）
    pub hour_to: f64,
}

/// 停工时段（假期、临时关闭等）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leave {
    #[serde(default)]
    pub name: Option<String>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
}

/// 资源日历
///
/// 由每周工作时段和停工时段组成，是 [`WorkingCalendar`] 的默认实现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCalendar {
    pub id: Uuid,
    pub name: String,
    /// 每日平均工时，未设置时由工作时段推算
    pub hours_per_day: Option<f64>,
    pub attendances: Vec<Attendance>,
    pub leaves: Vec<Leave>,
}

impl ResourceCalendar {
    /// 创建一个没有任何工作时段的日历
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hours_per_day: None,
            attendances: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// 周一到周五每天 `hour_from` 至 `hour_to` 工作的日历
    pub fn standard_week(name: impl Into<String>, hour_from: f64, hour_to: f64) -> Self {
        let mut calendar = Self::new(name);
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            calendar = calendar.with_attendance(weekday, hour_from, hour_to);
        }
        calendar
    }

    pub fn with_attendance(mut self, weekday: Weekday, hour_from: f64, hour_to: f64) -> Self {
        self.attendances.push(Attendance {
            weekday,
            hour_from,
            hour_to,
        });
        self
    }

    pub fn with_leave(mut self, date_from: DateTime<Utc>, date_to: DateTime<Utc>) -> Self {
        self.leaves.push(Leave {
            name: None,
            date_from,
            date_to,
        });
        self
    }

    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = Some(hours);
        self
    }

    /// 日历是否至少有一个有效的工作时段
    pub fn has_working_time(&self) -> bool {
        self.attendances.iter().any(|a| a.hour_to > a.hour_from)
    }

    /// 按工作时段展开 `[from, to)` 内的区间，不扣除停工时段
    fn attendance_intervals(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Interval> {
        let mut intervals = Vec::new();
        if to <= from {
            return intervals;
        }

        let last = to.date_naive();
        let mut day = from.date_naive();
        while day <= last {
            let mut todays: Vec<&Attendance> = self
                .attendances
                .iter()
                .filter(|a| a.weekday == day.weekday() && a.hour_to > a.hour_from)
                .collect();
            todays.sort_by(|a, b| a.hour_from.total_cmp(&b.hour_from));

            for attendance in todays {
                let start = at_hour(day, attendance.hour_from).max(from);
                let end = at_hour(day, attendance.hour_to).min(to);
                if start < end {
                    intervals.push((start, end));
                }
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        intervals
    }

    /// `[from, to)` 内扣除停工时段后的工作区间，按时间排序
    pub fn work_intervals(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Interval> {
        let mut intervals = self.attendance_intervals(from, to);
        for leave in &self.leaves {
            intervals = intervals
                .into_iter()
                .flat_map(|(start, end)| {
                    let mut parts = Vec::with_capacity(2);
                    if leave.date_to <= start || leave.date_from >= end {
                        parts.push((start, end));
                    } else {
                        if leave.date_from > start {
                            parts.push((start, leave.date_from));
                        }
                        if leave.date_to < end {
                            parts.push((leave.date_to, end));
                        }
                    }
                    parts
                })
                .collect();
        }
        intervals
    }

    /// 按窗口向后展开工作区间，直到回调返回结果
    fn scan_forward<T>(
        &self,
        from: DateTime<Utc>,
        mut visit: impl FnMut(Interval) -> Option<T>,
    ) -> Option<T> {
        for window in 0..PLANNING_MAX_WINDOWS {
            let window_start = from + Duration::days(PLANNING_WINDOW_DAYS * window);
            let window_end = window_start + Duration::days(PLANNING_WINDOW_DAYS);
            for interval in self.work_intervals(window_start, window_end) {
                if let Some(found) = visit(interval) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// 某一天按工作时段计算的满勤工时（秒），不扣除停工
    fn attendance_seconds_on(&self, day: NaiveDate) -> i64 {
        let start = at_hour(day, 0.0);
        let end = start + Duration::days(1);
        self.attendance_intervals(start, end)
            .iter()
            .map(|(s, e)| (*e - *s).num_seconds())
            .sum()
    }
}

impl WorkingCalendar for ResourceCalendar {
    fn hours_per_day(&self) -> Option<f64> {
        if let Some(hours) = self.hours_per_day.filter(|h| *h > 0.0) {
            return Some(hours);
        }
        // derive from the weekly pattern: total hours over distinct working weekdays
        let days: BTreeSet<u32> = self
            .attendances
            .iter()
            .filter(|a| a.hour_to > a.hour_from)
            .map(|a| a.weekday.num_days_from_monday())
            .collect();
        if days.is_empty() {
            return None;
        }
        let total: f64 = self
            .attendances
            .iter()
            .filter(|a| a.hour_to > a.hour_from)
            .map(|a| a.hour_to - a.hour_from)
            .sum();
        Some(total / days.len() as f64)
    }

    fn advance_by_working_days(&self, days: u32, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if days == 0 {
            return Some(from);
        }
        let mut seen = BTreeSet::new();
        self.scan_forward(from, |(start, end)| {
            seen.insert(start.date_naive());
            (seen.len() >= days as usize).then_some(end)
        })
    }

    fn advance_by_working_hours(
        &self,
        hours: f64,
        from: DateTime<Utc>,
        skip_non_working: bool,
    ) -> Option<DateTime<Utc>> {
        if !hours.is_finite() || hours < 0.0 {
            return None;
        }
        let mut remaining = hours_to_duration(hours);
        if !skip_non_working {
            return Some(from + remaining);
        }
        self.scan_forward(from, |(start, end)| {
            let length = end - start;
            if remaining <= length {
                Some(start + remaining)
            } else {
                remaining -= length;
                None
            }
        })
    }

    fn working_hours_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
        let seconds: i64 = self
            .work_intervals(from, to)
            .iter()
            .map(|(s, e)| (*e - *s).num_seconds())
            .sum();
        seconds as f64 / 3600.0
    }

    fn working_days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
        if to < from {
            return -self.working_days_between(to, from);
        }

        let mut worked: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for (start, end) in self.work_intervals(from, to) {
            *worked.entry(start.date_naive()).or_default() += (end - start).num_seconds();
        }

        let days: f64 = worked
            .into_iter()
            .filter_map(|(day, seconds)| {
                let full = self.attendance_seconds_on(day);
                (full > 0).then(|| seconds as f64 / full as f64)
            })
            .sum();
        (days * 1000.0).round() / 1000.0
    }

    fn last_working_instant(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        for window in 0..PLANNING_MAX_WINDOWS {
            let window_end = at - Duration::days(PLANNING_WINDOW_DAYS * window);
            let window_start = window_end - Duration::days(PLANNING_WINDOW_DAYS);
            if let Some((_, end)) = self.work_intervals(window_start, window_end).last() {
                return Some(*end);
            }
        }
        None
    }
}

fn at_hour(day: NaiveDate, hour: f64) -> DateTime<Utc> {
    let seconds = (hour.clamp(0.0, 24.0) * 3600.0).round() as i64;
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)) + Duration::seconds(seconds)
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}
