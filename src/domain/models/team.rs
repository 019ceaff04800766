// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 帮助台团队
///
/// 团队拥有自己的阶段流程、成员和可选的工作日历。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// 是否启用 SLA
    pub use_sla: bool,
    /// 计算截止时间所用的工作日历
    pub calendar_id: Option<Uuid>,
    pub assign_method: AssignMethod,
    pub member_ids: Vec<Uuid>,
    /// 团队使用的阶段（由仓库加载）
    pub stage_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            use_sla: true,
            calendar_id: None,
            assign_method: AssignMethod::Manual,
            member_ids: Vec::new(),
            stage_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// 团队中序号最小的阶段
    pub fn default_stage<'a>(&self, stages: &'a [Stage]) -> Option<&'a Stage> {
        stages
            .iter()
            .filter(|s| self.stage_ids.contains(&s.id))
            .min_by_key(|s| (s.sequence, s.id))
    }

    /// 团队中序号最小的关闭阶段
    pub fn closing_stage<'a>(&self, stages: &'a [Stage]) -> Option<&'a Stage> {
        stages
            .iter()
            .filter(|s| s.is_close && self.stage_ids.contains(&s.id))
            .min_by_key(|s| (s.sequence, s.id))
    }

    /// 按分配方式挑选处理人
    pub fn pick_assignee<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Uuid> {
        match self.assign_method {
            AssignMethod::Manual => None,
            AssignMethod::Randomly => self.member_ids.choose(rng).copied(),
        }
    }
}

/// 处理人分配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignMethod {
    #[default]
    Manual,
    Randomly,
}

impl fmt::Display for AssignMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignMethod::Manual => write!(f, "manual"),
            AssignMethod::Randomly => write!(f, "randomly"),
        }
    }
}

impl FromStr for AssignMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AssignMethod::Manual),
            "randomly" => Ok(AssignMethod::Randomly),
            _ => Err(()),
        }
    }
}

/// 工单阶段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,
    pub name: String,
    /// 阶段顺序，数值越小越靠前
    pub sequence: i32,
    /// 是否为关闭阶段
    pub is_close: bool,
    /// 看板中是否默认折叠
    pub fold: bool,
}

impl Stage {
    pub fn new(name: impl Into<String>, sequence: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sequence,
            is_close: false,
            fold: false,
        }
    }

    pub fn closing(mut self) -> Self {
        self.is_close = true;
        self.fold = true;
        self
    }
}
