// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 定义数据库表对应的实体结构
/// 使用SeaORM框架进行对象关系映射
/// 包含所有业务实体的数据库表示
pub mod category;
pub mod partner;
pub mod problem;
pub mod resource_calendar;
pub mod sequence;
pub mod sla;
pub mod sla_status;
pub mod stage;
pub mod stage_tracking;
pub mod sub_category;
pub mod tag;
pub mod team;
pub mod team_stage;
pub mod ticket;
pub mod ticket_message;
pub mod ticket_type;
