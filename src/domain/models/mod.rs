// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了帮助台的核心业务实体，包括：
/// - 工作日历（calendar）：工作时段、停工时段和工时推算
/// - 工单（ticket）：客户请求及其生命周期数据
/// - SLA（sla）：策略、状态及其派生规则
/// - 团队（team）：团队、阶段和分配方式
/// - 客户（partner）：客户层级
/// - 分类（taxonomy）：标签、类型、分类、子分类和问题
/// - 能力接口（capabilities）：留言、评分和门户访问
pub mod calendar;
pub mod capabilities;
pub mod partner;
pub mod sla;
pub mod taxonomy;
pub mod team;
pub mod ticket;
