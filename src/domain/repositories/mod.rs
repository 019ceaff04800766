// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 工单仓库（ticket_repository）：工单及其 SLA 汇总字段
/// - SLA 仓库（sla_repository）：SLA 策略与 SLA 状态
/// - 团队仓库（team_repository）：团队、阶段和工作日历
/// - 客户仓库（partner_repository）：客户及其层级
/// - 阶段记录仓库（stage_tracking_repository）：阶段变化日志
/// - 留言仓库（message_repository）：工单留言
/// - 分类仓库（taxonomy_repository）：标签、类型和三级分类
/// - 事务（unit_of_work）：让一次工单写入中的所有仓库共享同一个事务
pub mod message_repository;
pub mod partner_repository;
pub mod sla_repository;
pub mod stage_tracking_repository;
pub mod taxonomy_repository;
pub mod team_repository;
pub mod ticket_repository;
pub mod unit_of_work;
