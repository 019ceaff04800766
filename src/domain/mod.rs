// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含帮助台的核心业务逻辑，包括：
/// - 领域模型（models）：工单、团队、日历、SLA 策略与状态
/// - 查询（query）：可在内存中求值并翻译为 SQL 的类型化谓词
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：SLA 引擎和工单生命周期
///
/// 领域层不依赖于任何外部实现。
pub mod models;
pub mod query;
pub mod repositories;
pub mod services;
