// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 领域仓库和服务接口的具体实现：
/// - 数据库（database）：连接池、实体映射和谓词到 SQL 的翻译
/// - 指标（metrics）：Prometheus 导出器
/// - 仓库实现（repositories）
/// - 服务实现（services）：推送通知网关客户端
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod services;
