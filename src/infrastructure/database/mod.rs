// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供数据库连接、实体定义以及谓词到 SQL 条件的翻译
pub mod connection;
pub mod entities;
pub mod query;
