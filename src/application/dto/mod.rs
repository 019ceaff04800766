// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义应用程序层的数据传输对象
/// 用于在API请求和领域模型之间传输数据
pub mod admin_request;
pub mod sla_request;
pub mod taxonomy_request;
pub mod ticket_request;
pub mod ticket_response;

use serde::{Deserialize, Deserializer};

/// 区分“字段缺失”和“显式 null”
///
/// 与 `#[serde(default)]` 一起使用：缺失为 `None`，`null` 为 `Some(None)`。
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
