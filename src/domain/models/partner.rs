// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static FORMATTED_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"?([^"<>]*?)"?\s*<\s*([^<>\s]+@[^<>\s]+)\s*>\s*$"#)
        .expect("valid formatted email regex")
});

/// 客户（联系人或公司）
///
/// 客户之间通过 `parent_id` 组成层级，最顶层为商业实体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl Partner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            phone: None,
            parent_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// 解析 `"Name <email>"` 格式的地址
///
/// 返回 `(名称, 邮箱)`；输入只有邮箱时名称为 `None`。
pub fn parse_name_and_email(input: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = FORMATTED_EMAIL.captures(input) {
        let name = caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|n| !n.is_empty());
        let email = caps.get(2).map(|m| m.as_str().to_lowercase());
        return (name, email);
    }
    let trimmed = input.trim();
    if trimmed.contains('@') && !trimmed.contains(char::is_whitespace) {
        (None, Some(trimmed.to_lowercase()))
    } else if trimmed.is_empty() {
        (None, None)
    } else {
        (Some(trimmed.to_string()), None)
    }
}
