// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequestDto {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketTypeRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default = "default_type_sequence")]
    pub sequence: i32,
}

fn default_type_sequence() -> i32 {
    10
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0, max = 11))]
    pub color: Option<i32>,
}

/// 子分类和问题共用：`parent_id` 分别是分类和子分类
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChildRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub parent_id: Uuid,
}
