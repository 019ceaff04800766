// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "helpdesk_slas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub team_id: Uuid,
    pub priority: i32,
    pub ticket_type_id: Option<Uuid>,
    pub tag_ids: Json,
    pub stage_id: Uuid,
    pub stage_sequence: i32,
    #[sea_orm(column_type = "Double")]
    pub time_hours: f64,
    pub exclude_stage_ids: Json,
    pub partner_ids: Json,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
