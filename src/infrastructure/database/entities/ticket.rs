// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "helpdesk_tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub ticket_number: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub partner_name: Option<String>,
    pub partner_email: Option<String>,
    pub partner_phone: Option<String>,
    pub ticket_type_id: Option<Uuid>,
    pub tag_ids: Json,
    pub priority: i32,
    pub stage_id: Option<Uuid>,
    pub kanban_state: String,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
    pub date_last_stage_update: Option<ChronoDateTimeWithTimeZone>,
    pub assign_date: Option<ChronoDateTimeWithTimeZone>,
    pub close_date: Option<ChronoDateTimeWithTimeZone>,
    pub closed_by_partner: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub close_comment: Option<String>,
    pub cm_form: Option<String>,
    pub closed_by_id: Option<Uuid>,
    pub time_to_close_secs: Option<i64>,
    pub sla_deadline: Option<ChronoDateTimeWithTimeZone>,
    pub sla_reached_late: bool,
    #[sea_orm(unique)]
    pub access_token: String,
    pub rating: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rating_feedback: Option<String>,
    pub active: bool,
    pub merged_into_id: Option<Uuid>,
    pub locked: bool,
    pub follower_ids: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
