// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "helpdesk_sla_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub sla_id: Uuid,
    pub sla_stage_id: Uuid,
    pub deadline: Option<ChronoDateTimeWithTimeZone>,
    pub reached_datetime: Option<ChronoDateTimeWithTimeZone>,
    #[sea_orm(column_type = "Double", nullable)]
    pub exceeded_days: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
