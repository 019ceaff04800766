// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, TimeZone, Utc};
use helpdeskrs::config::settings::{DatabaseSettings, HelpdeskSettings, SlaSettings};
use helpdeskrs::domain::models::calendar::ResourceCalendar;
use helpdeskrs::domain::models::sla::SlaPolicy;
use helpdeskrs::domain::models::team::{AssignMethod, Stage, Team};
use helpdeskrs::domain::models::ticket::{NewTicket, Ticket};
use helpdeskrs::domain::services::Clock;
use helpdeskrs::infrastructure::database::connection;
use helpdeskrs::presentation::routes::AppServices;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 2025 年 3 月的某一时刻，3 日是周一
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

/// 可以手动拨动的时钟
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }

    #[allow(dead_code)]
    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct TestContext {
    #[allow(dead_code)]
    pub db: Arc<DatabaseConnection>,
    pub clock: Arc<FixedClock>,
    pub services: AppServices,
}

pub async fn create_test_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: None,
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub async fn create_test_context() -> TestContext {
    let db = create_test_db().await;
    let clock = Arc::new(FixedClock::new(at(3, 9, 0)));
    let services = AppServices::new(
        db.clone(),
        clock.clone(),
        SlaSettings::default(),
        HelpdeskSettings::default(),
        None,
    );
    TestContext {
        db,
        clock,
        services,
    }
}

/// 带日历、四个阶段和一名成员的支持团队
pub struct SupportDesk {
    pub team: Team,
    pub agent: Uuid,
    pub new: Stage,
    pub waiting: Stage,
    pub progress: Stage,
    pub solved: Stage,
}

pub async fn seed_support_desk(ctx: &TestContext) -> SupportDesk {
    let teams = &ctx.services.teams;
    let calendar = teams
        .create_calendar(ResourceCalendar::standard_week("Office", 9.0, 17.0))
        .await
        .unwrap();

    let new = teams.create_stage(Stage::new("New", 1), &[]).await.unwrap();
    let waiting = teams
        .create_stage(Stage::new("Waiting", 2), &[])
        .await
        .unwrap();
    let progress = teams
        .create_stage(Stage::new("In Progress", 3), &[])
        .await
        .unwrap();
    let solved = teams
        .create_stage(Stage::new("Solved", 4).closing(), &[])
        .await
        .unwrap();

    let agent = Uuid::new_v4();
    let mut team = Team::new("Support");
    team.calendar_id = Some(calendar.id);
    team.assign_method = AssignMethod::Randomly;
    team.member_ids = vec![agent];
    team.stage_ids = vec![new.id, waiting.id, progress.id, solved.id];
    let team = teams.create_team(team).await.unwrap();

    SupportDesk {
        team,
        agent,
        new,
        waiting,
        progress,
        solved,
    }
}

/// 在团队上创建一条 SLA 策略
pub async fn seed_policy(
    ctx: &TestContext,
    desk: &SupportDesk,
    stage: &Stage,
    hours: f64,
    customize: impl FnOnce(&mut SlaPolicy),
) -> SlaPolicy {
    let mut policy = SlaPolicy::new(
        format!("{} within {}h", stage.name, hours),
        desk.team.id,
        stage.id,
        0,
        hours,
    );
    customize(&mut policy);
    ctx.services.sla.create_policy(policy).await.unwrap()
}

pub async fn open_ticket(
    ctx: &TestContext,
    desk: &SupportDesk,
    customize: impl FnOnce(&mut NewTicket),
) -> Ticket {
    let mut new = NewTicket {
        name: "Printer on fire".to_string(),
        team_id: Some(desk.team.id),
        ..Default::default()
    };
    customize(&mut new);
    ctx.services.tickets.create_ticket(new).await.unwrap()
}
