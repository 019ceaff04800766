// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{HelpdeskSettings, SlaSettings};
use crate::domain::services::notification_service::NotificationService;
use crate::domain::services::sla_service::SlaService;
use crate::domain::services::taxonomy_service::TaxonomyService;
use crate::domain::services::team_service::TeamService;
use crate::domain::services::ticket_service::TicketService;
use crate::domain::services::Clock;
use crate::infrastructure::repositories::taxonomy_repo_impl::TaxonomyRepositoryImpl;
use crate::infrastructure::repositories::unit_of_work_impl::{
    repositories, SeaOrmUnitOfWorkFactory,
};
use crate::presentation::handlers::{
    admin_handler, portal_handler, sla_handler, taxonomy_handler, ticket_handler,
};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 处理器依赖的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub tickets: Arc<TicketService>,
    pub sla: Arc<SlaService>,
    pub teams: Arc<TeamService>,
    pub taxonomy: Arc<TaxonomyService>,
}

impl AppServices {
    /// 在同一个数据库连接上组装仓库和服务
    pub fn new(
        db: Arc<DatabaseConnection>,
        clock: Arc<dyn Clock>,
        sla_settings: SlaSettings,
        helpdesk_settings: HelpdeskSettings,
        notifier: Option<Arc<dyn NotificationService>>,
    ) -> Self {
        let repos = repositories(db.clone());
        let sla = Arc::new(SlaService::new(repos.clone(), sla_settings));

        let mut tickets = TicketService::new(
            repos.clone(),
            Arc::new(SeaOrmUnitOfWorkFactory::new(db.clone())),
            sla.clone(),
            clock,
            helpdesk_settings,
        );
        if let Some(notifier) = notifier {
            tickets = tickets.with_notifier(notifier);
        }

        Self {
            tickets: Arc::new(tickets),
            sla,
            teams: Arc::new(TeamService::new(repos.teams, repos.calendars)),
            taxonomy: Arc::new(TaxonomyService::new(Arc::new(TaxonomyRepositoryImpl::new(db)))),
        }
    }
}

/// 创建应用路由
///
/// 服务通过 `Extension` 注入，见 [`app`]
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let ticket_routes = Router::new()
        .route(
            "/v1/tickets",
            post(ticket_handler::create_ticket).get(ticket_handler::list_tickets),
        )
        .route(
            "/v1/tickets/{id}",
            get(ticket_handler::get_ticket).patch(ticket_handler::update_ticket),
        )
        .route("/v1/tickets/{id}/close", post(ticket_handler::close_ticket))
        .route("/v1/tickets/{id}/assign", post(ticket_handler::assign_ticket))
        .route("/v1/tickets/{id}/merge", post(ticket_handler::merge_ticket))
        .route(
            "/v1/tickets/{id}/messages",
            get(ticket_handler::list_messages).post(ticket_handler::post_message),
        )
        .route("/v1/tickets/{id}/sla", get(ticket_handler::ticket_sla_statuses));

    let portal_routes = Router::new()
        .route("/v1/portal/tickets/{id}", get(portal_handler::get_ticket))
        .route(
            "/v1/portal/tickets/{id}/messages",
            post(portal_handler::post_message),
        )
        .route(
            "/v1/portal/tickets/{id}/rating",
            post(portal_handler::rate_ticket),
        )
        .route(
            "/v1/portal/tickets/{id}/close",
            post(portal_handler::close_ticket),
        );

    let sla_routes = Router::new()
        .route("/v1/sla/policies", post(sla_handler::create_policy))
        .route("/v1/sla/statuses", get(sla_handler::search_statuses));

    let admin_routes = Router::new()
        .route("/v1/teams", post(admin_handler::create_team))
        .route("/v1/teams/{id}", get(admin_handler::get_team))
        .route("/v1/teams/{id}/stages", get(admin_handler::list_team_stages))
        .route("/v1/stages", post(admin_handler::create_stage))
        .route("/v1/calendars", post(admin_handler::create_calendar))
        .route("/v1/partners", post(admin_handler::create_partner))
        .route(
            "/v1/tags",
            post(taxonomy_handler::create_tag).get(taxonomy_handler::list_tags),
        )
        .route("/v1/ticket-types", post(taxonomy_handler::create_ticket_type))
        .route("/v1/categories", post(taxonomy_handler::create_category))
        .route(
            "/v1/categories/{id}/sub-categories",
            get(taxonomy_handler::list_sub_categories),
        )
        .route(
            "/v1/sub-categories",
            post(taxonomy_handler::create_sub_category),
        )
        .route(
            "/v1/sub-categories/{id}/problems",
            get(taxonomy_handler::list_problems),
        )
        .route("/v1/problems", post(taxonomy_handler::create_problem));

    Router::new()
        .merge(public_routes)
        .merge(ticket_routes)
        .merge(portal_routes)
        .merge(sla_routes)
        .merge(admin_routes)
}

/// 组装完整的应用
pub fn app(services: AppServices) -> Router {
    routes()
        .layer(Extension(services.tickets))
        .layer(Extension(services.sla))
        .layer(Extension(services.teams))
        .layer(Extension(services.taxonomy))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
