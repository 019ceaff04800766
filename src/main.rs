// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use helpdeskrs::config::settings::Settings;
use helpdeskrs::domain::services::notification_service::NotificationService;
use helpdeskrs::domain::services::SystemClock;
use helpdeskrs::infrastructure::database::connection;
use helpdeskrs::infrastructure::services::push_notification_service_impl::PushNotificationServiceImpl;
use helpdeskrs::presentation::routes::{self, AppServices};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use helpdeskrs::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(settings.server.log_json);
    info!("Starting helpdeskrs...");

    if settings.metrics.enabled {
        helpdeskrs::infrastructure::metrics::init_metrics(&settings.metrics);
    }

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Push notifications
    let notifier: Option<Arc<dyn NotificationService>> = match (
        settings.notifications.enabled,
        settings.notifications.endpoint.clone(),
    ) {
        (true, Some(endpoint)) => {
            info!(%endpoint, "Push notifications enabled");
            Some(Arc::new(PushNotificationServiceImpl::new(
                endpoint,
                settings.notifications.secret.clone(),
                Duration::from_secs(settings.notifications.timeout_secs),
            )))
        }
        (true, None) => {
            warn!("Push notifications enabled without an endpoint, skipping");
            None
        }
        (false, _) => None,
    };

    // 5. Services
    let services = AppServices::new(
        db,
        Arc::new(SystemClock),
        settings.sla.clone(),
        settings.helpdesk.clone(),
        notifier,
    );

    // 6. Start HTTP server
    let app = routes::app(services);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
