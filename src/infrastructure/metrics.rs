// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{info, warn};

/// 启动 Prometheus 导出器并登记业务计数器
pub fn init_metrics(settings: &MetricsSettings) {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port));

    // Port may already be taken in development; keep serving without metrics
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(error = %e, "Failed to install Prometheus recorder");
        return;
    }

    describe_counter!("helpdesk_tickets_created_total", "Tickets created");
    describe_counter!(
        "helpdesk_sla_status_created_total",
        "SLA status rows generated for tickets"
    );
    describe_counter!(
        "helpdesk_sla_reached_total",
        "SLA status rows marked as reached"
    );
    describe_counter!(
        "helpdesk_notifications_failed_total",
        "Push notifications that could not be delivered"
    );

    info!(%addr, "Metrics exporter listening");
}
