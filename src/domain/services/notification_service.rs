// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// 推送给处理人的通知
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNotification {
    /// 接收通知的用户
    pub user_id: Uuid,
    pub ticket_id: Uuid,
    pub title: String,
    pub body: String,
}

/// 推送通知服务特质
///
/// 定义推送通知发送的核心逻辑
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 发送推送通知
    ///
    /// # 参数
    ///
    /// * `notification` - 推送通知
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 发送成功
    /// * `Err(anyhow::Error)` - 发送失败
    async fn send(&self, notification: &PushNotification) -> Result<()>;
}

/// 在后台发送通知
///
/// 发送失败只记录日志和指标，不会影响触发它的写操作。
pub fn dispatch(
    service: Arc<dyn NotificationService>,
    notification: PushNotification,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match service.send(&notification).await {
            Ok(()) => debug!(
                user_id = %notification.user_id,
                ticket_id = %notification.ticket_id,
                "Push notification sent"
            ),
            Err(e) => {
                counter!("helpdesk_notifications_failed_total").increment(1);
                warn!(
                    user_id = %notification.user_id,
                    ticket_id = %notification.ticket_id,
                    error = %e,
                    "Push notification failed"
                );
            }
        }
    })
}
