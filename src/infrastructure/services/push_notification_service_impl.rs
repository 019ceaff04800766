// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::notification_service::{NotificationService, PushNotification};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// 签名请求头
pub const SIGNATURE_HEADER: &str = "X-Helpdesk-Signature";
/// 时间戳请求头
pub const TIMESTAMP_HEADER: &str = "X-Helpdesk-Timestamp";

/// 推送通知服务实现
///
/// 以 JSON 形式 POST 到推送网关，并用 HMAC-SHA256 对 `timestamp.payload` 签名。
pub struct PushNotificationServiceImpl {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
}

impl PushNotificationServiceImpl {
    /// 创建新的推送通知服务
    ///
    /// # 参数
    ///
    /// * `endpoint` - 推送网关地址
    /// * `secret` - 签名密钥
    /// * `timeout` - 单次请求超时
    pub fn new(endpoint: String, secret: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint,
            secret,
        }
    }

    /// 为负载生成签名
    pub fn sign(&self, payload: &str, timestamp: i64) -> Result<String> {
        let message = format!("{}.{}", timestamp, payload);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| anyhow!("Invalid signing key: {}", e))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl NotificationService for PushNotificationServiceImpl {
    async fn send(&self, notification: &PushNotification) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp();
        let payload = serde_json::to_string(notification)?;
        let signature = self.sign(&payload, timestamp)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp.to_string())
            .body(payload)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!(
                "Push notification failed with status {}: {}",
                status,
                body
            ))
        }
    }
}
