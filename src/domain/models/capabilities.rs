// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ticket::{DomainError, Ticket};
use serde::Serialize;
use uuid::Uuid;

/// 可以挂载留言的对象
pub trait Commentable {
    /// 留言线程的标识
    fn thread_id(&self) -> Uuid;

    /// 建议的收件人
    fn suggested_recipients(&self) -> Vec<SuggestedRecipient>;
}

/// 建议的留言收件人
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedRecipient {
    pub partner_id: Option<Uuid>,
    pub email: Option<String>,
    pub reason: String,
}

/// 可以被客户评分的对象
pub trait Rateable {
    /// 评分汇总到的上级对象（团队）
    fn rating_parent_id(&self) -> Option<Uuid>;

    /// 记录评分，范围 0-5
    fn apply_rating(&mut self, rating: i32, feedback: Option<String>) -> Result<(), DomainError>;
}

/// 可以通过门户链接访问的对象
pub trait PortalAccessible {
    fn access_token(&self) -> &str;

    /// 门户中的访问路径
    fn access_url(&self) -> String;

    /// 带访问令牌的完整路径
    fn portal_url(&self) -> String {
        format!("{}?access_token={}", self.access_url(), self.access_token())
    }

    fn check_access_token(&self, token: &str) -> bool {
        !token.is_empty() && self.access_token() == token
    }
}

impl Commentable for Ticket {
    fn thread_id(&self) -> Uuid {
        self.id
    }

    fn suggested_recipients(&self) -> Vec<SuggestedRecipient> {
        if let Some(partner_id) = self.partner_id {
            vec![SuggestedRecipient {
                partner_id: Some(partner_id),
                email: self.partner_email.clone(),
                reason: "Customer".to_string(),
            }]
        } else if let Some(email) = &self.partner_email {
            vec![SuggestedRecipient {
                partner_id: None,
                email: Some(email.clone()),
                reason: "Customer Email".to_string(),
            }]
        } else {
            Vec::new()
        }
    }
}

impl Rateable for Ticket {
    fn rating_parent_id(&self) -> Option<Uuid> {
        self.team_id
    }

    fn apply_rating(&mut self, rating: i32, feedback: Option<String>) -> Result<(), DomainError> {
        if !(0..=5).contains(&rating) {
            return Err(DomainError::Validation(format!(
                "rating must be between 0 and 5, got {}",
                rating
            )));
        }
        self.rating = Some(rating);
        self.rating_feedback = feedback.filter(|f| !f.trim().is_empty());
        Ok(())
    }
}

impl PortalAccessible for Ticket {
    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn access_url(&self) -> String {
        format!("/my/ticket/{}", self.id)
    }
}
