use serde::Deserialize;
use shared::models::Notification;

use crate::api::{ApiClient, ApiError, ApiRequest, ResponseKind};

#[derive(Deserialize)]
#[serde(untagged)]
enum UnreadCount {
    Bare(u64),
    Wrapped { count: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct NotificationService<'a> {
    api: &'a ApiClient,
}

impl<'a> NotificationService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.api.get_json("api/notifications").await
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        self.api
            .send(ApiRequest::put(format!("api/notifications/{id}/read")).expect(ResponseKind::Empty))
            .await
            .map(drop)
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.api
            .send(ApiRequest::put("api/notifications/read-all").expect(ResponseKind::Empty))
            .await
            .map(drop)
    }

    /// Number of unread notifications, shown as the header badge.
    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let count: UnreadCount = self.api.get_json("api/notifications/unread-count").await?;
        Ok(match count {
            UnreadCount::Bare(count) | UnreadCount::Wrapped { count } => count,
        })
    }
}
