//! Notification endpoints

use crate::{
    error::AppResult,
    models::{
        notification::NotificationListResponse, user::MessageResponse, Notification,
        NotificationQuery,
    },
};

use super::client::ApiClient;

#[derive(Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        let response: NotificationListResponse = self
            .client
            .get_json("/api/notifications", query.to_query_pairs())
            .await?;
        Ok(response.notifications)
    }

    pub async fn mark_read(&self, notification_id: i64) -> AppResult<String> {
        let response: MessageResponse = self
            .client
            .patch_json(
                &format!("/api/notifications/{}/read", notification_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(response.message)
    }
}
