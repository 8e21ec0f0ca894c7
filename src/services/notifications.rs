//! Unread notification panel on the student dashboard

use crate::{
    api::notifications::NotificationsApi,
    error::AppResult,
    models::{Notification, NotificationQuery, ReadFilter},
};

/// Unread notifications shown on the dashboard
pub const DASHBOARD_LIMIT: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
    loading: bool,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Hidden when there is nothing unread
    pub fn is_visible(&self) -> bool {
        self.loading || !self.entries.is_empty()
    }

    /// "3 new"
    pub fn badge(&self) -> String {
        format!("{} new", self.entries.len())
    }

    /// Load unread notifications; failures are logged and leave the list as is
    pub async fn load(&mut self, api: &NotificationsApi) {
        self.loading = true;
        let query = NotificationQuery {
            status: ReadFilter::Unread,
            limit: DASHBOARD_LIMIT,
        };
        match api.list(&query).await {
            Ok(entries) => self.entries = entries,
            Err(e) => tracing::error!("Failed to load notifications: {}", e),
        }
        self.loading = false;
    }

    /// Mark one notification read; it leaves the list only once the server agreed
    pub async fn mark_read(&mut self, api: &NotificationsApi, notification_id: i64) -> AppResult<()> {
        if let Err(e) = api.mark_read(notification_id).await {
            tracing::error!("Failed to mark notification {} as read: {}", notification_id, e);
            return Err(e);
        }
        self.entries.retain(|n| n.notification_id != notification_id);
        Ok(())
    }
}
