//! REST API client for the Lost-and-Found backend

pub mod activity_log;
pub mod analytics;
pub mod auth;
pub mod claims;
pub mod client;
pub mod export;
pub mod items;
pub mod notifications;

use std::sync::Arc;

pub use client::{ApiClient, ApiRequest, ApiResponse, ReqwestTransport, Transport};

use crate::services::session::SessionCache;

/// Every domain API over one shared client
#[derive(Clone)]
pub struct Api {
    pub auth: auth::AuthApi,
    pub items: items::ItemsApi,
    pub claims: claims::ClaimsApi,
    pub analytics: analytics::AnalyticsApi,
    pub notifications: notifications::NotificationsApi,
    pub activity_log: activity_log::ActivityLogApi,
    pub export: export::ExportApi,
}

impl Api {
    pub fn new(client: ApiClient, session: Arc<SessionCache>) -> Self {
        Self {
            auth: auth::AuthApi::new(client.clone(), session),
            items: items::ItemsApi::new(client.clone()),
            claims: claims::ClaimsApi::new(client.clone()),
            analytics: analytics::AnalyticsApi::new(client.clone()),
            notifications: notifications::NotificationsApi::new(client.clone()),
            activity_log: activity_log::ActivityLogApi::new(client.clone()),
            export: export::ExportApi::new(client),
        }
    }
}
