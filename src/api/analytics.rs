//! Staff analytics endpoint

use crate::{error::AppResult, models::AnalyticsDashboard};

use super::client::ApiClient;

#[derive(Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> AppResult<AnalyticsDashboard> {
        self.client
            .get_json("/api/analytics/dashboard", Vec::new())
            .await
    }
}
