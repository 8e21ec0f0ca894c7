//! Staff audit trail endpoint

use crate::{
    error::AppResult,
    models::{activity_log::ActivityLogResponse, ActivityLogEntry, ActivityLogFilters, Page},
};

use super::client::ApiClient;

#[derive(Clone)]
pub struct ActivityLogApi {
    client: ApiClient,
}

impl ActivityLogApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        filters: &ActivityLogFilters,
        page: u32,
        page_size: u32,
    ) -> AppResult<Page<ActivityLogEntry>> {
        let mut query = filters.to_query_pairs();
        query.push(("page".to_string(), page.max(1).to_string()));
        query.push(("page_size".to_string(), page_size.to_string()));

        let response: ActivityLogResponse =
            self.client.get_json("/api/activity-log", query).await?;
        let info = response.page_info();
        Ok(Page {
            rows: response.logs,
            info,
        })
    }
}
