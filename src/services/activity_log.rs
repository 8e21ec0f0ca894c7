//! Staff audit trail browser

use crate::{
    api::{activity_log::ActivityLogApi, export::CsvExport, export::ExportApi},
    error::AppResult,
    models::{ActivityLogEntry, ActivityLogFilters},
};

use super::list::{FetchOutcome, ListController};

pub const ACTIVITY_LOAD_FAILED: &str = "Failed to load activity log. Please try again.";

/// Server-paginated activity log with its filter form
pub struct ActivityLogController {
    list: ListController<ActivityLogFilters, ActivityLogEntry>,
}

impl ActivityLogController {
    pub fn new(page_size: u32) -> Self {
        Self {
            list: ListController::new(ActivityLogFilters::default(), page_size, ACTIVITY_LOAD_FAILED),
        }
    }

    pub fn list(&self) -> &ListController<ActivityLogFilters, ActivityLogEntry> {
        &self.list
    }

    pub fn filters(&self) -> &ActivityLogFilters {
        self.list.filters()
    }

    /// Edit the filter form; any change lands on page 1
    pub fn update_filters<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut ActivityLogFilters),
    {
        let mut filters = self.list.filters().clone();
        edit(&mut filters);
        self.list.set_filters(filters)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.list.set_filters(ActivityLogFilters::default())
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        self.list.set_page(page)
    }

    /// Fetch when filters or page moved since the last fetch
    pub async fn refresh(&mut self, api: &ActivityLogApi) -> Option<FetchOutcome> {
        self.list
            .refresh(|ticket| async move {
                api.list(&ticket.filters, ticket.page, ticket.page_size).await
            })
            .await
    }

    /// CSV of the rows matching the current filters
    pub async fn export(&self, export: &ExportApi) -> AppResult<CsvExport> {
        export.activity_log_csv(self.list.filters()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiClient, ApiResponse, MockTransport};
    use crate::models::activity_log::Severity;
    use serde_json::json;
    use std::sync::Arc;

    fn logs(page: u32) -> serde_json::Value {
        json!({
            "logs": [
                {"log_id": page * 100, "action_type": "claim_approved", "user_name": "Staff One"},
                {"log_id": page * 100 + 1, "action_type": "item_deleted"},
            ],
            "total_count": 120,
            "page": page,
            "page_size": 50,
            "total_pages": 3
        })
    }

    #[tokio::test]
    async fn filter_change_refetches_from_first_page() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path == "/api/activity-log"
                    && req.query.contains(&("page".into(), "2".into()))
                    && req.query.contains(&("page_size".into(), "50".into()))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::json(200, logs(2))));
        transport
            .expect_send()
            .withf(|req| {
                req.query.contains(&("action_type".into(), "claim_approved".into()))
                    && req.query.contains(&("page".into(), "1".into()))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::json(200, logs(1))));
        let api = ActivityLogApi::new(ApiClient::new(Arc::new(transport)));

        let mut log = ActivityLogController::new(50);
        log.set_page(2);
        assert_eq!(log.refresh(&api).await, Some(FetchOutcome::Applied));
        assert_eq!(log.list().rows()[0].severity(), Severity::Success);
        assert_eq!(log.list().rows()[1].severity(), Severity::Danger);

        assert!(log.update_filters(|f| f.action_type = Some("claim_approved".into())));
        assert_eq!(log.list().page(), 1);
        assert_eq!(log.refresh(&api).await, Some(FetchOutcome::Applied));
        assert_eq!(log.refresh(&api).await, None);
        assert_eq!(
            log.list().pagination().unwrap().results_line(),
            "Showing 1-50 of 120 items"
        );
    }

    #[tokio::test]
    async fn forbidden_reports_staff_only() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::json(403, json!({"error": "Staff access required"}))));
        let api = ActivityLogApi::new(ApiClient::new(Arc::new(transport)));

        let mut log = ActivityLogController::new(50);
        let outcome = log.refresh(&api).await;
        assert_eq!(
            outcome,
            Some(FetchOutcome::Failed("Staff access required".into()))
        );
    }

    #[test]
    fn clearing_unchanged_filters_is_a_no_op() {
        let mut log = ActivityLogController::new(50);
        log.set_page(3);
        assert!(!log.clear_filters());
        assert_eq!(log.list().page(), 3);
    }
}
