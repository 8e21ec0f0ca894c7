//! CSV export downloads

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{ActivityLogFilters, Category, ClaimStatus, ItemStatus},
};

use super::client::ApiClient;

/// A downloaded CSV file and the name it should be saved under
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    pub fn new(stem: &str, date: NaiveDate, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{}_{}.csv", stem, date.format("%Y-%m-%d")),
            bytes,
        }
    }

    /// Write into `dir`, returning the full path
    pub async fn save_to(&self, dir: &Path) -> AppResult<PathBuf> {
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save {}: {}", path.display(), e)))?;
        tracing::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

#[derive(Clone)]
pub struct ExportApi {
    client: ApiClient,
}

impl ExportApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    pub async fn items_csv(
        &self,
        status: Option<ItemStatus>,
        category: Option<Category>,
    ) -> AppResult<CsvExport> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(category) = category {
            query.push(("category".to_string(), category.as_str().to_string()));
        }
        let bytes = self.client.get_bytes("/api/export/items/csv", query).await?;
        let stem = match status {
            Some(ItemStatus::Claimed) => "archived_items",
            _ => "lost_items",
        };
        Ok(CsvExport::new(stem, Self::today(), bytes))
    }

    /// Claims CSV; the filename carries the status filter or `all`
    pub async fn claims_csv(&self, status: Option<ClaimStatus>) -> AppResult<CsvExport> {
        let query = status
            .map(|s| vec![("status".to_string(), s.as_str().to_string())])
            .unwrap_or_default();
        let bytes = self.client.get_bytes("/api/export/claims/csv", query).await?;
        let filter = status.map(|s| s.as_str()).unwrap_or("all");
        Ok(CsvExport::new(
            &format!("claims_{}", filter),
            Self::today(),
            bytes,
        ))
    }

    pub async fn activity_log_csv(&self, filters: &ActivityLogFilters) -> AppResult<CsvExport> {
        let bytes = self
            .client
            .get_bytes("/api/export/activity-log/csv", filters.to_query_pairs())
            .await?;
        Ok(CsvExport::new("activity_log", Self::today(), bytes))
    }
}
