//! Archived (picked-up) items, filtered and paginated in memory

use std::cmp::Ordering;

use crate::{
    api::{export::CsvExport, Api},
    error::{AppResult, UiAction},
    models::{ArchivedItem, ItemStatus, PageInfo, SortOrder},
};

use super::pagination::{local_page_info, page_slice, PaginationView};

pub const ARCHIVE_PAGE_SIZE: u32 = 12;
pub const LOAD_FAILED: &str = "Failed to load archived items. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveFilters {
    pub search: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub sort: SortOrder,
}

impl ArchiveFilters {
    fn matches(&self, entry: &ArchivedItem) -> bool {
        let query = self.search.trim().to_lowercase();
        if !query.is_empty() {
            let hit = [
                &entry.name,
                &entry.description,
                &entry.category,
                &entry.location_found,
                &entry.claim.claimant_name,
                &entry.claim.claimant_email,
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            match &entry.category {
                Some(c) if c.eq_ignore_ascii_case(category) => {}
                _ => return false,
            }
        }

        if let Some(location) = &self.location {
            let location = location.to_lowercase();
            match &entry.location_found {
                Some(l) if l.to_lowercase().contains(&location) => {}
                _ => return false,
            }
        }

        true
    }

    fn compare(&self, a: &ArchivedItem, b: &ArchivedItem) -> Ordering {
        let text = |v: &Option<String>| v.as_deref().unwrap_or("").to_lowercase();
        match self.sort {
            SortOrder::Recent => b.claim.updated_at.cmp(&a.claim.updated_at),
            SortOrder::Oldest => a.claim.updated_at.cmp(&b.claim.updated_at),
            SortOrder::Category => text(&a.category).cmp(&text(&b.category)),
            SortOrder::Location => text(&a.location_found).cmp(&text(&b.location_found)),
        }
    }
}

/// Staff archive page state
#[derive(Debug, Clone, Default)]
pub struct ArchiveBrowser {
    all: Vec<ArchivedItem>,
    visible: Vec<ArchivedItem>,
    filters: ArchiveFilters,
    page: u32,
    loading: bool,
    error: Option<String>,
    access_denied: bool,
}

impl ArchiveBrowser {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn filters(&self) -> &ArchiveFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_access_denied(&self) -> bool {
        self.access_denied
    }

    pub fn total_count(&self) -> usize {
        self.all.len()
    }

    /// Number of entries left after filtering
    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    /// Fetch the archive; a 401 is reported back for the login redirect
    pub async fn load(&mut self, api: &Api) -> Option<UiAction> {
        self.loading = true;
        let result = api.items.archived().await;
        self.loading = false;

        match result {
            Ok(items) => {
                tracing::debug!("Loaded {} archived items", items.len());
                self.set_items(items);
                self.error = None;
                self.access_denied = false;
                None
            }
            Err(e) => {
                tracing::error!("Error fetching archived items: {}", e);
                let action = e.ui_action(LOAD_FAILED);
                match &action {
                    UiAction::AccessDenied(message) => {
                        self.access_denied = true;
                        self.error = Some(message.clone());
                    }
                    UiAction::Inline(message) => self.error = Some(message.clone()),
                    UiAction::RedirectToLogin => {}
                }
                Some(action)
            }
        }
    }

    pub fn set_items(&mut self, items: Vec<ArchivedItem>) {
        self.all = items;
        self.apply();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.apply();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category.filter(|c| !c.is_empty());
        self.apply();
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.filters.location = location.filter(|l| !l.is_empty());
        self.apply();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filters.sort = sort;
        self.apply();
    }

    pub fn clear(&mut self) {
        self.filters = ArchiveFilters::default();
        self.apply();
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.info().total_pages.max(1));
    }

    /// Recompute the filtered view; any filter change lands on page 1
    fn apply(&mut self) {
        let mut visible: Vec<ArchivedItem> = self
            .all
            .iter()
            .filter(|entry| self.filters.matches(entry))
            .cloned()
            .collect();
        visible.sort_by(|a, b| self.filters.compare(a, b));
        self.visible = visible;
        self.page = 1;
    }

    pub fn info(&self) -> PageInfo {
        local_page_info(self.visible.len(), self.page, ARCHIVE_PAGE_SIZE)
    }

    /// Entries shown on the current page
    pub fn rows(&self) -> &[ArchivedItem] {
        page_slice(&self.visible, self.page, ARCHIVE_PAGE_SIZE)
    }

    pub fn pagination(&self) -> Option<PaginationView> {
        PaginationView::from_info(&self.info())
    }

    /// Download every claimed item as `archived_items_<date>.csv`
    pub async fn export(&self, api: &Api) -> AppResult<CsvExport> {
        api.export.items_csv(Some(ItemStatus::Claimed), None).await
    }
}
