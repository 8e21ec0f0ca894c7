//! Server-paginated list controller
//!
//! Holds a filter set and a page number. Changing filters resets the page to 1;
//! changing only the page keeps the filters. Either change bumps a revision,
//! and [`ListController::needs_fetch`] reports when the displayed revision is
//! behind, which is what drives refetching.
//!
//! Every fetch carries a generation token. Only the response for the latest
//! issued token is applied, so a slow response to an older request can never
//! overwrite fresher results.

use std::future::Future;

use crate::{
    error::{AppResult, UiAction},
    models::{Page, PageInfo},
};

use super::pagination::PaginationView;

/// Parameters of one issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<F> {
    pub generation: u64,
    pub filters: F,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued; the response was dropped
    Stale,
    /// Session gone; the page should redirect to login
    Unauthenticated,
    /// Error shown inline, previous rows kept
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListController<F, T> {
    filters: F,
    page: u32,
    page_size: u32,
    revision: u64,
    fetched_revision: Option<u64>,
    generation: u64,
    rows: Vec<T>,
    info: PageInfo,
    loading: bool,
    error: Option<String>,
    error_fallback: String,
}

impl<F, T> ListController<F, T>
where
    F: Clone + PartialEq,
{
    pub fn new(filters: F, page_size: u32, error_fallback: impl Into<String>) -> Self {
        Self {
            filters,
            page: 1,
            page_size,
            revision: 0,
            fetched_revision: None,
            generation: 0,
            rows: Vec::new(),
            info: PageInfo::default(),
            loading: false,
            error: None,
            error_fallback: error_fallback.into(),
        }
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn info(&self) -> &PageInfo {
        &self.info
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pagination bar for the displayed page, hidden for a single page
    pub fn pagination(&self) -> Option<PaginationView> {
        let info = PageInfo {
            page: self.page,
            ..self.info.clone()
        };
        PaginationView::from_info(&info)
    }

    /// Replace the filters; resets to page 1 when they actually change
    pub fn set_filters(&mut self, filters: F) -> bool {
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.page = 1;
        self.revision += 1;
        true
    }

    /// Move to `page`; filters are untouched
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        self.revision += 1;
        true
    }

    /// Force the current filters and page to be fetched again
    pub fn retry(&mut self) {
        self.fetched_revision = None;
    }

    pub fn needs_fetch(&self) -> bool {
        self.fetched_revision != Some(self.revision)
    }

    /// Issue a new fetch for the current state
    pub fn begin_fetch(&mut self) -> FetchTicket<F> {
        self.generation += 1;
        self.fetched_revision = Some(self.revision);
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            filters: self.filters.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Apply a response unless a newer fetch was issued meanwhile
    pub fn finish_fetch(&mut self, ticket: &FetchTicket<F>, result: AppResult<Page<T>>) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale list response (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.rows = page.rows;
                self.info = page.info;
                self.error = None;
                FetchOutcome::Applied
            }
            Err(e) if e.is_unauthenticated() => {
                tracing::warn!("List fetch unauthenticated: {}", e);
                FetchOutcome::Unauthenticated
            }
            Err(e) => {
                tracing::error!("List fetch failed: {}", e);
                let message = match e.ui_action(&self.error_fallback) {
                    UiAction::AccessDenied(message) => message,
                    _ => self.error_fallback.clone(),
                };
                self.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Fetch if the displayed revision is behind; `None` when already current
    pub async fn refresh<Fetch, Fut>(&mut self, fetch: Fetch) -> Option<FetchOutcome>
    where
        Fetch: FnOnce(FetchTicket<F>) -> Fut,
        Fut: Future<Output = AppResult<Page<T>>>,
    {
        if !self.needs_fetch() {
            return None;
        }
        let ticket = self.begin_fetch();
        let result = fetch(ticket.clone()).await;
        Some(self.finish_fetch(&ticket, result))
    }
}
