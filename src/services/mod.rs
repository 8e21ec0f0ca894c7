//! Client-side controllers and caches

pub mod activity_log;
pub mod analytics;
pub mod archive;
pub mod claim_lifecycle;
pub mod claim_submission;
pub mod claims_board;
pub mod filters;
pub mod list;
pub mod notifications;
pub mod overlay;
pub mod pages;
pub mod pagination;
pub mod session;
pub mod timeline;
pub mod toast;

use std::sync::Arc;

use crate::{
    api::{Api, ApiClient},
    config::{AppConfig, PaginationConfig, TimingConfig},
    error::AppResult,
    models::{Claim, Item},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub api: Api,
    pub session: Arc<session::SessionCache>,
    pub toaster: Arc<toast::Toaster>,
    pub scroll: overlay::PageScroll,
    pub timing: TimingConfig,
    pub pagination: PaginationConfig,
}

impl Services {
    /// Create all services talking to the configured backend
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = ApiClient::from_config(&config.backend)?;
        Ok(Self::with_client(client, config))
    }

    /// Create all services over an existing client
    pub fn with_client(client: ApiClient, config: &AppConfig) -> Self {
        let session = Arc::new(session::SessionCache::new(&config.session));
        Self {
            api: Api::new(client, Arc::clone(&session)),
            session,
            toaster: Arc::new(toast::Toaster::new()),
            scroll: overlay::PageScroll::new(),
            timing: config.timing.clone(),
            pagination: config.pagination.clone(),
        }
    }

    pub fn overlay_host(&self) -> overlay::OverlayHost {
        overlay::OverlayHost::new(self.scroll.clone())
    }

    pub fn claim_lifecycle(&self, claim: Claim) -> claim_lifecycle::ClaimLifecycle {
        claim_lifecycle::ClaimLifecycle::new(
            claim,
            self.api.claims.clone(),
            Arc::clone(&self.toaster),
            self.timing.clone(),
        )
    }

    pub fn claim_submission(&self, item: &Item) -> claim_submission::ClaimSubmission {
        claim_submission::ClaimSubmission::open(
            item,
            self.api.claims.clone(),
            Arc::clone(&self.toaster),
            &self.scroll,
            self.timing.submit_close_delay(),
        )
    }

    pub fn item_browser(&self) -> filters::ItemBrowser {
        filters::ItemBrowser::new(self.pagination.item_page_size)
    }

    pub fn activity_log(&self) -> activity_log::ActivityLogController {
        activity_log::ActivityLogController::new(self.pagination.activity_page_size)
    }

    /// Start polling the analytics dashboard; stops when the poller is dropped
    pub fn analytics_poller(&self) -> analytics::AnalyticsPoller {
        analytics::AnalyticsPoller::spawn(self.api.analytics.clone(), self.timing.analytics_poll())
    }
}
