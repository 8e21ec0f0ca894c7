//! UW Lost-and-Found client
//!
//! A headless client for the Lost-and-Found REST backend: typed API calls over
//! a cookie session, and the controllers that drive the student and staff
//! pages (claim review, claim submission, item browsing, archive, analytics,
//! notifications, activity log). The `lostfound-devserver` binary serves the
//! front-end bundle and proxies `/api` and `/auth` to the backend.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by the pages of one browser session
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let services = services::Services::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
