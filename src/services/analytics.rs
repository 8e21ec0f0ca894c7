//! Background refresh of the staff analytics dashboard

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{api::analytics::AnalyticsApi, error::UiAction, models::AnalyticsDashboard};

pub const ANALYTICS_LOAD_FAILED: &str = "Failed to load analytics data. Please try again.";

/// Latest published state of the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSnapshot {
    /// Last successful fetch; kept when a later refresh fails
    pub dashboard: Option<AnalyticsDashboard>,
    pub last_updated: Option<DateTime<Local>>,
    pub failure: Option<UiAction>,
    pub fetches: u64,
}

/// Fetches the dashboard immediately and then every `period`, until dropped.
///
/// Polling does not pause while nobody is looking at the snapshot.
pub struct AnalyticsPoller {
    rx: watch::Receiver<AnalyticsSnapshot>,
    task: JoinHandle<()>,
}

impl AnalyticsPoller {
    pub fn spawn(api: AnalyticsApi, period: Duration) -> Self {
        let (tx, rx) = watch::channel(AnalyticsSnapshot::default());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = api.dashboard().await;

                tx.send_modify(|snapshot| {
                    snapshot.fetches += 1;
                    match result {
                        Ok(dashboard) => {
                            snapshot.dashboard = Some(dashboard);
                            snapshot.last_updated = Some(Local::now());
                            snapshot.failure = None;
                        }
                        Err(e) => {
                            tracing::error!("Error fetching analytics: {}", e);
                            snapshot.failure = Some(e.ui_action(ANALYTICS_LOAD_FAILED));
                        }
                    }
                });

                if tx.is_closed() {
                    tracing::debug!("Analytics poller has no subscribers left, stopping");
                    break;
                }
            }
        });

        Self { rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalyticsSnapshot> {
        self.rx.clone()
    }

    pub fn latest(&self) -> AnalyticsSnapshot {
        self.rx.borrow().clone()
    }

    /// Abort the polling task; same as dropping the poller
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for AnalyticsPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
