//! Claim review board (staff) and the student's own claim list

use std::fmt;

use crate::{
    api::{claims::ClaimsApi, export::CsvExport, export::ExportApi},
    error::{AppResult, UiAction},
    models::{Claim, ClaimQuery, ClaimStatus},
};

pub const CLAIMS_LOAD_FAILED: &str = "Failed to load claims";

/// Status tab above the claim list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClaimTab {
    #[default]
    All,
    Status(ClaimStatus),
}

impl ClaimTab {
    pub const ALL: [ClaimTab; 5] = [
        ClaimTab::All,
        ClaimTab::Status(ClaimStatus::Pending),
        ClaimTab::Status(ClaimStatus::Approved),
        ClaimTab::Status(ClaimStatus::Rejected),
        ClaimTab::Status(ClaimStatus::PickedUp),
    ];

    pub fn status(&self) -> Option<ClaimStatus> {
        match self {
            ClaimTab::All => None,
            ClaimTab::Status(status) => Some(*status),
        }
    }

    pub fn includes(&self, claim: &Claim) -> bool {
        self.status().map_or(true, |status| claim.status == status)
    }
}

impl fmt::Display for ClaimTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimTab::All => write!(f, "all"),
            ClaimTab::Status(status) => write!(f, "{}", status.as_str()),
        }
    }
}

/// Per-tab totals over the unfiltered claim set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub picked_up: usize,
}

impl ClaimCounts {
    pub fn tally(claims: &[Claim]) -> Self {
        claims.iter().fold(
            Self {
                all: claims.len(),
                ..Self::default()
            },
            |mut counts, claim| {
                match claim.status {
                    ClaimStatus::Pending => counts.pending += 1,
                    ClaimStatus::Approved => counts.approved += 1,
                    ClaimStatus::Rejected => counts.rejected += 1,
                    ClaimStatus::PickedUp => counts.picked_up += 1,
                }
                counts
            },
        )
    }

    pub fn for_tab(&self, tab: ClaimTab) -> usize {
        match tab.status() {
            None => self.all,
            Some(ClaimStatus::Pending) => self.pending,
            Some(ClaimStatus::Approved) => self.approved,
            Some(ClaimStatus::Rejected) => self.rejected,
            Some(ClaimStatus::PickedUp) => self.picked_up,
        }
    }

    /// Share of claims that ended in a pickup, e.g. "67%"
    pub fn success_rate(&self) -> String {
        if self.all == 0 {
            return "0%".to_string();
        }
        let rate = (self.picked_up as f64 / self.all as f64 * 100.0).round();
        format!("{}%", rate as u64)
    }
}

/// All claims fetched once, filtered by tab and search in memory
#[derive(Debug, Clone, Default)]
pub struct ClaimsBoard {
    claims: Vec<Claim>,
    tab: ClaimTab,
    search: String,
    counts: ClaimCounts,
    loading: bool,
    error: Option<String>,
}

impl ClaimsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch claims visible to the caller: all for staff, own for students
    pub async fn load(&mut self, claims: &ClaimsApi) -> Option<UiAction> {
        self.loading = true;
        self.error = None;
        let result = claims.list(&ClaimQuery::default()).await;
        self.loading = false;

        match result {
            Ok(list) => {
                self.set_claims(list);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching claims: {}", e);
                let action = e.ui_action(CLAIMS_LOAD_FAILED);
                if let UiAction::Inline(_) | UiAction::AccessDenied(_) = action {
                    self.error = Some(CLAIMS_LOAD_FAILED.to_string());
                }
                Some(action)
            }
        }
    }

    pub fn set_claims(&mut self, claims: Vec<Claim>) {
        self.counts = ClaimCounts::tally(&claims);
        self.claims = claims;
    }

    /// Swap one claim after it was re-fetched
    pub fn replace(&mut self, claim: Claim) {
        if let Some(slot) = self.claims.iter_mut().find(|c| c.claim_id == claim.claim_id) {
            *slot = claim;
            self.counts = ClaimCounts::tally(&self.claims);
        }
    }

    pub fn tab(&self) -> ClaimTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: ClaimTab) {
        self.tab = tab;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn counts(&self) -> ClaimCounts {
        self.counts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Claims under the active tab that match the search
    pub fn visible(&self) -> Vec<&Claim> {
        self.claims
            .iter()
            .filter(|c| self.tab.includes(c) && c.matches_search(&self.search))
            .collect()
    }

    /// CSV of the active tab, named `claims_<tab>_<date>.csv`
    pub async fn export(&self, export: &ExportApi) -> AppResult<CsvExport> {
        export.claims_csv(self.tab.status()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiClient, ApiResponse, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn claim(id: i64, status: &str, name: &str) -> Claim {
        serde_json::from_value(json!({
            "claim_id": id,
            "item_id": id + 100,
            "status": status,
            "claimant_name": name,
            "claimant_email": format!("{}@uwaterloo.ca", name.to_lowercase()),
            "item_category": "electronics",
            "item_description": "Grey laptop charger",
        }))
        .unwrap()
    }

    fn board() -> ClaimsBoard {
        let mut board = ClaimsBoard::new();
        board.set_claims(vec![
            claim(1, "pending", "Ava"),
            claim(2, "picked_up", "Ben"),
            claim(3, "approved", "Cho"),
            claim(4, "picked_up", "Dee"),
            claim(5, "rejected", "Eli"),
            claim(6, "pending", "Fay"),
        ]);
        board
    }

    #[test]
    fn tabs_and_search_combine() {
        let mut board = board();
        board.set_tab(ClaimTab::Status(ClaimStatus::Pending));
        assert_eq!(board.visible().len(), 2);

        board.set_search("FAY@");
        let ids: Vec<i64> = board.visible().iter().map(|c| c.claim_id).collect();
        assert_eq!(ids, vec![6]);

        board.set_tab(ClaimTab::All);
        board.set_search("charger");
        assert_eq!(board.visible().len(), 6);
    }

    #[test]
    fn counts_ignore_active_filters() {
        let mut board = board();
        board.set_tab(ClaimTab::Status(ClaimStatus::Rejected));
        board.set_search("nobody");
        let counts = board.counts();
        assert_eq!(counts.all, 6);
        assert_eq!(counts.for_tab(ClaimTab::Status(ClaimStatus::Pending)), 2);
        assert_eq!(counts.picked_up, 2);
        assert_eq!(counts.success_rate(), "33%");
    }

    #[test]
    fn success_rate_on_empty_board() {
        assert_eq!(ClaimCounts::tally(&[]).success_rate(), "0%");
    }

    #[test]
    fn replace_updates_counts() {
        let mut board = board();
        let mut updated = claim(1, "approved", "Ava");
        updated.staff_notes = Some("ID checked".into());
        board.replace(updated);
        assert_eq!(board.counts().pending, 1);
        assert_eq!(board.counts().approved, 2);
    }

    #[test]
    fn tab_names_match_export_filenames() {
        let names: Vec<String> = ClaimTab::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["all", "pending", "approved", "rejected", "picked_up"]);
    }

    #[tokio::test]
    async fn load_failure_keeps_message_and_401_redirects() {
        let mut transport = MockTransport::new();
        let mut calls = 0;
        transport.expect_send().times(2).returning(move |_| {
            calls += 1;
            let status = if calls == 1 { 500 } else { 401 };
            Ok(ApiResponse::json(status, json!({"error": "boom"})))
        });
        let api = ClaimsApi::new(ApiClient::new(Arc::new(transport)));
        let mut board = ClaimsBoard::new();

        let action = board.load(&api).await;
        assert!(matches!(action, Some(UiAction::Inline(_))));
        assert_eq!(board.error(), Some(CLAIMS_LOAD_FAILED));

        let action = board.load(&api).await;
        assert_eq!(action, Some(UiAction::RedirectToLogin));
    }
}
