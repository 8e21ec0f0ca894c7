//! Staff analytics dashboard payload

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_claims: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_staff: u64,
    /// Percentage, one decimal
    #[serde(default)]
    pub approval_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimsBreakdown {
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub picked_up: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsBreakdown {
    #[serde(default)]
    pub unclaimed: u64,
    #[serde(default)]
    pub claimed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCount {
    pub week: String,
    pub count: u64,
    #[serde(default)]
    pub week_start: Option<String>,
}

/// Count per category or per location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCount {
    #[serde(alias = "category", alias = "location")]
    pub label: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charts {
    #[serde(default)]
    pub items_per_week: Vec<WeeklyCount>,
    #[serde(default)]
    pub claims_per_week: Vec<WeeklyCount>,
    #[serde(default)]
    pub claims_per_category: Vec<LabeledCount>,
    #[serde(default)]
    pub items_per_category: Vec<LabeledCount>,
    #[serde(default)]
    pub items_per_location: Vec<LabeledCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub action_type: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub entity_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDashboard {
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub claims_breakdown: ClaimsBreakdown,
    #[serde(default)]
    pub items_breakdown: ItemsBreakdown,
    #[serde(default)]
    pub charts: Charts,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivity>,
}

impl AnalyticsDashboard {
    /// Largest count in a chart series, used to scale bars
    pub fn max_count(series: &[LabeledCount]) -> u64 {
        series.iter().map(|c| c.count).max().unwrap_or(0)
    }
}
